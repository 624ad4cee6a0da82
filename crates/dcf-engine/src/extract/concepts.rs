//! Metric to concept-identifier table
//!
//! Filers tag the same line item with different us-gaap concepts. Each metric
//! lists the identifiers accepted for it, in priority order. The lists are
//! fixed; changing them changes valuations.

use crate::report::Section;
use serde::{Deserialize, Serialize};

const REVENUE: &[&str] = &[
    "us-gaap_Revenues",
    "us-gaap_SalesRevenueNet",
    "us-gaap_SalesRevenueServicesNet",
    "us-gaap_RevenueFromContractWithCustomerExcludingAssessedTax",
];

const OPERATING_INCOME: &[&str] = &["us-gaap_OperatingIncomeLoss"];

const INCOME_BEFORE_TAX: &[&str] = &[
    "us-gaap_IncomeLossFromContinuingOperationsBeforeIncomeTaxesMinorityInterestAndIncomeLossFromEquityMethodInvestments",
    "us-gaap_IncomeLossFromContinuingOperationsBeforeIncomeTaxesExtraordinaryItemsNoncontrollingInterest",
    "us-gaap_IncomeLossFromContinuingOperationsBeforeIncomeTaxes",
];

const INCOME_TAX_EXPENSE: &[&str] = &["us-gaap_IncomeTaxExpenseBenefit"];

const DEPRECIATION: &[&str] = &[
    "us-gaap_DepreciationAndAmortization",
    "us-gaap_DepreciationDepletionAndAmortization",
    "us-gaap_NoncashAdjustmentsToReconcileNetIncomeLossToCashProvidedByUsedInOperatingActivities",
    "us-gaap_DepreciationAmortizationAndOther",
    "us-gaap_DepreciationAmortizationAndOtherNoncashItems",
];

const CAPITAL_EXPENDITURES: &[&str] = &["us-gaap_PaymentsToAcquirePropertyPlantAndEquipment"];

const ACCOUNTS_RECEIVABLE_CHANGE: &[&str] = &["us-gaap_IncreaseDecreaseInAccountsReceivable"];

const INVENTORIES_CHANGE: &[&str] = &["us-gaap_IncreaseDecreaseInInventories"];

const OTHER_CURRENT_ASSETS_CHANGE: &[&str] = &["us-gaap_IncreaseDecreaseInOtherCurrentAssets"];

const ACCOUNTS_PAYABLE_CHANGE: &[&str] = &["us-gaap_IncreaseDecreaseInAccountsPayable"];

const OTHER_CURRENT_LIABILITIES_CHANGE: &[&str] =
    &["us-gaap_IncreaseDecreaseInOtherCurrentLiabilities"];

const TOTAL_DEBT: &[&str] = &[
    "us-gaap_LongTermDebtNoncurrent",
    "us-gaap_LongTermDebtAndCapitalLeaseObligations",
    "us-gaap_DebtCurrent",
    "us-gaap_LongTermDebtCurrent",
    "us-gaap_LongTermDebt",
];

const CASH_AND_EQUIVALENTS: &[&str] = &[
    "us-gaap_CashAndCashEquivalentsAtCarryingValue",
    "us-gaap_CashCashEquivalentsAndShortTermInvestments",
];

/// A canonical figure the engine reads from a filing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    Revenue,
    OperatingIncome,
    IncomeBeforeTax,
    IncomeTaxExpense,
    Depreciation,
    CapitalExpenditures,
    AccountsReceivableChange,
    InventoriesChange,
    OtherCurrentAssetsChange,
    AccountsPayableChange,
    OtherCurrentLiabilitiesChange,
    TotalDebt,
    CashAndEquivalents,
}

impl Metric {
    /// Every metric, in extraction order
    pub const ALL: [Metric; 13] = [
        Metric::Revenue,
        Metric::OperatingIncome,
        Metric::IncomeBeforeTax,
        Metric::IncomeTaxExpense,
        Metric::Depreciation,
        Metric::CapitalExpenditures,
        Metric::AccountsReceivableChange,
        Metric::InventoriesChange,
        Metric::OtherCurrentAssetsChange,
        Metric::AccountsPayableChange,
        Metric::OtherCurrentLiabilitiesChange,
        Metric::TotalDebt,
        Metric::CashAndEquivalents,
    ];

    /// Working-capital components; increases in assets first
    pub const WORKING_CAPITAL: [Metric; 5] = [
        Metric::AccountsReceivableChange,
        Metric::InventoriesChange,
        Metric::OtherCurrentAssetsChange,
        Metric::AccountsPayableChange,
        Metric::OtherCurrentLiabilitiesChange,
    ];

    /// Accepted concept identifiers, highest priority first
    pub fn candidates(&self) -> &'static [&'static str] {
        match self {
            Metric::Revenue => REVENUE,
            Metric::OperatingIncome => OPERATING_INCOME,
            Metric::IncomeBeforeTax => INCOME_BEFORE_TAX,
            Metric::IncomeTaxExpense => INCOME_TAX_EXPENSE,
            Metric::Depreciation => DEPRECIATION,
            Metric::CapitalExpenditures => CAPITAL_EXPENDITURES,
            Metric::AccountsReceivableChange => ACCOUNTS_RECEIVABLE_CHANGE,
            Metric::InventoriesChange => INVENTORIES_CHANGE,
            Metric::OtherCurrentAssetsChange => OTHER_CURRENT_ASSETS_CHANGE,
            Metric::AccountsPayableChange => ACCOUNTS_PAYABLE_CHANGE,
            Metric::OtherCurrentLiabilitiesChange => OTHER_CURRENT_LIABILITIES_CHANGE,
            Metric::TotalDebt => TOTAL_DEBT,
            Metric::CashAndEquivalents => CASH_AND_EQUIVALENTS,
        }
    }

    /// Statement the metric is read from
    pub fn section(&self) -> Section {
        match self {
            Metric::Revenue
            | Metric::OperatingIncome
            | Metric::IncomeBeforeTax
            | Metric::IncomeTaxExpense => Section::Income,
            Metric::TotalDebt | Metric::CashAndEquivalents => Section::BalanceSheet,
            _ => Section::CashFlow,
        }
    }

    /// Essential metrics abort the valuation when missing
    pub fn is_essential(&self) -> bool {
        self.section() == Section::Income
    }

    pub fn label(&self) -> &'static str {
        match self {
            Metric::Revenue => "revenue",
            Metric::OperatingIncome => "operating income",
            Metric::IncomeBeforeTax => "income before tax",
            Metric::IncomeTaxExpense => "income tax expense",
            Metric::Depreciation => "depreciation and amortization",
            Metric::CapitalExpenditures => "capital expenditures",
            Metric::AccountsReceivableChange => "change in accounts receivable",
            Metric::InventoriesChange => "change in inventories",
            Metric::OtherCurrentAssetsChange => "change in other current assets",
            Metric::AccountsPayableChange => "change in accounts payable",
            Metric::OtherCurrentLiabilitiesChange => "change in other current liabilities",
            Metric::TotalDebt => "total debt",
            Metric::CashAndEquivalents => "cash and equivalents",
        }
    }
}
