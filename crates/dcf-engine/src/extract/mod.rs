//! Reading canonical figures out of a filing
//!
//! Extraction runs in a fixed order: essential income-statement figures
//! first (fatal when missing), then cash-flow figures with their fallbacks,
//! then unit normalization, then the balance sheet.

pub mod concepts;
pub mod defaults;
pub mod extractor;
pub mod normalize;

pub use concepts::Metric;
pub use defaults::{
    DefaultLedger, DefaultReason, DefaultedField, FallbackField, SoftDefault,
};
pub use extractor::{Extracted, extract, extract_metric};
pub use normalize::{BalanceFigures, OperatingFigures, UnitAdjustments};

use crate::config::ValuationConfig;
use crate::error::{Result, ValuationError};
use crate::report::StatementSet;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Figures extracted from one filing, after defaults and normalization
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractedFinancials {
    pub operating: OperatingFigures,
    pub balance: BalanceFigures,
    pub units: UnitAdjustments,
    /// Concept each metric was read from; absent metrics were defaulted
    pub concepts: BTreeMap<String, String>,
}

struct Reader<'s> {
    statements: &'s StatementSet,
    concepts: BTreeMap<String, String>,
}

impl<'s> Reader<'s> {
    fn read(&mut self, metric: Metric) -> Option<f64> {
        let hit = extract_metric(self.statements, metric)?;
        self.concepts
            .insert(metric.label().to_string(), hit.concept.to_string());
        Some(hit.value)
    }

    fn essential(&mut self, ticker: &str, metric: Metric) -> Result<f64> {
        match self.read(metric) {
            Some(value) if value.is_finite() => Ok(value),
            _ => Err(ValuationError::missing(
                ticker,
                format!("invalid income statement data: no usable {}", metric.label()),
            )),
        }
    }

    fn or_fallback(
        &mut self,
        ledger: &mut DefaultLedger<'_>,
        metric: Metric,
        field: FallbackField,
    ) -> Result<f64> {
        match self.read(metric) {
            Some(value) if value.is_finite() => Ok(value),
            Some(_) => ledger.fallback(field, DefaultReason::NonFinite),
            None => ledger.fallback(field, DefaultReason::Missing),
        }
    }

    fn or_zero(&mut self, ledger: &mut DefaultLedger<'_>, metric: Metric) -> f64 {
        match self.read(metric) {
            Some(value) => value,
            None => ledger.zero_fill(metric),
        }
    }
}

/// Extract every figure the valuation needs from `statements`
pub fn extract_financials(
    statements: &StatementSet,
    config: &ValuationConfig,
    ledger: &mut DefaultLedger<'_>,
) -> Result<ExtractedFinancials> {
    let ticker = ledger.ticker().to_string();
    let mut reader = Reader {
        statements,
        concepts: BTreeMap::new(),
    };

    let revenue = reader.essential(&ticker, Metric::Revenue)?;
    let operating_income = reader.essential(&ticker, Metric::OperatingIncome)?;
    let income_before_tax = reader.essential(&ticker, Metric::IncomeBeforeTax)?;
    let income_tax_expense = reader.essential(&ticker, Metric::IncomeTaxExpense)?;

    let depreciation =
        reader.or_fallback(ledger, Metric::Depreciation, FallbackField::Depreciation)?;

    // reported as an outflow, sign varies by filer
    let capital_expenditures = reader
        .or_fallback(
            ledger,
            Metric::CapitalExpenditures,
            FallbackField::CapitalExpenditures,
        )?
        .abs();

    let [receivables, inventories, other_assets, payables, other_liabilities] =
        Metric::WORKING_CAPITAL.map(|metric| reader.or_zero(ledger, metric));
    let mut change_in_working_capital =
        (receivables + inventories + other_assets) - (payables + other_liabilities);
    if !change_in_working_capital.is_finite() {
        change_in_working_capital =
            ledger.fallback(FallbackField::ChangeInWorkingCapital, DefaultReason::NonFinite)?;
    }

    let (operating, operating_scaled) = normalize::normalize_operating(
        OperatingFigures {
            revenue,
            operating_income,
            income_before_tax,
            income_tax_expense,
            depreciation,
            capital_expenditures,
            change_in_working_capital,
        },
        config.unit_scale_threshold,
        config.unit_scale_divisor,
    );
    if operating_scaled {
        tracing::info!(
            ticker = %ticker,
            "Adjusting units, assuming financial data is in thousands"
        );
    }

    let total_debt = reader.or_fallback(ledger, Metric::TotalDebt, FallbackField::TotalDebt)?;
    let cash_and_equivalents = reader.or_fallback(
        ledger,
        Metric::CashAndEquivalents,
        FallbackField::CashAndEquivalents,
    )?;

    let (balance, balance_scaled) = normalize::normalize_balance(
        BalanceFigures {
            total_debt,
            cash_and_equivalents,
        },
        config.unit_scale_threshold,
        config.unit_scale_divisor,
    );
    if balance_scaled {
        tracing::info!(
            ticker = %ticker,
            "Adjusting units for cash and debt, assuming values are in thousands"
        );
    }

    tracing::debug!(
        ticker = %ticker,
        depreciation = operating.depreciation,
        capital_expenditures = operating.capital_expenditures,
        change_in_working_capital = operating.change_in_working_capital,
        total_debt = balance.total_debt,
        cash = balance.cash_and_equivalents,
        "Extracted financials"
    );

    Ok(ExtractedFinancials {
        operating,
        balance,
        units: UnitAdjustments {
            operating_scaled,
            balance_scaled,
        },
        concepts: reader.concepts,
    })
}
