//! Unit normalization for filings reported in thousands

use serde::{Deserialize, Serialize};

/// Income and cash-flow figures used downstream
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OperatingFigures {
    pub revenue: f64,
    pub operating_income: f64,
    pub income_before_tax: f64,
    pub income_tax_expense: f64,
    pub depreciation: f64,
    /// Always non-negative
    pub capital_expenditures: f64,
    pub change_in_working_capital: f64,
}

/// Balance-sheet figures used by the discount rate and the equity bridge
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BalanceFigures {
    pub total_debt: f64,
    pub cash_and_equivalents: f64,
}

/// Which rescalings were applied
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnitAdjustments {
    pub operating_scaled: bool,
    pub balance_scaled: bool,
}

/// Scale every operating figure when revenue exceeds `threshold`
pub fn normalize_operating(
    figures: OperatingFigures,
    threshold: f64,
    divisor: f64,
) -> (OperatingFigures, bool) {
    if figures.revenue <= threshold {
        return (figures, false);
    }

    let scaled = OperatingFigures {
        revenue: figures.revenue / divisor,
        operating_income: figures.operating_income / divisor,
        income_before_tax: figures.income_before_tax / divisor,
        income_tax_expense: figures.income_tax_expense / divisor,
        depreciation: figures.depreciation / divisor,
        capital_expenditures: figures.capital_expenditures / divisor,
        change_in_working_capital: figures.change_in_working_capital / divisor,
    };
    (scaled, true)
}

/// Scale cash and debt when cash exceeds `threshold`
///
/// Independent of the operating check; either can fire alone.
pub fn normalize_balance(
    figures: BalanceFigures,
    threshold: f64,
    divisor: f64,
) -> (BalanceFigures, bool) {
    if figures.cash_and_equivalents <= threshold {
        return (figures, false);
    }

    let scaled = BalanceFigures {
        total_debt: figures.total_debt / divisor,
        cash_and_equivalents: figures.cash_and_equivalents / divisor,
    };
    (scaled, true)
}
