//! Tax rate, NOPAT and the starting free cash flow

use crate::error::Result;
use crate::extract::{DefaultLedger, DefaultReason, FallbackField, OperatingFigures};
use serde::{Deserialize, Serialize};

/// Cash-flow figures derived from the operating statements
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CashFlowProfile {
    pub tax_rate: f64,
    pub nopat: f64,
    pub initial_fcf: f64,
}

/// Effective tax rate, falling back when not finite or outside `[0, max_tax_rate]`
pub fn effective_tax_rate(
    figures: &OperatingFigures,
    max_tax_rate: f64,
    ledger: &mut DefaultLedger<'_>,
) -> Result<f64> {
    let rate = figures.income_tax_expense / figures.income_before_tax;
    if !rate.is_finite() {
        return ledger.fallback(FallbackField::TaxRate, DefaultReason::NonFinite);
    }
    if !(0.0..=max_tax_rate).contains(&rate) {
        return ledger.fallback(FallbackField::TaxRate, DefaultReason::OutOfRange);
    }
    Ok(rate)
}

/// NOPAT and initial FCF
pub fn derive_cash_flow(
    figures: &OperatingFigures,
    max_tax_rate: f64,
    ledger: &mut DefaultLedger<'_>,
) -> Result<CashFlowProfile> {
    let tax_rate = effective_tax_rate(figures, max_tax_rate, ledger)?;
    let nopat = figures.operating_income * (1.0 - tax_rate);
    let initial_fcf = nopat + figures.depreciation
        - figures.capital_expenditures
        - figures.change_in_working_capital;

    tracing::debug!(
        ticker = ledger.ticker(),
        tax_rate,
        nopat,
        initial_fcf,
        "Derived cash flow"
    );

    Ok(CashFlowProfile {
        tax_rate,
        nopat,
        initial_fcf,
    })
}
