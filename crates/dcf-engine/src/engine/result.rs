//! Valuation result types

use super::bridge::ShareCount;
use super::cash_flow::CashFlowProfile;
use super::discount::DiscountRate;
use crate::extract::{DefaultedField, ExtractedFinancials, SoftDefault};
use crate::inputs::{RiskMetrics, ValuationAssumptions};
use serde::{Deserialize, Serialize};

/// Assumptions the price target was computed under
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssumptionSnapshot {
    pub growth_rate: f64,
    pub projection_years: u32,
    pub terminal_growth_rate: f64,
    pub wacc: f64,
    pub cost_of_equity: f64,
    pub cost_of_debt: f64,
    pub beta: f64,
    pub risk_free_rate: f64,
    pub market_risk_premium: f64,
    pub tax_rate: f64,
}

impl AssumptionSnapshot {
    pub(crate) fn new(
        assumptions: &ValuationAssumptions,
        risk: &RiskMetrics,
        rate: &DiscountRate,
        cash_flow: &CashFlowProfile,
    ) -> Self {
        Self {
            growth_rate: assumptions.growth_rate,
            projection_years: assumptions.projection_years,
            terminal_growth_rate: assumptions.terminal_growth_rate,
            wacc: rate.wacc,
            cost_of_equity: rate.cost_of_equity,
            cost_of_debt: rate.cost_of_debt,
            beta: risk.beta,
            risk_free_rate: risk.risk_free_rate,
            market_risk_premium: risk.market_risk_premium,
            tax_rate: cash_flow.tax_rate,
        }
    }
}

/// Intermediate figures of a valuation, for auditing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValuationBreakdown {
    pub financials: ExtractedFinancials,
    pub nopat: f64,
    pub initial_fcf: f64,
    pub projected_fcfs: Vec<f64>,
    pub discounted_fcfs: Vec<f64>,
    pub terminal_value: f64,
    pub discounted_terminal_value: f64,
    pub present_value: f64,
    pub equity_value: f64,
    pub shares: ShareCount,
    pub stock_price: f64,
    pub market_cap: f64,
    pub equity_weight: f64,
    pub debt_weight: f64,
}

/// Outcome of a single valuation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValuationResult {
    pub ticker: String,
    /// Intrinsic value per share
    pub price_target: f64,
    /// Rate used for discounting
    pub wacc: f64,
    /// Computed rate before the sanity clamp
    pub raw_wacc: f64,
    pub wacc_clamped: bool,
    pub assumptions: AssumptionSnapshot,
    pub breakdown: ValuationBreakdown,
    /// Substitutions made while valuing, in the order they happened
    pub defaults: Vec<SoftDefault>,
}

impl ValuationResult {
    /// True when every figure came from the filings
    pub fn is_fully_grounded(&self) -> bool {
        self.defaults.is_empty()
    }

    /// Relative gap between the price target and `stock_price`
    pub fn upside(&self, stock_price: f64) -> Option<f64> {
        if stock_price > 0.0 && stock_price.is_finite() {
            Some(self.price_target / stock_price - 1.0)
        } else {
            None
        }
    }

    pub fn fallback_count(&self) -> usize {
        self.defaults
            .iter()
            .filter(|d| matches!(d.field, DefaultedField::Fallback(_)))
            .count()
    }
}
