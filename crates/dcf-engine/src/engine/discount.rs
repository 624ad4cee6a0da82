//! CAPM cost of equity and WACC

use crate::error::Result;
use crate::extract::{DefaultLedger, DefaultReason, FallbackField};
use crate::inputs::RiskMetrics;
use serde::{Deserialize, Serialize};

/// Inputs of the capital-structure blend
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CapitalStructure {
    pub stock_price: f64,
    pub shares_outstanding: f64,
    pub total_debt: f64,
    pub tax_rate: f64,
}

/// Discount rate with its components
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscountRate {
    pub cost_of_equity: f64,
    pub cost_of_debt: f64,
    pub market_cap: f64,
    pub equity_weight: f64,
    pub debt_weight: f64,
    /// Blend before sanity clamping
    pub raw_wacc: f64,
    /// Rate actually used for discounting
    pub wacc: f64,
    pub clamped: bool,
}

/// `rf + beta * mrp`
pub fn cost_of_equity(risk: &RiskMetrics) -> f64 {
    risk.risk_free_rate + risk.beta * risk.market_risk_premium
}

/// Blend equity and after-tax debt cost by capital weights
///
/// A result outside `[min_wacc, max_wacc]`, or not finite, is replaced by the
/// fallback WACC; `raw_wacc` keeps the computed blend.
pub fn weighted_average_cost_of_capital(
    risk: &RiskMetrics,
    capital: &CapitalStructure,
    cost_of_debt: f64,
    (min_wacc, max_wacc): (f64, f64),
    ledger: &mut DefaultLedger<'_>,
) -> Result<DiscountRate> {
    let cost_of_equity = cost_of_equity(risk);
    let market_cap = capital.stock_price * capital.shares_outstanding;
    let total_capital = capital.total_debt + market_cap;
    let equity_weight = market_cap / total_capital;
    let debt_weight = capital.total_debt / total_capital;

    let raw_wacc = equity_weight * cost_of_equity
        + debt_weight * cost_of_debt * (1.0 - capital.tax_rate);

    let (wacc, clamped) = if !raw_wacc.is_finite() {
        (
            ledger.fallback(FallbackField::Wacc, DefaultReason::NonFinite)?,
            true,
        )
    } else if !(min_wacc..=max_wacc).contains(&raw_wacc) {
        (
            ledger.fallback(FallbackField::Wacc, DefaultReason::OutOfRange)?,
            true,
        )
    } else {
        (raw_wacc, false)
    };

    tracing::debug!(
        ticker = ledger.ticker(),
        cost_of_equity,
        equity_weight,
        debt_weight,
        raw_wacc,
        wacc,
        "Computed discount rate"
    );

    Ok(DiscountRate {
        cost_of_equity,
        cost_of_debt,
        market_cap,
        equity_weight,
        debt_weight,
        raw_wacc,
        wacc,
        clamped,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FallbackPolicy;

    const BOUNDS: (f64, f64) = (0.0, 0.15);

    fn risk(beta: f64, premium: f64) -> RiskMetrics {
        RiskMetrics {
            beta,
            risk_free_rate: 0.04,
            market_risk_premium: premium,
        }
    }

    fn capital() -> CapitalStructure {
        CapitalStructure {
            stock_price: 150.0,
            shares_outstanding: 1.6e9,
            total_debt: 4e10,
            tax_rate: 0.2,
        }
    }

    #[test]
    fn test_capm() {
        assert!((cost_of_equity(&risk(1.2, 0.05)) - 0.10).abs() < 1e-12);
    }

    #[test]
    fn test_weights_sum_to_one() {
        let policy = FallbackPolicy::default();
        let mut ledger = DefaultLedger::new("AAPL", &policy);
        let rate =
            weighted_average_cost_of_capital(&risk(1.2, 0.05), &capital(), 0.03, BOUNDS, &mut ledger)
                .unwrap();

        assert!((rate.equity_weight + rate.debt_weight - 1.0).abs() < 1e-12);
        assert!((rate.market_cap - 2.4e11).abs() < 1.0);
        let expected = rate.equity_weight * 0.10 + rate.debt_weight * 0.03 * 0.8;
        assert!((rate.wacc - expected).abs() < 1e-15);
        assert!(!rate.clamped);
    }

    #[test]
    fn test_high_beta_is_clamped() {
        let policy = FallbackPolicy::default();
        let mut ledger = DefaultLedger::new("AAPL", &policy);
        let rate =
            weighted_average_cost_of_capital(&risk(4.0, 0.08), &capital(), 0.03, BOUNDS, &mut ledger)
                .unwrap();

        assert!(rate.raw_wacc > 0.15);
        assert!((rate.wacc - 0.08).abs() < f64::EPSILON);
        assert!(rate.clamped);
        assert_eq!(ledger.entries().len(), 1);
    }

    #[test]
    fn test_negative_wacc_is_clamped() {
        let policy = FallbackPolicy::default();
        let mut ledger = DefaultLedger::new("AAPL", &policy);
        let rate =
            weighted_average_cost_of_capital(&risk(-3.0, 0.05), &capital(), 0.03, BOUNDS, &mut ledger)
                .unwrap();

        assert!(rate.raw_wacc < 0.0);
        assert!((rate.wacc - 0.08).abs() < f64::EPSILON);
    }

    #[test]
    fn test_wacc_always_within_bounds() {
        let policy = FallbackPolicy::default();
        for beta in [-5.0, -1.0, 0.0, 0.5, 1.0, 2.0, 10.0, f64::NAN] {
            for premium in [-0.1, 0.0, 0.05, 0.2] {
                let mut ledger = DefaultLedger::new("AAPL", &policy);
                let rate = weighted_average_cost_of_capital(
                    &risk(beta, premium),
                    &capital(),
                    0.03,
                    BOUNDS,
                    &mut ledger,
                )
                .unwrap();
                assert!((0.0..=0.15).contains(&rate.wacc), "beta {beta} premium {premium}");
            }
        }
    }

    #[test]
    fn test_zero_capital_falls_back() {
        let policy = FallbackPolicy::default();
        let mut ledger = DefaultLedger::new("AAPL", &policy);
        let empty = CapitalStructure {
            stock_price: 0.0,
            shares_outstanding: 1e9,
            total_debt: 0.0,
            tax_rate: 0.2,
        };
        let rate =
            weighted_average_cost_of_capital(&risk(1.0, 0.05), &empty, 0.03, BOUNDS, &mut ledger)
                .unwrap();
        assert!(!rate.raw_wacc.is_finite());
        assert!((rate.wacc - 0.08).abs() < f64::EPSILON);
        assert_eq!(ledger.entries()[0].reason, DefaultReason::NonFinite);
    }

    #[test]
    fn test_strict_clamp_fails() {
        let policy = FallbackPolicy::Strict;
        let mut ledger = DefaultLedger::new("AAPL", &policy);
        let result =
            weighted_average_cost_of_capital(&risk(4.0, 0.08), &capital(), 0.03, BOUNDS, &mut ledger);
        assert!(result.is_err());
    }
}
