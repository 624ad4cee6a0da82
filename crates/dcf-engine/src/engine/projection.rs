//! Explicit-horizon projection and Gordon growth terminal value

use crate::error::{Result, ValuationError};

/// Compound `initial_fcf` forward, one entry per projected year
pub fn project_cash_flows(initial_fcf: f64, growth_rate: f64, years: u32) -> Vec<f64> {
    let mut current = initial_fcf;
    (1..=years)
        .map(|year| {
            current *= 1.0 + growth_rate;
            tracing::debug!(year, fcf = current, "Projected FCF");
            current
        })
        .collect()
}

/// `FCF_N * (1 + g) / (wacc - g)`
///
/// Undefined when the discount rate does not exceed the terminal growth rate.
pub fn terminal_value(
    ticker: &str,
    final_fcf: f64,
    wacc: f64,
    terminal_growth_rate: f64,
) -> Result<f64> {
    if wacc <= terminal_growth_rate {
        return Err(ValuationError::TerminalGrowthExceedsDiscountRate {
            ticker: ticker.to_string(),
            wacc,
            terminal_growth_rate,
        });
    }
    Ok(final_fcf * (1.0 + terminal_growth_rate) / (wacc - terminal_growth_rate))
}
