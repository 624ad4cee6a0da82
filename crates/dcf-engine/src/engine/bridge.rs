//! Discounting, enterprise-to-equity bridge and per-share value

use crate::config::ValuationConfig;
use crate::error::{Result, ValuationError};
use serde::{Deserialize, Serialize};

/// Share count after the millions correction, with the raw figure kept
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShareCount {
    pub reported: f64,
    pub used: f64,
    pub corrected: bool,
}

/// Present values of the projected flows and the terminal value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Discounted {
    pub cash_flows: Vec<f64>,
    pub terminal_value: f64,
    pub present_value: f64,
}

/// Read counts below the correction threshold as millions, then range-check
pub fn corrected_shares(ticker: &str, reported: f64, config: &ValuationConfig) -> Result<ShareCount> {
    let corrected = reported < config.share_correction_threshold;
    let used = if corrected {
        reported * config.share_multiplier
    } else {
        reported
    };
    if corrected {
        tracing::info!(
            ticker,
            reported,
            used,
            "Adjusting shares outstanding, assuming value is in millions"
        );
    }

    // NaN fails the range check as well
    if !(config.min_shares_outstanding..=config.max_shares_outstanding).contains(&used) {
        return Err(ValuationError::InvalidRange {
            ticker: ticker.to_string(),
            field: "shares outstanding".to_string(),
            value: used,
            min: config.min_shares_outstanding,
            max: config.max_shares_outstanding,
        });
    }

    Ok(ShareCount {
        reported,
        used,
        corrected,
    })
}

/// Discount year `i` flows by `(1 + wacc)^i` and the terminal value by `(1 + wacc)^N`
pub fn discount(cash_flows: &[f64], terminal_value: f64, wacc: f64) -> Discounted {
    let factor = 1.0 + wacc;
    let discounted: Vec<f64> = cash_flows
        .iter()
        .zip(1..)
        .map(|(fcf, year)| fcf / factor.powi(year))
        .collect();
    let horizon = i32::try_from(cash_flows.len()).unwrap_or(i32::MAX);
    let discounted_terminal = terminal_value / factor.powi(horizon);
    let present_value = discounted.iter().sum::<f64>() + discounted_terminal;

    Discounted {
        cash_flows: discounted,
        terminal_value: discounted_terminal,
        present_value,
    }
}

/// `PV + cash - debt`
pub fn equity_value(present_value: f64, cash_and_equivalents: f64, total_debt: f64) -> f64 {
    present_value + cash_and_equivalents - total_debt
}
