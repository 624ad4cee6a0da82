//! Caller-supplied inputs of a valuation

use crate::config::ValuationConfig;
use crate::error::{Result, ValuationError};
use crate::report::FinancialReport;
use serde::{Deserialize, Serialize};

/// Market quote for the valued company
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketData {
    pub stock_price: f64,
    /// Raw share count; values below one million are read as millions
    pub shares_outstanding: f64,
}

/// CAPM inputs
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskMetrics {
    pub beta: f64,
    pub risk_free_rate: f64,
    pub market_risk_premium: f64,
}

/// Per-call overrides; unset fields use the configured defaults
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValuationOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub growth_rate: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub projection_years: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub terminal_growth_rate: Option<f64>,
}

/// Projection assumptions after applying overrides to defaults
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValuationAssumptions {
    pub growth_rate: f64,
    pub projection_years: u32,
    pub terminal_growth_rate: f64,
}

impl ValuationOptions {
    /// Merge with configured defaults and validate
    ///
    /// An explicit zero is a valid override and is kept.
    pub fn resolve(&self, ticker: &str, config: &ValuationConfig) -> Result<ValuationAssumptions> {
        let assumptions = ValuationAssumptions {
            growth_rate: self.growth_rate.unwrap_or(config.default_growth_rate),
            projection_years: self
                .projection_years
                .unwrap_or(config.default_projection_years),
            terminal_growth_rate: self
                .terminal_growth_rate
                .unwrap_or(config.default_terminal_growth_rate),
        };

        let invalid = |reason: String| ValuationError::InvalidAssumption {
            ticker: ticker.to_string(),
            reason,
        };

        if assumptions.projection_years == 0 {
            return Err(invalid("projection years must be at least 1".to_string()));
        }
        if assumptions.projection_years > config.max_projection_years {
            return Err(invalid(format!(
                "projection years {} exceed the limit of {}",
                assumptions.projection_years, config.max_projection_years
            )));
        }
        if !assumptions.growth_rate.is_finite() || assumptions.growth_rate <= -1.0 {
            return Err(invalid(format!(
                "growth rate {} must be finite and above -100%",
                assumptions.growth_rate
            )));
        }
        if !assumptions.terminal_growth_rate.is_finite() || assumptions.terminal_growth_rate <= -1.0
        {
            return Err(invalid(format!(
                "terminal growth rate {} must be finite and above -100%",
                assumptions.terminal_growth_rate
            )));
        }

        Ok(assumptions)
    }
}

/// Everything needed to value one ticker
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValuationInputs {
    pub ticker: String,
    /// Filings, most recent first
    #[serde(alias = "financials")]
    pub reports: Vec<FinancialReport>,
    pub market_data: MarketData,
    pub risk_metrics: RiskMetrics,
    #[serde(default)]
    pub options: ValuationOptions,
}

impl ValuationInputs {
    pub fn new(
        ticker: impl Into<String>,
        reports: Vec<FinancialReport>,
        market_data: MarketData,
        risk_metrics: RiskMetrics,
    ) -> Self {
        Self {
            ticker: ticker.into(),
            reports,
            market_data,
            risk_metrics,
            options: ValuationOptions::default(),
        }
    }

    pub fn with_options(mut self, options: ValuationOptions) -> Self {
        self.options = options;
        self
    }

    /// Parse a JSON bundle
    pub fn from_json(raw: &str) -> Result<Self> {
        Ok(serde_json::from_str(raw)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_apply() {
        let config = ValuationConfig::default();
        let assumptions = ValuationOptions::default().resolve("AAPL", &config).unwrap();
        assert_eq!(
            assumptions,
            ValuationAssumptions {
                growth_rate: 0.10,
                projection_years: 5,
                terminal_growth_rate: 0.03,
            }
        );
    }

    #[test]
    fn test_overrides_are_independent() {
        let config = ValuationConfig::default();
        let options = ValuationOptions {
            projection_years: Some(10),
            ..Default::default()
        };
        let assumptions = options.resolve("AAPL", &config).unwrap();
        assert_eq!(assumptions.projection_years, 10);
        assert!((assumptions.growth_rate - 0.10).abs() < f64::EPSILON);
    }

    #[test]
    fn test_explicit_zero_is_kept() {
        let config = ValuationConfig::default();
        let options = ValuationOptions {
            growth_rate: Some(0.0),
            terminal_growth_rate: Some(0.0),
            ..Default::default()
        };
        let assumptions = options.resolve("AAPL", &config).unwrap();
        assert!(assumptions.growth_rate.abs() < f64::EPSILON);
        assert!(assumptions.terminal_growth_rate.abs() < f64::EPSILON);
    }

    #[test]
    fn test_zero_years_rejected() {
        let config = ValuationConfig::default();
        let options = ValuationOptions {
            projection_years: Some(0),
            ..Default::default()
        };
        let err = options.resolve("AAPL", &config).unwrap_err();
        assert!(matches!(err, ValuationError::InvalidAssumption { .. }));
    }

    #[test]
    fn test_excessive_years_rejected() {
        let config = ValuationConfig::default();
        let options = ValuationOptions {
            projection_years: Some(u32::MAX),
            ..Default::default()
        };
        let err = options.resolve("AAPL", &config).unwrap_err();
        assert!(matches!(err, ValuationError::InvalidAssumption { ref reason, .. } if reason.contains("limit of 100")));

        let options = ValuationOptions {
            projection_years: Some(100),
            ..Default::default()
        };
        assert_eq!(options.resolve("AAPL", &config).unwrap().projection_years, 100);
    }

    #[test]
    fn test_non_finite_growth_rejected() {
        let config = ValuationConfig::default();
        let options = ValuationOptions {
            growth_rate: Some(f64::NAN),
            ..Default::default()
        };
        assert!(options.resolve("AAPL", &config).is_err());
    }

    #[test]
    fn test_bundle_json() {
        let raw = r#"{
            "ticker": "AAPL",
            "reports": [],
            "marketData": {"stockPrice": 150.0, "sharesOutstanding": 15500},
            "riskMetrics": {"beta": 1.2, "riskFreeRate": 0.04, "marketRiskPremium": 0.05},
            "options": {"growthRate": 0.08}
        }"#;
        let inputs = ValuationInputs::from_json(raw).unwrap();
        assert_eq!(inputs.ticker, "AAPL");
        assert!((inputs.market_data.shares_outstanding - 15_500.0).abs() < f64::EPSILON);
        assert_eq!(inputs.options.growth_rate, Some(0.08));
        assert_eq!(inputs.options.projection_years, None);
    }

    #[test]
    fn test_bundle_without_options() {
        let raw = r#"{
            "ticker": "MSFT",
            "reports": [],
            "marketData": {"stockPrice": 1.0, "sharesOutstanding": 1.0},
            "riskMetrics": {"beta": 1.0, "riskFreeRate": 0.0, "marketRiskPremium": 0.0}
        }"#;
        let inputs = ValuationInputs::from_json(raw).unwrap();
        assert_eq!(inputs.options, ValuationOptions::default());
    }
}
