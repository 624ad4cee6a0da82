//! Configuration for valuation runs
//!
//! Every constant the engine relies on lives here so that callers can audit
//! or override it. The defaults reproduce the reference model.

use crate::error::{Result, ValuationError};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Fallback figures substituted when a filing lacks a non-essential value
///
/// The defaults are taken from a single large-cap filer and are only a
/// rough stand-in for other companies; use [`FallbackPolicy::Strict`] when
/// that is not acceptable.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FallbackValues {
    pub depreciation: f64,
    pub capital_expenditures: f64,
    pub change_in_working_capital: f64,
    pub total_debt: f64,
    pub cash_and_equivalents: f64,
    pub tax_rate: f64,
    pub wacc: f64,
}

impl Default for FallbackValues {
    fn default() -> Self {
        Self {
            depreciation: 12_000_000_000.0,
            capital_expenditures: 27_100_000_000.0,
            change_in_working_capital: 4_100_000_000.0,
            total_debt: 44_100_000_000.0,
            cash_and_equivalents: 111_000_000_000.0,
            tax_rate: 0.18,
            wacc: 0.08,
        }
    }
}

/// What to do when a non-essential figure is missing or implausible
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum FallbackPolicy {
    /// Substitute the given values and record a diagnostic
    Substitute { values: FallbackValues },
    /// Refuse to substitute; the valuation fails instead
    Strict,
}

impl Default for FallbackPolicy {
    fn default() -> Self {
        Self::Substitute {
            values: FallbackValues::default(),
        }
    }
}

/// Configuration for valuation runs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValuationConfig {
    /// Annual FCF growth over the projection horizon
    pub default_growth_rate: f64,

    /// Number of explicitly projected years
    pub default_projection_years: u32,

    /// Longest projection horizon accepted from config or a caller
    pub max_projection_years: u32,

    /// Perpetual growth used by the terminal value
    pub default_terminal_growth_rate: f64,

    /// Pre-tax cost of debt
    pub cost_of_debt: f64,

    /// Lower bound for an acceptable WACC
    pub min_wacc: f64,

    /// Upper bound for an acceptable WACC
    pub max_wacc: f64,

    /// Upper bound for an acceptable effective tax rate
    pub max_tax_rate: f64,

    /// Revenue or cash above this is assumed to be reported in thousands
    pub unit_scale_threshold: f64,

    /// Divisor applied when the unit threshold is exceeded
    pub unit_scale_divisor: f64,

    /// Share counts below this are assumed to be reported in millions
    pub share_correction_threshold: f64,

    /// Multiplier applied to share counts below the correction threshold
    pub share_multiplier: f64,

    /// Smallest plausible share count
    pub min_shares_outstanding: f64,

    /// Largest plausible share count
    pub max_shares_outstanding: f64,

    /// Handling of missing non-essential figures
    pub fallback_policy: FallbackPolicy,

    /// Upper bound on tickers valued at the same time in a batch
    pub max_concurrency: usize,
}

impl Default for ValuationConfig {
    fn default() -> Self {
        Self {
            default_growth_rate: 0.10,
            default_projection_years: 5,
            max_projection_years: 100,
            default_terminal_growth_rate: 0.03,
            cost_of_debt: 0.03,
            min_wacc: 0.0,
            max_wacc: 0.15,
            max_tax_rate: 0.5,
            unit_scale_threshold: 1_000_000_000_000.0,
            unit_scale_divisor: 1_000.0,
            share_correction_threshold: 1_000_000.0,
            share_multiplier: 1_000_000.0,
            min_shares_outstanding: 1_000_000.0,
            max_shares_outstanding: 10_000_000_000.0,
            fallback_policy: FallbackPolicy::default(),
            max_concurrency: 8,
        }
    }
}

impl ValuationConfig {
    /// Create a new configuration builder
    pub fn builder() -> ValuationConfigBuilder {
        ValuationConfigBuilder::default()
    }

    /// Load a configuration from a JSON file; absent keys keep their defaults
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Apply `DCF_*` environment overrides
    pub fn with_env_overrides(mut self) -> Result<Self> {
        if let Some(rate) = env_var::<f64>("DCF_GROWTH_RATE")? {
            self.default_growth_rate = rate;
        }
        if let Some(years) = env_var::<u32>("DCF_PROJECTION_YEARS")? {
            self.default_projection_years = years;
        }
        if let Some(rate) = env_var::<f64>("DCF_TERMINAL_GROWTH_RATE")? {
            self.default_terminal_growth_rate = rate;
        }
        if let Some(true) = env_var::<bool>("DCF_STRICT")? {
            self.fallback_policy = FallbackPolicy::Strict;
        }
        self.validate()?;
        Ok(self)
    }

    /// Fallback values, or `None` under the strict policy
    pub fn fallbacks(&self) -> Option<&FallbackValues> {
        match &self.fallback_policy {
            FallbackPolicy::Substitute { values } => Some(values),
            FallbackPolicy::Strict => None,
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        let finite = [
            ("default_growth_rate", self.default_growth_rate),
            ("default_terminal_growth_rate", self.default_terminal_growth_rate),
            ("cost_of_debt", self.cost_of_debt),
            ("min_wacc", self.min_wacc),
            ("max_wacc", self.max_wacc),
            ("max_tax_rate", self.max_tax_rate),
        ];
        if let Some((name, _)) = finite.iter().find(|(_, v)| !v.is_finite()) {
            return Err(ValuationError::Config(format!("{name} must be finite")));
        }

        if self.default_projection_years == 0 {
            return Err(ValuationError::Config(
                "default_projection_years must be greater than 0".to_string(),
            ));
        }

        if self.default_projection_years > self.max_projection_years {
            return Err(ValuationError::Config(format!(
                "default_projection_years {} exceeds max_projection_years {}",
                self.default_projection_years, self.max_projection_years
            )));
        }

        if self.min_wacc >= self.max_wacc {
            return Err(ValuationError::Config(
                "min_wacc must be below max_wacc".to_string(),
            ));
        }

        if !(0.0..1.0).contains(&self.max_tax_rate) {
            return Err(ValuationError::Config(
                "max_tax_rate must be in [0, 1)".to_string(),
            ));
        }

        if !(self.unit_scale_divisor > 0.0 && self.unit_scale_threshold > 0.0) {
            return Err(ValuationError::Config(
                "unit scaling threshold and divisor must be positive".to_string(),
            ));
        }

        if !(self.share_multiplier > 0.0
            && self.min_shares_outstanding > 0.0
            && self.min_shares_outstanding < self.max_shares_outstanding)
        {
            return Err(ValuationError::Config(
                "share count range must be positive and non-empty".to_string(),
            ));
        }

        if let Some(values) = self.fallbacks() {
            if !(self.min_wacc..=self.max_wacc).contains(&values.wacc) {
                return Err(ValuationError::Config(format!(
                    "fallback wacc {} is outside [{}, {}]",
                    values.wacc, self.min_wacc, self.max_wacc
                )));
            }
            if !(0.0..=self.max_tax_rate).contains(&values.tax_rate) {
                return Err(ValuationError::Config(format!(
                    "fallback tax rate {} is outside [0, {}]",
                    values.tax_rate, self.max_tax_rate
                )));
            }
        }

        if self.max_concurrency == 0 {
            return Err(ValuationError::Config(
                "max_concurrency must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}

fn env_var<T: std::str::FromStr>(name: &str) -> Result<Option<T>> {
    match std::env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|_| ValuationError::Config(format!("{name} has invalid value {raw:?}"))),
        Err(_) => Ok(None),
    }
}

/// Builder for ValuationConfig
#[derive(Debug, Default)]
pub struct ValuationConfigBuilder {
    default_growth_rate: Option<f64>,
    default_projection_years: Option<u32>,
    default_terminal_growth_rate: Option<f64>,
    cost_of_debt: Option<f64>,
    wacc_bounds: Option<(f64, f64)>,
    fallback_policy: Option<FallbackPolicy>,
    max_concurrency: Option<usize>,
}

impl ValuationConfigBuilder {
    /// Set the default growth rate
    pub fn growth_rate(mut self, rate: f64) -> Self {
        self.default_growth_rate = Some(rate);
        self
    }

    /// Set the default projection horizon
    pub fn projection_years(mut self, years: u32) -> Self {
        self.default_projection_years = Some(years);
        self
    }

    /// Set the default terminal growth rate
    pub fn terminal_growth_rate(mut self, rate: f64) -> Self {
        self.default_terminal_growth_rate = Some(rate);
        self
    }

    /// Set the pre-tax cost of debt
    pub fn cost_of_debt(mut self, rate: f64) -> Self {
        self.cost_of_debt = Some(rate);
        self
    }

    /// Set the acceptable WACC range
    pub fn wacc_bounds(mut self, min: f64, max: f64) -> Self {
        self.wacc_bounds = Some((min, max));
        self
    }

    /// Set the fallback policy
    pub fn fallback_policy(mut self, policy: FallbackPolicy) -> Self {
        self.fallback_policy = Some(policy);
        self
    }

    /// Shorthand for [`FallbackPolicy::Strict`]
    pub fn strict(self) -> Self {
        self.fallback_policy(FallbackPolicy::Strict)
    }

    /// Set the batch concurrency limit
    pub fn max_concurrency(mut self, limit: usize) -> Self {
        self.max_concurrency = Some(limit);
        self
    }

    /// Build the configuration
    pub fn build(self) -> Result<ValuationConfig> {
        let defaults = ValuationConfig::default();
        let (min_wacc, max_wacc) = self
            .wacc_bounds
            .unwrap_or((defaults.min_wacc, defaults.max_wacc));

        let config = ValuationConfig {
            default_growth_rate: self.default_growth_rate.unwrap_or(defaults.default_growth_rate),
            default_projection_years: self
                .default_projection_years
                .unwrap_or(defaults.default_projection_years),
            default_terminal_growth_rate: self
                .default_terminal_growth_rate
                .unwrap_or(defaults.default_terminal_growth_rate),
            cost_of_debt: self.cost_of_debt.unwrap_or(defaults.cost_of_debt),
            min_wacc,
            max_wacc,
            fallback_policy: self.fallback_policy.unwrap_or(defaults.fallback_policy),
            max_concurrency: self.max_concurrency.unwrap_or(defaults.max_concurrency),
            ..defaults
        };

        config.validate()?;
        Ok(config)
    }
}

/// Settings for the upstream market-data provider
///
/// The engine never talks to the provider; these values are handed to the
/// payload adapters and to whoever does the fetching.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderSettings {
    /// API key for the provider (never logged)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Risk-free rate used with the provider's beta
    pub risk_free_rate: f64,

    /// Equity market risk premium
    pub market_risk_premium: f64,

    /// Tickers valued when none are given explicitly
    pub watchlist: Vec<String>,
}

impl Default for ProviderSettings {
    fn default() -> Self {
        Self {
            api_key: None,
            risk_free_rate: 0.04,
            market_risk_premium: 0.05,
            watchlist: [
                "AAPL", "MSFT", "GOOGL", "AMZN", "TSLA", "META", "NVDA", "BRK.B", "JNJ", "V",
                "WMT", "PG", "JPM", "XOM", "UNH", "HD", "MA", "DIS", "PFE", "CVX", "KO", "MRK",
                "PEP", "BAC",
            ]
            .iter()
            .map(|s| (*s).to_string())
            .collect(),
        }
    }
}

impl ProviderSettings {
    /// Load the provider API key from `FINNHUB_API_KEY`
    pub fn with_env_api_key(mut self) -> Self {
        if let Ok(key) = std::env::var("FINNHUB_API_KEY") {
            self.api_key = Some(key);
        }
        self
    }
}
