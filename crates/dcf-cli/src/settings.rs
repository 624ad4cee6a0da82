//! Settings file for the CLI

use anyhow::Context;
use dcf_engine::{FallbackPolicy, ProviderSettings, ValuationConfig};
use dcf_utils::Config;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::cli::AssumptionArgs;

/// Everything the CLI reads from `--config`
///
/// ```json
/// {
///   "app_name": "dcf",
///   "environment": "production",
///   "valuation": { "default_growth_rate": 0.08, "fallback_policy": { "mode": "strict" } },
///   "provider": { "risk_free_rate": 0.045, "watchlist": ["AAPL", "MSFT"] }
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CliSettings {
    #[serde(flatten)]
    pub app: Config,
    pub valuation: ValuationConfig,
    pub provider: ProviderSettings,
}

impl CliSettings {
    /// Load from `path` if given, then apply environment overrides
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let settings: Self = match path {
            Some(path) => dcf_utils::config::load_json(path)?,
            None => Self::default(),
        };

        let valuation = settings
            .valuation
            .with_env_overrides()
            .context("invalid valuation settings")?;

        Ok(Self {
            valuation,
            provider: settings.provider.with_env_api_key(),
            ..settings
        })
    }

    /// Valuation config with command-line overrides applied
    pub fn valuation_for(
        &self,
        assumptions: &AssumptionArgs,
        concurrency: Option<usize>,
    ) -> anyhow::Result<ValuationConfig> {
        let mut config = self.valuation.clone();
        if let Some(rate) = assumptions.growth_rate {
            config.default_growth_rate = rate;
        }
        if let Some(years) = assumptions.projection_years {
            config.default_projection_years = years;
        }
        if let Some(rate) = assumptions.terminal_growth_rate {
            config.default_terminal_growth_rate = rate;
        }
        if assumptions.strict {
            config.fallback_policy = FallbackPolicy::Strict;
        }
        if let Some(limit) = concurrency {
            config.max_concurrency = limit;
        }
        config
            .validate()
            .context("invalid command-line overrides")?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_without_file() {
        let settings = CliSettings::load(None).unwrap();
        assert_eq!(settings.app.app_name, "dcf");
        assert_eq!(settings.provider.watchlist.len(), 24);
    }

    #[test]
    fn test_load_partial_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{
                "environment": "production",
                "valuation": {{"default_projection_years": 7, "fallback_policy": {{"mode": "strict"}}}},
                "provider": {{"watchlist": ["AAPL"]}}
            }}"#
        )
        .unwrap();

        let settings = CliSettings::load(Some(file.path())).unwrap();
        assert_eq!(settings.app.environment, "production");
        assert_eq!(settings.app.app_name, "dcf");
        assert_eq!(settings.valuation.default_projection_years, 7);
        assert_eq!(settings.valuation.fallback_policy, FallbackPolicy::Strict);
        assert!((settings.valuation.default_growth_rate - 0.10).abs() < f64::EPSILON);
        assert_eq!(settings.provider.watchlist, vec!["AAPL".to_string()]);
        assert!((settings.provider.risk_free_rate - 0.04).abs() < f64::EPSILON);
    }

    #[test]
    fn test_malformed_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{ not json").unwrap();
        let err = CliSettings::load(Some(file.path())).unwrap_err();
        assert!(err.to_string().contains("failed to parse config"));
    }

    #[test]
    fn test_command_line_overrides() {
        let settings = CliSettings::default();
        let args = AssumptionArgs {
            growth_rate: Some(0.0),
            strict: true,
            ..Default::default()
        };
        let config = settings.valuation_for(&args, Some(2)).unwrap();

        assert!(config.default_growth_rate.abs() < f64::EPSILON);
        assert_eq!(config.fallback_policy, FallbackPolicy::Strict);
        assert_eq!(config.max_concurrency, 2);
    }

    #[test]
    fn test_invalid_override_rejected() {
        let settings = CliSettings::default();
        let args = AssumptionArgs {
            projection_years: Some(0),
            ..Default::default()
        };
        assert!(settings.valuation_for(&args, None).is_err());
        assert!(settings.valuation_for(&AssumptionArgs::default(), Some(0)).is_err());
    }
}
