//! Filesystem input source

use async_trait::async_trait;
use dcf_engine::{InputSource, ProviderPayloads, ProviderSettings, ValuationError, ValuationInputs};
use std::path::{Path, PathBuf};

/// Parse a bundle or a set of raw provider payloads
///
/// A document with a `marketData` key is read as a [`ValuationInputs`]
/// bundle; anything else as [`ProviderPayloads`].
pub fn parse_inputs(
    raw: &str,
    ticker: &str,
    settings: &ProviderSettings,
) -> dcf_engine::Result<ValuationInputs> {
    let document: serde_json::Value = serde_json::from_str(raw)?;
    if document.get("marketData").is_some() {
        Ok(serde_json::from_value(document)?)
    } else {
        let payloads: ProviderPayloads = serde_json::from_value(document)?;
        payloads.into_inputs(ticker, settings)
    }
}

/// Ticker implied by a file name, e.g. `data/aapl.json` -> `AAPL`
pub fn ticker_from_path(path: &Path) -> Option<String> {
    path.file_stem()
        .and_then(|stem| stem.to_str())
        .map(str::to_ascii_uppercase)
}

/// Reads `<root>/<TICKER>.json` for each requested ticker
#[derive(Debug, Clone)]
pub struct DirectorySource {
    root: PathBuf,
    settings: ProviderSettings,
}

impl DirectorySource {
    pub fn new(root: impl Into<PathBuf>, settings: ProviderSettings) -> Self {
        Self {
            root: root.into(),
            settings,
        }
    }

    fn path_for(&self, ticker: &str) -> PathBuf {
        self.root.join(format!("{ticker}.json"))
    }
}

#[async_trait]
impl InputSource for DirectorySource {
    async fn load(&self, ticker: &str) -> dcf_engine::Result<ValuationInputs> {
        let path = self.path_for(ticker);
        tracing::debug!(ticker, path = %path.display(), "Loading inputs");

        let raw = tokio::fs::read_to_string(&path)
            .await
            .map_err(|e| ValuationError::Source {
                ticker: ticker.to_string(),
                reason: format!("cannot read {}: {e}", path.display()),
            })?;

        parse_inputs(&raw, ticker, &self.settings).map_err(|e| match e {
            ValuationError::Json(err) => ValuationError::Source {
                ticker: ticker.to_string(),
                reason: format!("malformed {}: {err}", path.display()),
            },
            other => other,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BUNDLE: &str = r#"{
        "ticker": "AAPL",
        "reports": [],
        "marketData": {"stockPrice": 150.0, "sharesOutstanding": 1.6e9},
        "riskMetrics": {"beta": 1.2, "riskFreeRate": 0.04, "marketRiskPremium": 0.05}
    }"#;

    const PAYLOADS: &str = r#"{
        "financials": {"symbol": "MSFT", "data": []},
        "quote": {"c": 410.0},
        "profile": {"shareOutstanding": 7430.0},
        "metrics": {"metric": {"beta": 0.9}}
    }"#;

    #[test]
    fn test_parse_bundle() {
        let inputs = parse_inputs(BUNDLE, "IGNORED", &ProviderSettings::default()).unwrap();
        assert_eq!(inputs.ticker, "AAPL");
        assert!((inputs.risk_metrics.beta - 1.2).abs() < f64::EPSILON);
    }

    #[test]
    fn test_parse_provider_payloads() {
        let settings = ProviderSettings {
            risk_free_rate: 0.045,
            ..ProviderSettings::default()
        };
        let inputs = parse_inputs(PAYLOADS, "MSFT", &settings).unwrap();

        assert_eq!(inputs.ticker, "MSFT");
        assert!((inputs.market_data.shares_outstanding - 7.43e9).abs() < 1.0);
        assert!((inputs.risk_metrics.risk_free_rate - 0.045).abs() < f64::EPSILON);
    }

    #[test]
    fn test_ticker_from_path() {
        assert_eq!(
            ticker_from_path(Path::new("data/aapl.json")),
            Some("AAPL".to_string())
        );
    }

    #[tokio::test]
    async fn test_directory_source() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("AAPL.json"), BUNDLE).unwrap();
        std::fs::write(dir.path().join("BROKEN.json"), "{").unwrap();
        let source = DirectorySource::new(dir.path(), ProviderSettings::default());

        let inputs = source.load("AAPL").await.unwrap();
        assert_eq!(inputs.ticker, "AAPL");

        let err = source.load("MISSING").await.unwrap_err();
        assert!(matches!(err, ValuationError::Source { ref ticker, .. } if ticker == "MISSING"));

        let err = source.load("BROKEN").await.unwrap_err();
        assert!(err.to_string().contains("malformed"));
    }
}
