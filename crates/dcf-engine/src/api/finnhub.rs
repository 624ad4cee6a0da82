//! Finnhub payload shapes and their conversion to valuation inputs
//!
//! Only deserialization lives here; fetching is left to the caller.

use crate::config::ProviderSettings;
use crate::error::{Result, ValuationError};
use crate::inputs::{MarketData, RiskMetrics, ValuationInputs};
use crate::report::FinancialsReported;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Finnhub reports share counts in millions
const PROFILE_SHARE_MULTIPLIER: f64 = 1_000_000.0;

/// `/quote` response
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QuoteSnapshot {
    /// Current price
    pub c: f64,
    /// Change
    #[serde(default)]
    pub d: Option<f64>,
    /// Percent change
    #[serde(default)]
    pub dp: Option<f64>,
    /// High of the day
    #[serde(default)]
    pub h: Option<f64>,
    /// Low of the day
    #[serde(default)]
    pub l: Option<f64>,
    /// Open price
    #[serde(default)]
    pub o: Option<f64>,
    /// Previous close
    #[serde(default)]
    pub pc: Option<f64>,
    /// UNIX timestamp
    #[serde(default)]
    pub t: Option<i64>,
}

/// `/stock/profile2` response
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyProfile {
    #[serde(default)]
    pub ticker: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub exchange: Option<String>,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub finnhub_industry: Option<String>,
    /// Market capitalization, in millions
    #[serde(default)]
    pub market_capitalization: Option<f64>,
    /// Shares outstanding, in millions
    #[serde(default)]
    pub share_outstanding: Option<f64>,
}

/// `/stock/metric?metric=all` response
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BasicFinancials {
    #[serde(default)]
    pub symbol: Option<String>,
    #[serde(default)]
    pub metric: HashMap<String, serde_json::Value>,
}

impl BasicFinancials {
    pub fn beta(&self) -> Option<f64> {
        self.metric
            .get("beta")
            .and_then(serde_json::Value::as_f64)
            .filter(|b| b.is_finite())
    }
}

impl MarketData {
    /// Price from the quote, share count from the profile scaled up from millions
    pub fn from_provider(ticker: &str, quote: &QuoteSnapshot, profile: &CompanyProfile) -> Result<Self> {
        let shares_millions = profile.share_outstanding.ok_or_else(|| {
            ValuationError::missing(ticker, "company profile has no shares outstanding")
        })?;
        Ok(Self {
            stock_price: quote.c,
            shares_outstanding: shares_millions * PROFILE_SHARE_MULTIPLIER,
        })
    }
}

impl RiskMetrics {
    /// Beta from the metrics payload; rates come from settings
    pub fn from_provider(
        ticker: &str,
        metrics: &BasicFinancials,
        settings: &ProviderSettings,
    ) -> Result<Self> {
        let beta = metrics
            .beta()
            .ok_or_else(|| ValuationError::missing(ticker, "basic financials have no beta"))?;
        Ok(Self {
            beta,
            risk_free_rate: settings.risk_free_rate,
            market_risk_premium: settings.market_risk_premium,
        })
    }
}

/// The four provider responses needed to value one ticker
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderPayloads {
    pub financials: FinancialsReported,
    pub quote: QuoteSnapshot,
    pub profile: CompanyProfile,
    pub metrics: BasicFinancials,
}

impl ProviderPayloads {
    /// Convert to engine inputs
    pub fn into_inputs(self, ticker: &str, settings: &ProviderSettings) -> Result<ValuationInputs> {
        let market_data = MarketData::from_provider(ticker, &self.quote, &self.profile)?;
        let risk_metrics = RiskMetrics::from_provider(ticker, &self.metrics, settings)?;
        Ok(ValuationInputs::new(
            ticker,
            self.financials.data,
            market_data,
            risk_metrics,
        ))
    }
}
