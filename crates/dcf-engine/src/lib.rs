//! Discounted cash flow price targets from reported financial statements
//!
//! This crate turns a company's reported filings, a market quote and a few
//! risk inputs into a per-share intrinsic value. It includes:
//!
//! - Annual report selection from a list of filings
//! - Concept extraction through a fixed metric to us-gaap identifier table
//! - Configurable fallbacks with a strict mode and an audit trail
//! - Unit normalization for filings reported in thousands
//! - NOPAT, free cash flow, CAPM and WACC with a surfaced sanity clamp
//! - Explicit projection, Gordon growth terminal value and the equity bridge
//! - Payload adapters for the Finnhub endpoints the inputs usually come from
//! - Concurrent batch valuation over an async input source
//!
//! # Example
//!
//! ```rust,ignore
//! use dcf_engine::{DcfEngine, ValuationConfig, ValuationInputs};
//!
//! fn main() -> anyhow::Result<()> {
//!     let config = ValuationConfig::builder().growth_rate(0.08).build()?;
//!     let engine = DcfEngine::new(config);
//!
//!     let inputs = ValuationInputs::from_json(&std::fs::read_to_string("AAPL.json")?)?;
//!     let result = engine.compute(&inputs)?;
//!     println!("{}: {:.2} (wacc {:.4})", result.ticker, result.price_target, result.wacc);
//!
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod batch;
pub mod config;
pub mod engine;
pub mod error;
pub mod extract;
pub mod inputs;
pub mod report;

// Re-export main types for convenience
pub use api::{BasicFinancials, CompanyProfile, ProviderPayloads, QuoteSnapshot};
pub use batch::{BatchFailure, BatchReport, BatchValuator, InputSource};
pub use config::{
    FallbackPolicy, FallbackValues, ProviderSettings, ValuationConfig, ValuationConfigBuilder,
};
pub use engine::{AssumptionSnapshot, DcfEngine, ValuationBreakdown, ValuationResult};
pub use error::{Result, ValuationError};
pub use extract::{DefaultReason, DefaultedField, FallbackField, Metric, SoftDefault};
pub use inputs::{MarketData, RiskMetrics, ValuationAssumptions, ValuationInputs, ValuationOptions};
pub use report::{FinancialReport, FinancialsReported, LineItem, ReportedValue, Section, StatementSet};
