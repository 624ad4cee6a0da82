//! Error types for valuation operations

use thiserror::Error;

/// Valuation specific errors
///
/// Every variant that can arise during a calculation carries the ticker it
/// was raised for, so batch consumers can attribute failures.
#[derive(Debug, Error)]
pub enum ValuationError {
    /// No usable annual report, or an essential figure could not be extracted
    #[error("Missing data for {ticker}: {reason}")]
    MissingData { ticker: String, reason: String },

    /// A value fell outside its plausible range after correction
    #[error("Invalid {field} for {ticker}: {value} is outside [{min}, {max}]")]
    InvalidRange {
        ticker: String,
        field: String,
        value: f64,
        min: f64,
        max: f64,
    },

    /// A caller supplied assumption cannot be used
    #[error("Invalid assumption for {ticker}: {reason}")]
    InvalidAssumption { ticker: String, reason: String },

    /// Gordon growth terminal value is undefined when wacc <= terminal growth
    #[error(
        "Terminal growth rate {terminal_growth_rate} is not below discount rate {wacc} for {ticker}"
    )]
    TerminalGrowthExceedsDiscountRate {
        ticker: String,
        wacc: f64,
        terminal_growth_rate: f64,
    },

    /// The calculation overflowed despite finite inputs
    #[error("Valuation of {ticker} produced a non-finite {field}: {value}")]
    NonFiniteResult {
        ticker: String,
        field: String,
        value: f64,
    },

    /// Strict fallback policy refused to substitute a default
    #[error("No value for {field} in filings of {ticker} and defaults are disabled")]
    StrictDefault { ticker: String, field: String },

    /// An input source failed to produce inputs for a ticker
    #[error("Input source failed for {ticker}: {reason}")]
    Source { ticker: String, reason: String },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// JSON parsing error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Filesystem error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ValuationError {
    pub(crate) fn missing(ticker: &str, reason: impl Into<String>) -> Self {
        Self::MissingData {
            ticker: ticker.to_string(),
            reason: reason.into(),
        }
    }

    /// Ticker the error was raised for, if any
    pub fn ticker(&self) -> Option<&str> {
        match self {
            Self::MissingData { ticker, .. }
            | Self::InvalidRange { ticker, .. }
            | Self::InvalidAssumption { ticker, .. }
            | Self::TerminalGrowthExceedsDiscountRate { ticker, .. }
            | Self::NonFiniteResult { ticker, .. }
            | Self::StrictDefault { ticker, .. }
            | Self::Source { ticker, .. } => Some(ticker),
            Self::Config(_) | Self::Json(_) | Self::Io(_) => None,
        }
    }

    /// True when the failure stems from the filings or quote rather than
    /// from configuration or transport
    pub fn is_data_error(&self) -> bool {
        matches!(
            self,
            Self::MissingData { .. }
                | Self::InvalidRange { .. }
                | Self::NonFiniteResult { .. }
                | Self::StrictDefault { .. }
        )
    }
}

/// Result type alias for valuation operations
pub type Result<T> = std::result::Result<T, ValuationError>;
