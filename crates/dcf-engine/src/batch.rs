//! Concurrent valuation of many tickers

use crate::engine::{DcfEngine, ValuationResult};
use crate::error::{Result, ValuationError};
use crate::inputs::ValuationInputs;
use async_trait::async_trait;
use futures::stream::{self, StreamExt};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Supplies valuation inputs for a ticker
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait InputSource: Send + Sync {
    /// Load everything needed to value `ticker`
    async fn load(&self, ticker: &str) -> Result<ValuationInputs>;
}

/// A ticker that could not be valued
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchFailure {
    pub ticker: String,
    pub error: String,
    /// Failure caused by the filings or quote rather than the source
    pub data_error: bool,
}

impl BatchFailure {
    fn new(ticker: &str, error: &ValuationError) -> Self {
        Self {
            ticker: ticker.to_string(),
            error: error.to_string(),
            data_error: error.is_data_error(),
        }
    }
}

/// Outcome of a batch, both lists in the order tickers were requested
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchReport {
    pub successes: Vec<ValuationResult>,
    pub failures: Vec<BatchFailure>,
}

impl BatchReport {
    pub fn total(&self) -> usize {
        self.successes.len() + self.failures.len()
    }

    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Values tickers from an [`InputSource`] with bounded concurrency
pub struct BatchValuator {
    engine: Arc<DcfEngine>,
    source: Arc<dyn InputSource>,
    max_concurrency: usize,
}

impl BatchValuator {
    pub fn new(engine: DcfEngine, source: Arc<dyn InputSource>) -> Self {
        let max_concurrency = engine.config().max_concurrency.max(1);
        Self {
            engine: Arc::new(engine),
            source,
            max_concurrency,
        }
    }

    /// Override the configured concurrency limit; zero is raised to one
    pub fn with_max_concurrency(mut self, limit: usize) -> Self {
        self.max_concurrency = limit.max(1);
        self
    }

    async fn value_one(&self, ticker: &str) -> std::result::Result<ValuationResult, BatchFailure> {
        let inputs = self.source.load(ticker).await.map_err(|e| {
            tracing::warn!(ticker, error = %e, "Failed to load inputs");
            BatchFailure::new(ticker, &e)
        })?;
        self.engine.compute(&inputs).map_err(|e| {
            tracing::warn!(ticker, error = %e, "Valuation failed");
            BatchFailure::new(ticker, &e)
        })
    }

    /// Value every ticker; one failure never aborts the others
    pub async fn run<S: AsRef<str>>(&self, tickers: &[S]) -> BatchReport {
        tracing::info!(
            tickers = tickers.len(),
            max_concurrency = self.max_concurrency,
            "Starting batch valuation"
        );

        let mut outcomes: Vec<_> = stream::iter(tickers.iter().enumerate())
            .map(|(index, ticker)| async move { (index, self.value_one(ticker.as_ref()).await) })
            .buffer_unordered(self.max_concurrency)
            .collect()
            .await;
        outcomes.sort_by_key(|(index, _)| *index);

        let mut report = BatchReport::default();
        for (_, outcome) in outcomes {
            match outcome {
                Ok(result) => report.successes.push(result),
                Err(failure) => report.failures.push(failure),
            }
        }

        tracing::info!(
            succeeded = report.successes.len(),
            failed = report.failures.len(),
            "Batch valuation finished"
        );
        report
    }
}
