//! Payload adapters for market-data providers

pub mod finnhub;

pub use finnhub::{BasicFinancials, CompanyProfile, ProviderPayloads, QuoteSnapshot};
