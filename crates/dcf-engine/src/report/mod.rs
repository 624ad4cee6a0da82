//! Filings: data model and annual report selection

pub mod model;
pub mod selector;

pub use model::{
    ANNUAL_FORM, FinancialReport, FinancialsReported, LineItem, ReportedValue, Section,
    StatementSet,
};
pub use selector::select_latest_annual;
