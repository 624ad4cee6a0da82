//! Picks the filing a valuation is based on

use super::model::{FinancialReport, StatementSet};
use crate::error::{Result, ValuationError};

/// Select the latest annual report
///
/// Reports are expected most recent first; the first annual entry wins and
/// no date comparison takes place. The chosen report must carry all three
/// statements, each non-empty.
pub fn select_latest_annual<'a>(
    ticker: &str,
    reports: &'a [FinancialReport],
) -> Result<(&'a FinancialReport, &'a StatementSet)> {
    if reports.is_empty() {
        return Err(ValuationError::missing(
            ticker,
            "no financial reports available",
        ));
    }

    let latest = reports
        .iter()
        .find(|r| r.is_annual())
        .ok_or_else(|| ValuationError::missing(ticker, "no annual financial reports available"))?;

    let statements = latest
        .report
        .as_ref()
        .ok_or_else(|| ValuationError::missing(ticker, "incomplete financial report data"))?;

    let empty = statements.empty_sections();
    if !empty.is_empty() {
        let names: Vec<&str> = empty.iter().map(|s| s.code()).collect();
        return Err(ValuationError::missing(
            ticker,
            format!(
                "incomplete financial report data: missing {}",
                names.join(", ")
            ),
        ));
    }

    tracing::debug!(
        ticker,
        year = latest.year,
        filed = latest.filed_date.as_deref(),
        "Selected annual report"
    );

    Ok((latest, statements))
}
