//! Reported financial statements as delivered by the filings provider

use serde::{Deserialize, Serialize};

/// Form type of an annual report
pub const ANNUAL_FORM: &str = "10-K";

/// Statement section of a filing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Section {
    /// Balance sheet (`bs`)
    BalanceSheet,
    /// Cash-flow statement (`cf`)
    CashFlow,
    /// Income statement (`ic`)
    Income,
}

impl Section {
    pub fn code(&self) -> &'static str {
        match self {
            Section::BalanceSheet => "bs",
            Section::CashFlow => "cf",
            Section::Income => "ic",
        }
    }
}

/// A reported value; filers deliver both JSON numbers and numeric strings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ReportedValue {
    Number(f64),
    Text(String),
}

impl ReportedValue {
    /// Numeric reading of the value
    ///
    /// Strings are trimmed and must parse in full. NaN counts as missing;
    /// infinities are kept and left to the caller.
    pub fn as_f64(&self) -> Option<f64> {
        let value = match self {
            ReportedValue::Number(n) => *n,
            ReportedValue::Text(s) => s.trim().parse::<f64>().ok()?,
        };
        (!value.is_nan()).then_some(value)
    }
}

impl From<f64> for ReportedValue {
    fn from(value: f64) -> Self {
        ReportedValue::Number(value)
    }
}

impl From<&str> for ReportedValue {
    fn from(value: &str) -> Self {
        ReportedValue::Text(value.to_string())
    }
}

/// One tagged line of a statement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    /// Concept identifier, e.g. `us-gaap_Revenues`
    pub concept: String,
    #[serde(default)]
    pub value: Option<ReportedValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl LineItem {
    pub fn new(concept: impl Into<String>, value: impl Into<ReportedValue>) -> Self {
        Self {
            concept: concept.into(),
            value: Some(value.into()),
            unit: None,
            label: None,
        }
    }
}

/// The three statements of a filing
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StatementSet {
    #[serde(default)]
    pub bs: Vec<LineItem>,
    #[serde(default)]
    pub cf: Vec<LineItem>,
    #[serde(default)]
    pub ic: Vec<LineItem>,
}

impl StatementSet {
    pub fn section(&self, section: Section) -> &[LineItem] {
        match section {
            Section::BalanceSheet => &self.bs,
            Section::CashFlow => &self.cf,
            Section::Income => &self.ic,
        }
    }

    /// Append a line to a section
    pub fn with_item(
        mut self,
        section: Section,
        concept: impl Into<String>,
        value: impl Into<ReportedValue>,
    ) -> Self {
        let item = LineItem::new(concept, value);
        match section {
            Section::BalanceSheet => self.bs.push(item),
            Section::CashFlow => self.cf.push(item),
            Section::Income => self.ic.push(item),
        }
        self
    }

    /// Sections that are absent or empty
    pub fn empty_sections(&self) -> Vec<Section> {
        [Section::BalanceSheet, Section::CashFlow, Section::Income]
            .into_iter()
            .filter(|s| self.section(*s).is_empty())
            .collect()
    }
}

/// One filing
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinancialReport {
    /// Form type, e.g. `10-K` or `10-Q`
    #[serde(default)]
    pub form: Option<String>,
    /// Fiscal quarter; `0` marks an annual report
    #[serde(default)]
    pub quarter: Option<u32>,
    #[serde(default)]
    pub year: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filed_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_number: Option<String>,
    #[serde(default)]
    pub report: Option<StatementSet>,
}

impl FinancialReport {
    /// Annual 10-K report with the given statements
    pub fn annual(statements: StatementSet) -> Self {
        Self {
            form: Some(ANNUAL_FORM.to_string()),
            quarter: Some(0),
            report: Some(statements),
            ..Self::default()
        }
    }

    /// Quarterly 10-Q report with the given statements
    pub fn quarterly(quarter: u32, statements: StatementSet) -> Self {
        Self {
            form: Some("10-Q".to_string()),
            quarter: Some(quarter),
            report: Some(statements),
            ..Self::default()
        }
    }

    pub fn is_annual(&self) -> bool {
        self.form.as_deref() == Some(ANNUAL_FORM) || self.quarter == Some(0)
    }
}

/// Envelope of the provider's reported-financials endpoint
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FinancialsReported {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub symbol: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cik: Option<String>,
    /// Filings, most recent first
    #[serde(default)]
    pub data: Vec<FinancialReport>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reported_value_parsing() {
        assert_eq!(ReportedValue::from(12.5).as_f64(), Some(12.5));
        assert_eq!(ReportedValue::from(" 1000 ").as_f64(), Some(1000.0));
        assert_eq!(ReportedValue::from("-2.7e10").as_f64(), Some(-2.7e10));
        assert_eq!(ReportedValue::from("n/a").as_f64(), None);
        assert_eq!(ReportedValue::from("NaN").as_f64(), None);
        assert_eq!(ReportedValue::from("").as_f64(), None);
        assert_eq!(ReportedValue::from("inf").as_f64(), Some(f64::INFINITY));
    }

    #[test]
    fn test_deserialize_provider_payload() {
        let json = r#"{
            "cik": "320193",
            "symbol": "AAPL",
            "data": [{
                "accessNumber": "0000320193-23-000106",
                "symbol": "AAPL",
                "year": 2023,
                "quarter": 0,
                "form": "10-K",
                "startDate": "2022-09-25 00:00:00",
                "endDate": "2023-09-30 00:00:00",
                "filedDate": "2023-11-03 00:00:00",
                "report": {
                    "bs": [{"concept": "us-gaap_LongTermDebtNoncurrent", "unit": "usd", "label": "Term debt", "value": 95281000000}],
                    "cf": [{"concept": "us-gaap_DepreciationDepletionAndAmortization", "unit": "usd", "label": "D&A", "value": "11519000000"}],
                    "ic": [{"concept": "us-gaap_Revenues", "unit": "usd", "label": "Revenue", "value": null}]
                }
            }]
        }"#;

        let payload: FinancialsReported = serde_json::from_str(json).unwrap();
        assert_eq!(payload.symbol.as_deref(), Some("AAPL"));
        let report = &payload.data[0];
        assert!(report.is_annual());
        assert_eq!(report.year, Some(2023));
        assert_eq!(report.filed_date.as_deref(), Some("2023-11-03 00:00:00"));

        let statements = report.report.as_ref().unwrap();
        assert_eq!(statements.bs[0].value, Some(ReportedValue::Number(95_281_000_000.0)));
        assert_eq!(statements.cf[0].value.as_ref().and_then(ReportedValue::as_f64), Some(11_519_000_000.0));
        assert_eq!(statements.ic[0].value, None);
    }

    #[test]
    fn test_annual_detection() {
        let mut report = FinancialReport::quarterly(2, StatementSet::default());
        assert!(!report.is_annual());

        report.quarter = Some(0);
        assert!(report.is_annual());

        let report = FinancialReport {
            form: Some("10-K".to_string()),
            quarter: None,
            ..FinancialReport::default()
        };
        assert!(report.is_annual());
    }

    #[test]
    fn test_empty_sections() {
        let statements = StatementSet::default().with_item(Section::Income, "us-gaap_Revenues", 1.0);
        assert_eq!(
            statements.empty_sections(),
            vec![Section::BalanceSheet, Section::CashFlow]
        );
    }
}
