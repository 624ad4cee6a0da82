//! Ordered lookup of a concept value within a statement

use super::concepts::Metric;
use crate::report::{LineItem, StatementSet};

/// A value found in a filing and the concept it was reported under
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Extracted<'a> {
    pub value: f64,
    pub concept: &'a str,
}

/// Scan `section` in order and read the first line tagged with any of `candidates`
///
/// The first matching line decides: if its value does not parse, the result
/// is `None` even when a later line would have matched.
pub fn extract<'a>(section: &'a [LineItem], candidates: &[&str]) -> Option<Extracted<'a>> {
    let item = section
        .iter()
        .find(|item| candidates.contains(&item.concept.as_str()))?;

    let value = item.value.as_ref()?.as_f64()?;
    Some(Extracted {
        value,
        concept: item.concept.as_str(),
    })
}

/// Look up `metric` in the statement it belongs to
pub fn extract_metric(statements: &StatementSet, metric: Metric) -> Option<Extracted<'_>> {
    let found = extract(statements.section(metric.section()), metric.candidates());
    match &found {
        Some(hit) => tracing::trace!(
            metric = metric.label(),
            concept = hit.concept,
            value = hit.value,
            "Extracted"
        ),
        None => tracing::trace!(metric = metric.label(), "No usable concept"),
    }
    found
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::{ReportedValue, Section};

    #[test]
    fn test_first_matching_line_wins() {
        let items = vec![
            LineItem::new("us-gaap_GrossProfit", 5.0),
            LineItem::new("us-gaap_SalesRevenueNet", 10.0),
            LineItem::new("us-gaap_Revenues", 20.0),
        ];

        let hit = extract(&items, Metric::Revenue.candidates()).unwrap();
        assert!((hit.value - 10.0).abs() < f64::EPSILON);
        assert_eq!(hit.concept, "us-gaap_SalesRevenueNet");
    }

    #[test]
    fn test_no_match() {
        let items = vec![LineItem::new("us-gaap_GrossProfit", 5.0)];
        assert!(extract(&items, Metric::Revenue.candidates()).is_none());
        assert!(extract(&[], Metric::Revenue.candidates()).is_none());
    }

    #[test]
    fn test_unparseable_first_match_is_missing() {
        let items = vec![
            LineItem::new("us-gaap_Revenues", "not a number"),
            LineItem::new("us-gaap_SalesRevenueNet", 10.0),
        ];
        assert!(extract(&items, Metric::Revenue.candidates()).is_none());
    }

    #[test]
    fn test_null_value_is_missing() {
        let items = vec![LineItem {
            concept: "us-gaap_Revenues".to_string(),
            value: None,
            unit: None,
            label: None,
        }];
        assert!(extract(&items, Metric::Revenue.candidates()).is_none());
    }

    #[test]
    fn test_string_values_parse() {
        let items = vec![LineItem {
            concept: "us-gaap_OperatingIncomeLoss".to_string(),
            value: Some(ReportedValue::Text("1.2e11".to_string())),
            unit: Some("usd".to_string()),
            label: None,
        }];
        let hit = extract(&items, Metric::OperatingIncome.candidates()).unwrap();
        assert!((hit.value - 1.2e11).abs() < 1.0);
    }

    #[test]
    fn test_extract_metric_uses_its_section() {
        let statements = StatementSet::default()
            .with_item(Section::Income, "us-gaap_LongTermDebt", 1.0)
            .with_item(Section::BalanceSheet, "us-gaap_LongTermDebt", 2.0);

        let hit = extract_metric(&statements, Metric::TotalDebt).unwrap();
        assert!((hit.value - 2.0).abs() < f64::EPSILON);
    }
}
