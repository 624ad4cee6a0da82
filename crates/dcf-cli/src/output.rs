//! Rendering of command results

use chrono::{DateTime, Utc};
use comfy_table::{Table, presets::UTF8_FULL};
use dcf_engine::{
    BatchReport, DefaultReason, DefaultedField, Metric, SoftDefault, ValuationResult,
};
use serde::Serialize;

use crate::cli::OutputFormat;

/// JSON output wrapper
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Envelope<'a, T: Serialize> {
    generated_at: DateTime<Utc>,
    data: &'a T,
}

fn to_json<T: Serialize>(data: &T) -> anyhow::Result<String> {
    Ok(serde_json::to_string_pretty(&Envelope {
        generated_at: Utc::now(),
        data,
    })?)
}

fn new_table() -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table
}

fn money(value: f64) -> String {
    let abs = value.abs();
    if abs >= 1e12 {
        format!("{:.2}T", value / 1e12)
    } else if abs >= 1e9 {
        format!("{:.2}B", value / 1e9)
    } else if abs >= 1e6 {
        format!("{:.2}M", value / 1e6)
    } else {
        format!("{value:.2}")
    }
}

fn percent(value: f64) -> String {
    format!("{:.2}%", value * 100.0)
}

fn default_label(entry: &SoftDefault) -> String {
    let field = match entry.field {
        DefaultedField::Fallback(field) => field.label(),
        DefaultedField::ZeroFilled(metric) => metric.label(),
    };
    let reason = match entry.reason {
        DefaultReason::Missing => "missing",
        DefaultReason::NonFinite => "not finite",
        DefaultReason::OutOfRange => "out of range",
    };
    format!("{field} = {} ({reason})", entry.value)
}

fn upside_label(result: &ValuationResult) -> String {
    result
        .upside(result.breakdown.stock_price)
        .map_or_else(|| "n/a".to_string(), percent)
}

/// Render a single valuation
pub fn render_value(result: &ValuationResult, format: OutputFormat) -> anyhow::Result<String> {
    if format == OutputFormat::Json {
        return to_json(result);
    }

    let assumptions = &result.assumptions;
    let breakdown = &result.breakdown;
    let wacc = if result.wacc_clamped {
        format!(
            "{} (computed {}, clamped)",
            percent(result.wacc),
            percent(result.raw_wacc)
        )
    } else {
        percent(result.wacc)
    };

    let mut table = new_table();
    table.set_header(vec!["Metric", "Value"]);
    let rows = [
        ("Ticker", result.ticker.clone()),
        ("Price target", format!("{:.2}", result.price_target)),
        ("Stock price", format!("{:.2}", breakdown.stock_price)),
        ("Upside", upside_label(result)),
        ("WACC", wacc),
        ("Cost of equity", percent(assumptions.cost_of_equity)),
        ("Tax rate", percent(assumptions.tax_rate)),
        ("Growth rate", percent(assumptions.growth_rate)),
        ("Projection years", assumptions.projection_years.to_string()),
        ("Terminal growth", percent(assumptions.terminal_growth_rate)),
        ("NOPAT", money(breakdown.nopat)),
        ("Initial FCF", money(breakdown.initial_fcf)),
        ("Terminal value", money(breakdown.terminal_value)),
        ("Present value", money(breakdown.present_value)),
        ("Equity value", money(breakdown.equity_value)),
        ("Shares used", money(breakdown.shares.used)),
    ];
    for (name, value) in rows {
        table.add_row(vec![name.to_string(), value]);
    }

    let mut out = table.to_string();
    if !result.defaults.is_empty() {
        let mut defaults = new_table();
        defaults.set_header(vec!["Defaulted figure"]);
        for entry in &result.defaults {
            defaults.add_row(vec![default_label(entry)]);
        }
        out.push('\n');
        out.push_str(&defaults.to_string());
    }
    Ok(out)
}

/// Render a batch outcome
pub fn render_batch(report: &BatchReport, format: OutputFormat) -> anyhow::Result<String> {
    if format == OutputFormat::Json {
        return to_json(report);
    }

    let mut table = new_table();
    table.set_header(vec![
        "Ticker",
        "Price target",
        "Stock price",
        "Upside",
        "WACC",
        "Defaults",
    ]);
    for result in &report.successes {
        let wacc = if result.wacc_clamped {
            format!("{} *", percent(result.wacc))
        } else {
            percent(result.wacc)
        };
        table.add_row(vec![
            result.ticker.clone(),
            format!("{:.2}", result.price_target),
            format!("{:.2}", result.breakdown.stock_price),
            upside_label(result),
            wacc,
            result.defaults.len().to_string(),
        ]);
    }

    let mut out = table.to_string();
    if !report.failures.is_empty() {
        let mut failures = new_table();
        failures.set_header(vec!["Ticker", "Error"]);
        for failure in &report.failures {
            failures.add_row(vec![failure.ticker.clone(), failure.error.clone()]);
        }
        out.push('\n');
        out.push_str(&failures.to_string());
    }
    out.push_str(&format!(
        "\n{} valued, {} failed\n",
        report.successes.len(),
        report.failures.len()
    ));
    Ok(out)
}

#[derive(Debug, Serialize)]
struct ConceptRow {
    metric: &'static str,
    section: &'static str,
    essential: bool,
    concepts: &'static [&'static str],
}

/// Render the metric to concept table
pub fn render_concepts(format: OutputFormat) -> anyhow::Result<String> {
    let rows: Vec<ConceptRow> = Metric::ALL
        .iter()
        .map(|metric| ConceptRow {
            metric: metric.label(),
            section: metric.section().code(),
            essential: metric.is_essential(),
            concepts: metric.candidates(),
        })
        .collect();

    if format == OutputFormat::Json {
        return to_json(&rows);
    }

    let mut table = new_table();
    table.set_header(vec!["Metric", "Section", "Essential", "Concepts"]);
    for row in &rows {
        table.add_row(vec![
            row.metric.to_string(),
            row.section.to_string(),
            if row.essential { "yes" } else { "no" }.to_string(),
            row.concepts.join("\n"),
        ]);
    }
    Ok(table.to_string())
}
