//! CLI argument definitions
//!
//! # Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `value` | Value one ticker from an input bundle |
//! | `batch` | Value many tickers from a directory of bundles |
//! | `concepts` | List the concept identifiers read for each metric |

use clap::{Args, Parser, Subcommand, ValueEnum};
use dcf_engine::ValuationOptions;
use dcf_utils::LogFormat;
use std::path::PathBuf;

/// Discounted cash flow price targets from reported financials
#[derive(Debug, Parser)]
#[command(name = "dcf", author, version, about, long_about = None)]
pub struct Cli {
    /// JSON settings file; absent keys keep their defaults
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Log output format (text, json)
    #[arg(long, global = true, default_value = "text")]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Value one ticker from an input bundle
    Value(ValueArgs),
    /// Value every requested ticker found in a directory
    Batch(BatchArgs),
    /// List the metric to concept table
    Concepts(ConceptsArgs),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Json,
    #[default]
    Table,
}

/// Projection overrides shared by both valuation commands
#[derive(Debug, Clone, Default, Args)]
pub struct AssumptionArgs {
    /// Annual FCF growth rate over the projection horizon
    #[arg(long, allow_negative_numbers = true)]
    pub growth_rate: Option<f64>,

    /// Number of projected years
    #[arg(long)]
    pub projection_years: Option<u32>,

    /// Perpetual growth rate of the terminal value
    #[arg(long, allow_negative_numbers = true)]
    pub terminal_growth_rate: Option<f64>,

    /// Fail instead of substituting fallback figures
    #[arg(long, default_value_t = false)]
    pub strict: bool,
}

impl AssumptionArgs {
    /// Layer flags over options already present in a bundle
    pub fn apply_to(&self, options: ValuationOptions) -> ValuationOptions {
        ValuationOptions {
            growth_rate: self.growth_rate.or(options.growth_rate),
            projection_years: self.projection_years.or(options.projection_years),
            terminal_growth_rate: self.terminal_growth_rate.or(options.terminal_growth_rate),
        }
    }
}

#[derive(Debug, Args)]
pub struct ValueArgs {
    /// Input bundle or provider payload file
    pub bundle: PathBuf,

    #[command(flatten)]
    pub assumptions: AssumptionArgs,

    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,
}

#[derive(Debug, Args)]
pub struct BatchArgs {
    /// Directory holding one `<TICKER>.json` per ticker
    pub dir: PathBuf,

    /// Comma separated tickers; defaults to the configured watchlist
    #[arg(long, value_delimiter = ',')]
    pub tickers: Option<Vec<String>>,

    /// Maximum number of tickers valued at once
    #[arg(long)]
    pub concurrency: Option<usize>,

    #[command(flatten)]
    pub assumptions: AssumptionArgs,

    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,
}

#[derive(Debug, Args)]
pub struct ConceptsArgs {
    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_value() {
        let cli = Cli::try_parse_from([
            "dcf",
            "value",
            "AAPL.json",
            "--growth-rate",
            "0.08",
            "--strict",
            "--format",
            "json",
        ])
        .unwrap();

        let Command::Value(args) = cli.command else {
            panic!("expected value command");
        };
        assert_eq!(args.bundle, PathBuf::from("AAPL.json"));
        assert_eq!(args.assumptions.growth_rate, Some(0.08));
        assert!(args.assumptions.strict);
        assert_eq!(args.format, OutputFormat::Json);
        assert_eq!(cli.log_format, LogFormat::Text);
    }

    #[test]
    fn test_parse_batch() {
        let cli = Cli::try_parse_from([
            "dcf",
            "--log-format",
            "json",
            "batch",
            "data",
            "--tickers",
            "AAPL,MSFT",
            "--concurrency",
            "4",
        ])
        .unwrap();

        let Command::Batch(args) = cli.command else {
            panic!("expected batch command");
        };
        assert_eq!(
            args.tickers,
            Some(vec!["AAPL".to_string(), "MSFT".to_string()])
        );
        assert_eq!(args.concurrency, Some(4));
        assert_eq!(args.format, OutputFormat::Table);
        assert_eq!(cli.log_format, LogFormat::Json);
    }

    #[test]
    fn test_global_config_flag() {
        let cli = Cli::try_parse_from(["dcf", "concepts", "--config", "dcf.json"]).unwrap();
        assert!(matches!(cli.command, Command::Concepts(_)));
        assert_eq!(cli.config, Some(PathBuf::from("dcf.json")));
    }

    #[test]
    fn test_flags_override_bundle_options() {
        let args = AssumptionArgs {
            projection_years: Some(7),
            ..Default::default()
        };
        let options = args.apply_to(ValuationOptions {
            growth_rate: Some(0.05),
            projection_years: Some(3),
            terminal_growth_rate: None,
        });

        assert_eq!(options.growth_rate, Some(0.05));
        assert_eq!(options.projection_years, Some(7));
        assert_eq!(options.terminal_growth_rate, None);
    }

    #[test]
    fn test_cli_definition() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
