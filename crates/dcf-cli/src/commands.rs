//! Command implementations

use anyhow::Context;
use dcf_engine::{BatchValuator, DcfEngine, Metric};
use std::sync::Arc;
use tracing::info;

use crate::cli::{BatchArgs, Cli, Command, ValueArgs};
use crate::output;
use crate::settings::CliSettings;
use crate::source::{DirectorySource, parse_inputs, ticker_from_path};

/// Run the selected command and return what should be printed
pub async fn run(cli: &Cli, settings: &CliSettings) -> anyhow::Result<String> {
    match &cli.command {
        Command::Value(args) => value(args, settings).await,
        Command::Batch(args) => batch(args, settings).await,
        Command::Concepts(args) => {
            info!(metrics = Metric::ALL.len(), "Listing concept table");
            output::render_concepts(args.format)
        }
    }
}

async fn value(args: &ValueArgs, settings: &CliSettings) -> anyhow::Result<String> {
    let config = settings.valuation_for(&args.assumptions, None)?;
    let raw = tokio::fs::read_to_string(&args.bundle)
        .await
        .with_context(|| format!("failed to read {}", args.bundle.display()))?;
    let ticker = ticker_from_path(&args.bundle).unwrap_or_default();

    let mut inputs = parse_inputs(&raw, &ticker, &settings.provider)
        .with_context(|| format!("invalid inputs in {}", args.bundle.display()))?;
    inputs.options = args.assumptions.apply_to(inputs.options);

    let result = DcfEngine::new(config).compute(&inputs)?;
    output::render_value(&result, args.format)
}

async fn batch(args: &BatchArgs, settings: &CliSettings) -> anyhow::Result<String> {
    let config = settings.valuation_for(&args.assumptions, args.concurrency)?;
    let tickers = args
        .tickers
        .clone()
        .unwrap_or_else(|| settings.provider.watchlist.clone());
    anyhow::ensure!(!tickers.is_empty(), "no tickers to value");

    let source = DirectorySource::new(&args.dir, settings.provider.clone());
    let valuator = BatchValuator::new(DcfEngine::new(config), Arc::new(source));
    let report = valuator.run(&tickers).await;
    output::render_batch(&report, args.format)
}
