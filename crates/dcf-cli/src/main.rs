//! Command-line interface for the dcf valuation engine

mod cli;
mod commands;
mod output;
mod settings;
mod source;

use clap::Parser;
use tracing::info;

use crate::cli::Cli;
use crate::settings::CliSettings;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    dcf_utils::init_tracing(cli.log_format);

    let settings = CliSettings::load(cli.config.as_deref())?;
    info!(
        app = %settings.app.app_name,
        environment = %settings.app.environment,
        "Starting dcf"
    );

    let out = commands::run(&cli, &settings).await?;
    println!("{out}");

    Ok(())
}
