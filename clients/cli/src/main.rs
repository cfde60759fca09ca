//! `aptfund` binary: browse campaigns and split donations from the terminal.

mod cli;
mod commands;
mod config;

use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Command};
use crate::config::CliConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse_args();

    // RUST_LOG wins over --log-level
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let config = CliConfig::from_cli(&cli);
    tracing::debug!(api_url = %config.api_url, asset = %config.asset.asset_type, "configured");

    let mut out = std::io::stdout();
    match &cli.command {
        Command::Campaigns => commands::campaigns(&config, &mut out).await,
        Command::Organizations => commands::organizations(&config, &mut out).await,
        Command::Show { campaign_id } => commands::show(&config, campaign_id, &mut out).await,
        Command::Donate {
            campaign_id,
            amount,
            wallet,
            dry_run,
        } => {
            commands::donate(
                &config,
                campaign_id,
                amount,
                wallet.as_deref(),
                *dry_run,
                &mut out,
            )
            .await
        }
    }
}
