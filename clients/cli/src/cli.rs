//! Command-line argument parsing.

use aptfund_http::DEFAULT_API_URL;
use clap::{Parser, Subcommand};

/// APT Fund campaign browser and donation splitter.
#[derive(Parser, Debug, Clone)]
#[command(name = "aptfund")]
#[command(about = "Browse APT Fund campaigns and split donations across beneficiaries")]
#[command(version)]
pub struct Cli {
    /// Backend API base URL.
    #[arg(long, env = "APTFUND_API_URL", default_value = DEFAULT_API_URL)]
    pub api_url: String,

    /// Wallet bridge base URL.
    #[arg(long, env = "APTFUND_WALLET_BRIDGE", default_value = "http://127.0.0.1:7878")]
    pub wallet_bridge: String,

    /// Coin type donations are paid in.
    #[arg(long, env = "APTFUND_ASSET_TYPE", default_value = "0x1::aptos_coin::AptosCoin")]
    pub asset_type: String,

    /// Minor-unit precision of the asset.
    #[arg(
        long,
        env = "APTFUND_ASSET_DECIMALS",
        default_value_t = 8,
        value_parser = clap::value_parser!(u32).range(0..=18)
    )]
    pub asset_decimals: u32,

    /// Display symbol of the asset.
    #[arg(long, default_value = "APT")]
    pub asset_symbol: String,

    /// Print JSON instead of text.
    #[arg(long)]
    pub json: bool,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, default_value = "info")]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// List all campaigns.
    Campaigns,

    /// List verified organizations.
    Organizations,

    /// Show one campaign with its beneficiaries and recent donations.
    Show { campaign_id: String },

    /// Split a donation across a campaign's beneficiaries.
    Donate {
        campaign_id: String,

        /// Total amount in whole units, e.g. 10 or 2.5.
        #[arg(long)]
        amount: String,

        /// Donor wallet address. Asks the wallet bridge when omitted.
        #[arg(long)]
        wallet: Option<String>,

        /// Sign nothing and record in memory; campaign data is still fetched.
        #[arg(long)]
        dry_run: bool,
    },
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
