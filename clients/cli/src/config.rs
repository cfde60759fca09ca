//! Runtime configuration.

use aptfund_common::AssetConfig;

use crate::cli::Cli;

#[derive(Debug, Clone)]
pub struct CliConfig {
    pub api_url: String,
    pub wallet_bridge: String,
    pub asset: AssetConfig,
    pub json: bool,
}

impl CliConfig {
    pub fn from_cli(cli: &Cli) -> Self {
        Self {
            api_url: cli.api_url.clone(),
            wallet_bridge: cli.wallet_bridge.clone(),
            asset: AssetConfig {
                asset_type: cli.asset_type.clone(),
                decimals: cli.asset_decimals,
                symbol: cli.asset_symbol.clone(),
            },
            json: cli.json,
        }
    }
}
