//! Subcommand handlers. Each writes its report to `out`.

use std::io::Write;

use anyhow::{anyhow, Context};
use aptfund_common::{format_minor_units, short_address, AssetConfig, Campaign, TransferRecord};
use aptfund_http::{ApiClient, WalletBridge};
use aptfund_splitter::memory::{DryRunSigner, MemoryDirectory, MemoryLedger};
use aptfund_splitter::query::{load_campaign_view, verified_organizations};
use aptfund_splitter::{CampaignDirectory, DonationSession, LedgerRecorder, WalletSigner};
use tracing::{info, warn};

use crate::config::CliConfig;

/// Donations listed under a campaign.
const RECENT_DONATIONS: usize = 3;

pub async fn campaigns(config: &CliConfig, out: &mut impl Write) -> anyhow::Result<()> {
    let api = ApiClient::new(&config.api_url);
    let campaigns = api.campaigns().await.context("failed to list campaigns")?;

    if config.json {
        writeln!(out, "{}", serde_json::to_string_pretty(&campaigns)?)?;
        return Ok(());
    }
    for campaign in &campaigns {
        writeln!(
            out,
            "{:<12} {:<48} {} / {} {} ({}%)",
            campaign.id,
            campaign.title,
            campaign.donation_amount,
            campaign.goal_amount,
            config.asset.symbol,
            campaign.progress_percent(),
        )?;
    }
    Ok(())
}

pub async fn organizations(config: &CliConfig, out: &mut impl Write) -> anyhow::Result<()> {
    let api = ApiClient::new(&config.api_url);
    let organizations = verified_organizations(&api)
        .await
        .context("failed to list organizations")?;

    if config.json {
        writeln!(out, "{}", serde_json::to_string_pretty(&organizations)?)?;
        return Ok(());
    }
    for organization in &organizations {
        writeln!(
            out,
            "{:<12} {:<40} {}",
            organization.id,
            organization.name,
            short_address(&organization.address)
        )?;
    }
    Ok(())
}

pub async fn show(config: &CliConfig, campaign_id: &str, out: &mut impl Write) -> anyhow::Result<()> {
    let api = ApiClient::new(&config.api_url);
    let view = load_campaign_view(&api, &api, campaign_id)
        .await
        .with_context(|| format!("failed to load campaign {campaign_id}"))?;

    if config.json {
        writeln!(out, "{}", serde_json::to_string_pretty(&view.campaign)?)?;
        return Ok(());
    }
    print_campaign(
        out,
        &view.campaign,
        view.recent_transfers(RECENT_DONATIONS),
        &config.asset,
    )
}

fn print_campaign(
    out: &mut impl Write,
    campaign: &Campaign,
    recent: &[TransferRecord],
    asset: &AssetConfig,
) -> anyhow::Result<()> {
    writeln!(out, "=== {} ===", campaign.title)?;
    if let Some(organization) = &campaign.organization {
        writeln!(out, "by {}", organization.name)?;
    }
    writeln!(out)?;
    writeln!(
        out,
        "{} {} raised of {} {} goal ({}%)",
        campaign.donation_amount,
        asset.symbol,
        campaign.goal_amount,
        asset.symbol,
        campaign.progress_percent()
    )?;
    writeln!(out, "{} donations", campaign.donation_count)?;

    writeln!(out)?;
    writeln!(out, "Beneficiaries:")?;
    for beneficiary in &campaign.beneficiaries {
        writeln!(
            out,
            "  {:<40} {:>6}%  {}",
            beneficiary.name,
            beneficiary.percentage,
            short_address(&beneficiary.address)
        )?;
    }

    writeln!(out)?;
    writeln!(out, "Recent donations:")?;
    if recent.is_empty() {
        writeln!(out, "  none yet")?;
    }
    for record in recent {
        writeln!(
            out,
            "  {} donated {} {}",
            short_address(&record.from_address),
            format_minor_units(record.amount, asset.decimals)?,
            asset.symbol
        )?;
    }
    Ok(())
}

pub async fn donate(
    config: &CliConfig,
    campaign_id: &str,
    amount: &str,
    wallet: Option<&str>,
    dry_run: bool,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    let api = ApiClient::new(&config.api_url);

    if dry_run {
        let campaign = api
            .campaign(campaign_id)
            .await
            .with_context(|| format!("failed to load campaign {campaign_id}"))?;
        let ledger = MemoryLedger::new();
        let directory = MemoryDirectory::new()
            .with_campaign(campaign)
            .with_ledger(ledger.clone(), config.asset.decimals);
        let signer = DryRunSigner::new(wallet.unwrap_or_default());
        info!(campaign_id, "dry run: nothing will be signed or recorded");
        let session = DonationSession::new(directory, signer, ledger, config.asset.clone());
        return run_donation(&session, campaign_id, amount, wallet, out).await;
    }

    let wallet = match wallet {
        Some(wallet) => Some(wallet.to_string()),
        None => {
            let bridge = WalletBridge::new(&config.wallet_bridge, "");
            match bridge.connected_account().await {
                Ok(account) => Some(account),
                Err(e) => {
                    warn!(error = %e, "no wallet connected to the bridge");
                    None
                }
            }
        }
    };
    let signer = WalletBridge::new(&config.wallet_bridge, wallet.clone().unwrap_or_default());
    let session = DonationSession::new(api.clone(), signer, api, config.asset.clone());
    run_donation(&session, campaign_id, amount, wallet.as_deref(), out).await
}

/// On failure the caller only learns the dialog message. Which beneficiaries
/// were paid goes to the log.
async fn run_donation<D, S, L>(
    session: &DonationSession<D, S, L>,
    campaign_id: &str,
    amount: &str,
    wallet: Option<&str>,
    out: &mut impl Write,
) -> anyhow::Result<()>
where
    D: CampaignDirectory,
    S: WalletSigner,
    L: LedgerRecorder,
{
    let asset = session.asset();
    session
        .open(campaign_id)
        .await
        .with_context(|| format!("failed to load campaign {campaign_id}"))?;
    session.open_dialog();

    match session.submit(wallet, amount).await {
        Ok(receipt) => {
            for record in &receipt.records {
                writeln!(
                    out,
                    "paid {} {} to {}  tx {}",
                    format_minor_units(record.amount, asset.decimals)?,
                    asset.symbol,
                    short_address(&record.to_address),
                    record.transaction_hash
                )?;
            }
            for beneficiary_id in &receipt.skipped {
                writeln!(out, "skipped {beneficiary_id}: share rounds to zero")?;
            }
            writeln!(
                out,
                "Thank you! {} {} donated.",
                format_minor_units(receipt.transferred, asset.decimals)?,
                asset.symbol
            )?;
            writeln!(out)?;

            let state = session.snapshot();
            if let Some(campaign) = state.campaign.loaded() {
                print_campaign(
                    out,
                    campaign,
                    state.recent_transfers(RECENT_DONATIONS),
                    asset,
                )?;
            }
            Ok(())
        }
        Err(e) => {
            if !e.is_validation() {
                warn!(
                    error = %e,
                    beneficiary = ?e.failed_beneficiary(),
                    recorded = e.recorded().len(),
                    "donation stopped"
                );
            }
            Err(anyhow!(e.user_message()))
        }
    }
}
