use aptfund_common::{Campaign, Organization, TransferRecord};

use crate::collaborators::{CampaignDirectory, LedgerRecorder};
use crate::error::{DirectoryError, QueryError};

/// Everything the campaign detail page shows.
#[derive(Clone, Debug, PartialEq)]
pub struct CampaignView {
    pub campaign: Campaign,
    /// Newest first.
    pub transfers: Vec<TransferRecord>,
}

impl CampaignView {
    pub fn recent_transfers(&self, n: usize) -> &[TransferRecord] {
        newest_transfers(&self.transfers, n)
    }
}

/// The first `n` entries of a newest-first transfer list.
pub fn newest_transfers(transfers: &[TransferRecord], n: usize) -> &[TransferRecord] {
    &transfers[..n.min(transfers.len())]
}

pub async fn load_campaign_view<D, L>(
    directory: &D,
    ledger: &L,
    campaign_id: &str,
) -> Result<CampaignView, QueryError>
where
    D: CampaignDirectory,
    L: LedgerRecorder,
{
    let campaign = directory.campaign(campaign_id).await?;
    let transfers = ledger.transfers(campaign_id).await?;
    Ok(CampaignView {
        campaign,
        transfers,
    })
}

/// Organizations that can be picked as beneficiaries.
pub async fn verified_organizations<D>(directory: &D) -> Result<Vec<Organization>, DirectoryError>
where
    D: CampaignDirectory,
{
    Ok(directory
        .organizations()
        .await?
        .into_iter()
        .filter(Organization::is_verified)
        .collect())
}
