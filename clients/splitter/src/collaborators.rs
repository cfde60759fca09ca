//! The three external services a contribution depends on.

use aptfund_common::{Campaign, Organization, TransferRecord};

use crate::error::{DirectoryError, LedgerError, SignerError};
use crate::msg::TransferInstruction;

/// Signs and submits a single transfer from the connected wallet.
///
/// Implementations decide the signing protocol and network. Callers await the
/// result without a timeout.
#[allow(async_fn_in_trait)]
pub trait WalletSigner {
    /// Returns the committed transaction hash.
    async fn sign_and_submit(&self, instruction: &TransferInstruction)
        -> Result<String, SignerError>;
}

/// Read-only source of campaigns and organizations.
#[allow(async_fn_in_trait)]
pub trait CampaignDirectory {
    async fn campaigns(&self) -> Result<Vec<Campaign>, DirectoryError>;

    async fn campaign(&self, campaign_id: &str) -> Result<Campaign, DirectoryError>;

    /// All organizations, verified or not.
    async fn organizations(&self) -> Result<Vec<Organization>, DirectoryError>;
}

/// Append-only store of completed transfers.
#[allow(async_fn_in_trait)]
pub trait LedgerRecorder {
    async fn record_transfer(&self, record: &TransferRecord) -> Result<(), LedgerError>;

    /// Transfers recorded for a campaign, newest first.
    async fn transfers(&self, campaign_id: &str) -> Result<Vec<TransferRecord>, LedgerError>;
}
