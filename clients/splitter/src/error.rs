use aptfund_common::{AddressError, AmountError, TransferRecord};
use thiserror::Error;

/// Shown for every failure after validation. Which beneficiary failed, and
/// whether the transfer or the ledger post failed, stays in the typed error.
pub const GENERIC_FAILURE_MESSAGE: &str = "Your donation could not be completed.";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SignerError {
    #[error("transfer rejected: {reason}")]
    Rejected { reason: String },

    #[error("wallet disconnected")]
    Disconnected,

    #[error("transfer submission failed: {reason}")]
    Submission { reason: String },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    #[error("ledger unavailable: {reason}")]
    Unavailable { reason: String },

    #[error("ledger rejected the request with status {status}: {body}")]
    Rejected { status: u16, body: String },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DirectoryError {
    #[error("campaign {campaign_id} not found")]
    NotFound { campaign_id: String },

    #[error("campaign directory unavailable: {reason}")]
    Unavailable { reason: String },
}

/// Loading a campaign view touches both the directory and the ledger.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QueryError {
    #[error(transparent)]
    Directory(#[from] DirectoryError),

    #[error(transparent)]
    Ledger(#[from] LedgerError),
}

/// Problems caught before any transfer is attempted.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("connect a wallet before donating")]
    MissingWallet,

    #[error("invalid wallet address: {0}")]
    Wallet(#[from] AddressError),

    #[error("{0}")]
    Amount(#[from] AmountError),

    #[error("campaign {campaign_id} has no beneficiaries")]
    NoBeneficiaries { campaign_id: String },

    #[error("cannot compute share for beneficiary {beneficiary_id}: {source}")]
    Share {
        beneficiary_id: String,
        source: AmountError,
    },

    #[error("shares for campaign {campaign_id} add up to more than can be transferred")]
    ShareTotalOverflow { campaign_id: String },

    #[error("campaign is not loaded")]
    CampaignNotLoaded,

    #[error("a donation is already being processed")]
    SubmissionInFlight,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SplitError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("transfer to beneficiary {beneficiary_id} failed: {source}")]
    Signer {
        beneficiary_id: String,
        source: SignerError,
        /// Transfers completed and recorded before the failure.
        recorded: Vec<TransferRecord>,
    },

    #[error(
        "transfer {} to beneficiary {} succeeded but was not recorded: {source}",
        .unrecorded.transaction_hash,
        .unrecorded.beneficiary_id
    )]
    Ledger {
        /// Committed on-chain, missing from the ledger.
        unrecorded: TransferRecord,
        source: LedgerError,
        recorded: Vec<TransferRecord>,
    },
}

impl SplitError {
    /// Records that made it into the ledger before the run stopped.
    pub fn recorded(&self) -> &[TransferRecord] {
        match self {
            SplitError::Validation(_) => &[],
            SplitError::Signer { recorded, .. } | SplitError::Ledger { recorded, .. } => {
                recorded.as_slice()
            }
        }
    }

    pub fn failed_beneficiary(&self) -> Option<&str> {
        match self {
            SplitError::Validation(_) => None,
            SplitError::Signer { beneficiary_id, .. } => Some(beneficiary_id.as_str()),
            SplitError::Ledger { unrecorded, .. } => Some(unrecorded.beneficiary_id.as_str()),
        }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, SplitError::Validation(_))
    }

    /// Text for the donation dialog. Signer and ledger failures read the same.
    pub fn user_message(&self) -> String {
        match self {
            SplitError::Validation(e) => e.to_string(),
            SplitError::Signer { .. } | SplitError::Ledger { .. } => {
                GENERIC_FAILURE_MESSAGE.to_string()
            }
        }
    }
}
