//! Contribution splitting for APT Fund campaigns.
//!
//! A contribution is delivered as one wallet transfer per beneficiary, in the
//! campaign's stored order, and every completed transfer is posted to the
//! backend ledger. The first failure stops the run; nothing already paid is
//! rolled back.

pub mod collaborators;
pub mod error;
pub mod execute;
pub mod memory;
pub mod msg;
pub mod query;
pub mod session;
pub mod state;

pub use collaborators::{CampaignDirectory, LedgerRecorder, WalletSigner};
pub use error::{DirectoryError, LedgerError, QueryError, SignerError, SplitError, ValidationError};
pub use execute::split_contribution;
pub use msg::{ContributionRequest, SplitReceipt, TransferInstruction};
pub use session::DonationSession;
pub use state::{reduce, CampaignViewState, ContributionStatus, Load, ViewAction};
