//! View state for a campaign page and the reducer that drives it.
//!
//! State is never mutated in place by callers: every change goes through
//! [`reduce`], which takes the current snapshot and an action and returns the
//! next snapshot.

use aptfund_common::{Campaign, TransferRecord};
use cosmwasm_std::Uint128;

use crate::query::newest_transfers;

/// A remote value and where its fetch stands.
#[derive(Clone, Debug, PartialEq)]
pub enum Load<T> {
    Idle,
    Loading,
    Loaded(T),
    Failed(String),
}

impl<T> Default for Load<T> {
    fn default() -> Self {
        Load::Idle
    }
}

impl<T> Load<T> {
    pub fn loaded(&self) -> Option<&T> {
        match self {
            Load::Loaded(value) => Some(value),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, Load::Loading)
    }
}

/// The donation dialog. `id` changes every time the dialog is opened so that
/// results belonging to an earlier opening can be told apart.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DialogState {
    pub open: bool,
    pub id: u64,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum ContributionStatus {
    #[default]
    NotStarted,
    /// Rejected before any transfer; nothing happened.
    Invalid { message: String },
    InProgress,
    Succeeded { transfers: usize, transferred: Uint128 },
    /// Stopped partway. `recorded` transfers made it into the ledger.
    Aborted { message: String, recorded: usize },
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct CampaignViewState {
    pub campaign_id: Option<String>,
    pub campaign: Load<Campaign>,
    /// Recorded transfers for the campaign, newest first.
    pub transfers: Vec<TransferRecord>,
    pub dialog: DialogState,
    pub contribution: ContributionStatus,
}

impl CampaignViewState {
    /// Most recent `n` donations, for the sidebar list.
    pub fn recent_transfers(&self, n: usize) -> &[TransferRecord] {
        newest_transfers(&self.transfers, n)
    }

    fn accepts(&self, dialog_id: u64) -> bool {
        self.dialog.open && self.dialog.id == dialog_id
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum ViewAction {
    CampaignRequested {
        campaign_id: String,
    },
    CampaignLoaded {
        campaign: Campaign,
        transfers: Vec<TransferRecord>,
    },
    CampaignFailed {
        message: String,
    },
    DialogOpened,
    DialogDismissed,
    ContributionStarted {
        dialog_id: u64,
    },
    ContributionInvalid {
        dialog_id: u64,
        message: String,
    },
    ContributionSucceeded {
        dialog_id: u64,
        transfers: usize,
        transferred: Uint128,
    },
    ContributionAborted {
        dialog_id: u64,
        message: String,
        recorded: usize,
    },
}

/// Apply `action` to `state`.
///
/// Contribution results whose `dialog_id` is not the open dialog are dropped.
pub fn reduce(state: &CampaignViewState, action: ViewAction) -> CampaignViewState {
    let mut next = state.clone();
    match action {
        ViewAction::CampaignRequested { campaign_id } => {
            let same_campaign = state.campaign_id.as_deref() == Some(campaign_id.as_str());
            // A refresh keeps the page on screen
            if !(same_campaign && state.campaign.loaded().is_some()) {
                next.campaign = Load::Loading;
                next.transfers.clear();
            }
            next.campaign_id = Some(campaign_id);
        }
        ViewAction::CampaignLoaded {
            campaign,
            transfers,
        } => {
            next.campaign_id = Some(campaign.id.clone());
            next.campaign = Load::Loaded(campaign);
            next.transfers = transfers;
        }
        ViewAction::CampaignFailed { message } => {
            if state.campaign.loaded().is_none() {
                next.campaign = Load::Failed(message);
            }
        }
        ViewAction::DialogOpened => {
            next.dialog = DialogState {
                open: true,
                id: state.dialog.id + 1,
            };
            next.contribution = ContributionStatus::NotStarted;
        }
        ViewAction::DialogDismissed => {
            next.dialog.open = false;
            next.contribution = ContributionStatus::NotStarted;
        }
        ViewAction::ContributionStarted { dialog_id } => {
            if state.accepts(dialog_id) {
                next.contribution = ContributionStatus::InProgress;
            }
        }
        ViewAction::ContributionInvalid { dialog_id, message } => {
            if state.accepts(dialog_id) {
                next.contribution = ContributionStatus::Invalid { message };
            }
        }
        ViewAction::ContributionSucceeded {
            dialog_id,
            transfers,
            transferred,
        } => {
            if state.accepts(dialog_id) {
                next.contribution = ContributionStatus::Succeeded {
                    transfers,
                    transferred,
                };
            }
        }
        ViewAction::ContributionAborted {
            dialog_id,
            message,
            recorded,
        } => {
            if state.accepts(dialog_id) {
                next.contribution = ContributionStatus::Aborted { message, recorded };
            }
        }
    }
    next
}
