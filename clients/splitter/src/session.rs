use std::sync::atomic::{AtomicBool, Ordering};

use aptfund_common::AssetConfig;
use tokio::sync::watch;
use tracing::{debug, warn};

use crate::collaborators::{CampaignDirectory, LedgerRecorder, WalletSigner};
use crate::error::{QueryError, SplitError, ValidationError};
use crate::execute::{split_contribution, validate_request};
use crate::msg::{ContributionRequest, SplitReceipt};
use crate::query::load_campaign_view;
use crate::state::{reduce, CampaignViewState, ViewAction};

/// Clears the in-flight flag when a submission ends, however it ends.
struct InFlight<'a>(&'a AtomicBool);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// One campaign page: the collaborators plus the page's view state.
///
/// State changes go through [`reduce`]; observers get immutable snapshots
/// from [`subscribe`](Self::subscribe). All methods take `&self`, so the
/// dialog can be dismissed while a submission is still running. The running
/// submission is not cancelled; its outcome is discarded by the reducer.
pub struct DonationSession<D, S, L> {
    directory: D,
    signer: S,
    ledger: L,
    asset: AssetConfig,
    state: watch::Sender<CampaignViewState>,
    in_flight: AtomicBool,
}

impl<D, S, L> DonationSession<D, S, L>
where
    D: CampaignDirectory,
    S: WalletSigner,
    L: LedgerRecorder,
{
    pub fn new(directory: D, signer: S, ledger: L, asset: AssetConfig) -> Self {
        let (state, _) = watch::channel(CampaignViewState::default());
        Self {
            directory,
            signer,
            ledger,
            asset,
            state,
            in_flight: AtomicBool::new(false),
        }
    }

    pub fn asset(&self) -> &AssetConfig {
        &self.asset
    }

    pub fn subscribe(&self) -> watch::Receiver<CampaignViewState> {
        self.state.subscribe()
    }

    pub fn snapshot(&self) -> CampaignViewState {
        self.state.borrow().clone()
    }

    fn dispatch(&self, action: ViewAction) {
        self.state.send_modify(|state| *state = reduce(state, action));
    }

    /// Load a campaign and its recorded transfers.
    pub async fn open(&self, campaign_id: &str) -> Result<(), QueryError> {
        self.dispatch(ViewAction::CampaignRequested {
            campaign_id: campaign_id.to_string(),
        });

        match load_campaign_view(&self.directory, &self.ledger, campaign_id).await {
            Ok(view) => {
                debug!(
                    campaign_id,
                    transfers = view.transfers.len(),
                    "campaign loaded"
                );
                self.dispatch(ViewAction::CampaignLoaded {
                    campaign: view.campaign,
                    transfers: view.transfers,
                });
                Ok(())
            }
            Err(e) => {
                warn!(campaign_id, error = %e, "failed to load campaign");
                self.dispatch(ViewAction::CampaignFailed {
                    message: e.to_string(),
                });
                Err(e)
            }
        }
    }

    /// Reload the current campaign, if any.
    pub async fn refresh(&self) -> Result<(), QueryError> {
        let campaign_id = self.state.borrow().campaign_id.clone();
        match campaign_id {
            Some(id) => self.open(&id).await,
            None => Ok(()),
        }
    }

    /// Returns the new dialog id.
    pub fn open_dialog(&self) -> u64 {
        self.dispatch(ViewAction::DialogOpened);
        self.state.borrow().dialog.id
    }

    pub fn dismiss_dialog(&self) {
        self.dispatch(ViewAction::DialogDismissed);
    }

    /// Run a split contribution for the loaded campaign.
    ///
    /// On full success the campaign and its transfer list are reloaded so the
    /// running total reflects the new records.
    pub async fn submit(
        &self,
        wallet: Option<&str>,
        amount: &str,
    ) -> Result<SplitReceipt, SplitError> {
        if self.in_flight.swap(true, Ordering::SeqCst) {
            return Err(ValidationError::SubmissionInFlight.into());
        }
        let _in_flight = InFlight(&self.in_flight);

        let dialog_id = self.state.borrow().dialog.id;
        let request = ContributionRequest::new(wallet, amount);

        if let Err(e) = validate_request(&request, &self.asset) {
            self.dispatch(ViewAction::ContributionInvalid {
                dialog_id,
                message: e.to_string(),
            });
            return Err(e.into());
        }

        let campaign = self.state.borrow().campaign.loaded().cloned();
        let Some(campaign) = campaign else {
            let e = ValidationError::CampaignNotLoaded;
            self.dispatch(ViewAction::ContributionInvalid {
                dialog_id,
                message: e.to_string(),
            });
            return Err(e.into());
        };

        self.dispatch(ViewAction::ContributionStarted { dialog_id });

        let result =
            split_contribution(&self.signer, &self.ledger, &request, &campaign, &self.asset).await;

        match result {
            Ok(receipt) => {
                self.dispatch(ViewAction::ContributionSucceeded {
                    dialog_id,
                    transfers: receipt.records.len(),
                    transferred: receipt.transferred,
                });
                if let Err(e) = self.refresh().await {
                    warn!(error = %e, "refresh after donation failed");
                }
                Ok(receipt)
            }
            Err(e) => {
                let action = if e.is_validation() {
                    ViewAction::ContributionInvalid {
                        dialog_id,
                        message: e.user_message(),
                    }
                } else {
                    ViewAction::ContributionAborted {
                        dialog_id,
                        message: e.user_message(),
                        recorded: e.recorded().len(),
                    }
                };
                self.dispatch(action);
                Err(e)
            }
        }
    }
}
