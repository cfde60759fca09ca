//! In-process collaborators for dry runs and tests.
//!
//! All three types are cheap to clone and share their state between clones,
//! so a caller can hand one clone to a [`DonationSession`](crate::DonationSession)
//! and inspect another afterwards.

use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use aptfund_common::{Campaign, Organization, TransferRecord};
use cosmwasm_std::Decimal;
use sha2::{Digest, Sha256};

use crate::collaborators::{CampaignDirectory, LedgerRecorder, WalletSigner};
use crate::error::{DirectoryError, LedgerError, SignerError};
use crate::msg::TransferInstruction;

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

// ─── Signer ───

#[derive(Default)]
struct SignerState {
    calls: Vec<TransferInstruction>,
    rejected_destinations: HashSet<String>,
    disconnected: bool,
}

/// Signs nothing: returns a deterministic transaction hash for each call and
/// remembers every instruction it was given.
#[derive(Clone)]
pub struct DryRunSigner {
    sender: String,
    nonce: Arc<AtomicU64>,
    state: Arc<Mutex<SignerState>>,
}

impl DryRunSigner {
    pub fn new(sender: &str) -> Self {
        Self {
            sender: sender.to_string(),
            nonce: Arc::new(AtomicU64::new(0)),
            state: Arc::new(Mutex::new(SignerState::default())),
        }
    }

    /// Reject every transfer to `destination`, as if the user declined it.
    pub fn reject_destination(&self, destination: &str) {
        lock(&self.state)
            .rejected_destinations
            .insert(destination.to_string());
    }

    pub fn accept_destination(&self, destination: &str) {
        lock(&self.state).rejected_destinations.remove(destination);
    }

    pub fn disconnect(&self) {
        lock(&self.state).disconnected = true;
    }

    /// Every instruction received, including rejected ones.
    pub fn calls(&self) -> Vec<TransferInstruction> {
        lock(&self.state).calls.clone()
    }

    pub fn call_count(&self) -> usize {
        lock(&self.state).calls.len()
    }

    /// `sha256(sender || destination || amount_be || asset_type || nonce_be)`
    fn transaction_hash(&self, instruction: &TransferInstruction, nonce: u64) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.sender.as_bytes());
        hasher.update(instruction.destination.as_bytes());
        hasher.update(instruction.amount.u128().to_be_bytes());
        hasher.update(instruction.asset_type.as_bytes());
        hasher.update(nonce.to_be_bytes());
        format!("0x{}", hex::encode(hasher.finalize()))
    }
}

impl WalletSigner for DryRunSigner {
    async fn sign_and_submit(
        &self,
        instruction: &TransferInstruction,
    ) -> Result<String, SignerError> {
        let (disconnected, rejected) = {
            let mut state = lock(&self.state);
            state.calls.push(instruction.clone());
            (
                state.disconnected,
                state.rejected_destinations.contains(&instruction.destination),
            )
        };

        if disconnected {
            return Err(SignerError::Disconnected);
        }
        if rejected {
            return Err(SignerError::Rejected {
                reason: format!("transfer to {} declined", instruction.destination),
            });
        }

        let nonce = self.nonce.fetch_add(1, Ordering::SeqCst);
        Ok(self.transaction_hash(instruction, nonce))
    }
}

// ─── Ledger ───

#[derive(Default)]
struct LedgerState {
    records: Vec<TransferRecord>,
    post_attempts: usize,
    failing_beneficiaries: HashSet<String>,
}

#[derive(Clone, Default)]
pub struct MemoryLedger {
    state: Arc<Mutex<LedgerState>>,
}

impl MemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail every post for `beneficiary_id` with `LedgerError::Unavailable`.
    pub fn fail_for_beneficiary(&self, beneficiary_id: &str) {
        lock(&self.state)
            .failing_beneficiaries
            .insert(beneficiary_id.to_string());
    }

    pub fn recover_beneficiary(&self, beneficiary_id: &str) {
        lock(&self.state).failing_beneficiaries.remove(beneficiary_id);
    }

    /// Stored records in insertion order.
    pub fn records(&self) -> Vec<TransferRecord> {
        lock(&self.state).records.clone()
    }

    pub fn post_attempts(&self) -> usize {
        lock(&self.state).post_attempts
    }
}

impl LedgerRecorder for MemoryLedger {
    async fn record_transfer(&self, record: &TransferRecord) -> Result<(), LedgerError> {
        let mut state = lock(&self.state);
        state.post_attempts += 1;
        if state.failing_beneficiaries.contains(&record.beneficiary_id) {
            return Err(LedgerError::Unavailable {
                reason: format!("post for {} refused", record.beneficiary_id),
            });
        }
        let mut stored = record.clone();
        stored.recorded_at = Some(format!("#{}", state.records.len() + 1));
        state.records.push(stored);
        Ok(())
    }

    async fn transfers(&self, campaign_id: &str) -> Result<Vec<TransferRecord>, LedgerError> {
        Ok(lock(&self.state)
            .records
            .iter()
            .rev()
            .filter(|r| r.campaign_id == campaign_id)
            .cloned()
            .collect())
    }
}

// ─── Directory ───

#[derive(Default)]
struct DirectoryState {
    campaigns: Vec<Campaign>,
    organizations: Vec<Organization>,
    unavailable: bool,
}

/// Campaign directory backed by a vector. When linked to a [`MemoryLedger`]
/// the running total of each campaign includes the transfers recorded there,
/// the way the backend derives it.
#[derive(Clone, Default)]
pub struct MemoryDirectory {
    state: Arc<Mutex<DirectoryState>>,
    ledger: Option<(MemoryLedger, u32)>,
}

impl MemoryDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_campaign(self, campaign: Campaign) -> Self {
        lock(&self.state).campaigns.push(campaign);
        self
    }

    pub fn with_organization(self, organization: Organization) -> Self {
        lock(&self.state).organizations.push(organization);
        self
    }

    /// Add recorded transfers (in minor units at `decimals`) to running totals.
    pub fn with_ledger(mut self, ledger: MemoryLedger, decimals: u32) -> Self {
        self.ledger = Some((ledger, decimals));
        self
    }

    pub fn set_unavailable(&self, unavailable: bool) {
        lock(&self.state).unavailable = unavailable;
    }

    fn with_running_total(&self, mut campaign: Campaign) -> Campaign {
        let Some((ledger, decimals)) = &self.ledger else {
            return campaign;
        };
        for record in ledger
            .records()
            .iter()
            .filter(|r| r.campaign_id == campaign.id)
        {
            let major = Decimal::from_atomics(record.amount, *decimals).unwrap_or(Decimal::zero());
            campaign.donation_amount = campaign.donation_amount.saturating_add(major);
            campaign.donation_count = campaign.donation_count.saturating_add(1);
        }
        campaign
    }

    fn check_available(&self) -> Result<(), DirectoryError> {
        if lock(&self.state).unavailable {
            return Err(DirectoryError::Unavailable {
                reason: "directory offline".to_string(),
            });
        }
        Ok(())
    }
}

impl CampaignDirectory for MemoryDirectory {
    async fn campaigns(&self) -> Result<Vec<Campaign>, DirectoryError> {
        self.check_available()?;
        let campaigns = lock(&self.state).campaigns.clone();
        Ok(campaigns
            .into_iter()
            .map(|c| self.with_running_total(c))
            .collect())
    }

    async fn campaign(&self, campaign_id: &str) -> Result<Campaign, DirectoryError> {
        self.check_available()?;
        let found = lock(&self.state)
            .campaigns
            .iter()
            .find(|c| c.id == campaign_id)
            .cloned();
        found
            .map(|c| self.with_running_total(c))
            .ok_or_else(|| DirectoryError::NotFound {
                campaign_id: campaign_id.to_string(),
            })
    }

    async fn organizations(&self) -> Result<Vec<Organization>, DirectoryError> {
        self.check_available()?;
        Ok(lock(&self.state).organizations.clone())
    }
}
