use aptfund_common::TransferRecord;
use cosmwasm_schema::cw_serde;
use cosmwasm_std::Uint128;

/// What the user typed into the donation dialog.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ContributionRequest {
    /// Connected wallet address, if any.
    pub wallet: Option<String>,
    /// Total amount in major units, as entered.
    pub amount: String,
}

impl ContributionRequest {
    pub fn new(wallet: Option<&str>, amount: &str) -> Self {
        Self {
            wallet: wallet.map(str::to_string),
            amount: amount.to_string(),
        }
    }
}

/// A single transfer handed to the wallet signer.
#[cw_serde]
pub struct TransferInstruction {
    pub destination: String,
    /// Minor units.
    pub amount: Uint128,
    pub asset_type: String,
}

/// One beneficiary's share, computed before any transfer is made.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlannedTransfer {
    pub beneficiary_id: String,
    pub destination: String,
    pub amount: Uint128,
}

/// Result of a fully successful split.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SplitReceipt {
    pub campaign_id: String,
    /// Sum of the transferred shares in minor units. Can be below the entered
    /// amount because each share is truncated.
    pub transferred: Uint128,
    /// One record per paid beneficiary, in payout order.
    pub records: Vec<TransferRecord>,
    /// Beneficiaries whose share truncated to zero.
    pub skipped: Vec<String>,
}
