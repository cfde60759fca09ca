use cosmwasm_schema::cw_serde;
use cosmwasm_std::{Decimal, Uint128};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::amount::{deserialize_decimal, deserialize_percentage};

/// Envelope used by every backend endpoint: `{ "message": ..., "data": ... }`.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ApiResponse<T> {
    #[serde(default)]
    pub message: Option<String>,
    pub data: T,
}

/// A charity that can be listed as a campaign beneficiary.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Organization {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub logo: Option<String>,
    #[serde(default)]
    pub impact: String,
    pub address: String,
    /// `1` once the platform has verified the organization.
    #[serde(default)]
    pub verified: u8,
    #[serde(default)]
    pub created_at: Option<String>,
}

impl Organization {
    pub fn is_verified(&self) -> bool {
        self.verified == 1
    }
}

/// An organization entitled to a fixed percentage of a campaign's donations.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Beneficiary {
    pub id: String,
    #[serde(default)]
    pub name: String,
    pub address: String,
    /// Allocation in percent (0–100). Percentages of one campaign are expected
    /// to sum to 100 but nothing checks that.
    #[serde(deserialize_with = "deserialize_percentage")]
    pub percentage: Decimal,
    #[serde(default)]
    pub logo: Option<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Campaign {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub organization: Option<Organization>,
    #[serde(default = "Decimal::zero", deserialize_with = "deserialize_decimal")]
    pub goal_amount: Decimal,
    /// Running total, derived by the backend from recorded transfers.
    #[serde(default = "Decimal::zero", deserialize_with = "deserialize_decimal")]
    pub donation_amount: Decimal,
    #[serde(default)]
    pub donation_count: u64,
    /// Payout order for split contributions.
    #[serde(default)]
    pub beneficiaries: Vec<Beneficiary>,
    #[serde(default)]
    pub created_at: Option<String>,
}

impl Campaign {
    /// Share of the goal raised so far, in percent, capped at 100.
    pub fn progress_percent(&self) -> Decimal {
        let hundred = Decimal::percent(10_000);
        if self.goal_amount.is_zero() {
            return Decimal::zero();
        }
        // an overflowing ratio is far past the goal
        self.donation_amount
            .checked_div(self.goal_amount)
            .ok()
            .and_then(|ratio| ratio.checked_mul(hundred).ok())
            .map_or(hundred, |pct| pct.min(hundred))
    }
}

/// One completed on-chain transfer, as posted to (and read back from) the
/// backend ledger.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, JsonSchema)]
pub struct TransferRecord {
    pub transaction_hash: String,
    pub from_address: String,
    pub to_address: String,
    /// Minor units of the campaign asset.
    pub amount: Uint128,
    pub campaign_id: String,
    pub beneficiary_id: String,
    /// Assigned by the backend; absent on records we have not posted yet.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recorded_at: Option<String>,
}

/// The asset contributions are paid in.
#[cw_serde]
pub struct AssetConfig {
    /// Fully qualified coin type, e.g. `0x1::aptos_coin::AptosCoin`.
    pub asset_type: String,
    /// Minor-unit precision (8 for APT: 1 APT = 10^8 octas).
    pub decimals: u32,
    pub symbol: String,
}

impl Default for AssetConfig {
    fn default() -> Self {
        Self {
            asset_type: "0x1::aptos_coin::AptosCoin".to_string(),
            decimals: 8,
            symbol: "APT".to_string(),
        }
    }
}
