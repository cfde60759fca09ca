use aptfund_common::{
    compute_share, parse_contribution_amount, to_minor_units, validate_address, AmountError,
    AssetConfig, Campaign, TransferRecord,
};
use cosmwasm_std::{Decimal, Uint128};
use tracing::{debug, error, info, warn};

use crate::collaborators::{LedgerRecorder, WalletSigner};
use crate::error::{SplitError, ValidationError};
use crate::msg::{ContributionRequest, PlannedTransfer, SplitReceipt, TransferInstruction};

/// Check the wallet identity and the entered amount.
///
/// Returns the normalized wallet address and the amount in major units.
pub fn validate_request(
    request: &ContributionRequest,
    asset: &AssetConfig,
) -> Result<(String, Decimal), ValidationError> {
    let wallet = request
        .wallet
        .as_deref()
        .filter(|w| !w.trim().is_empty())
        .ok_or(ValidationError::MissingWallet)?;
    let wallet = validate_address(wallet)?;

    let amount = parse_contribution_amount(&request.amount)?;
    if to_minor_units(amount, asset.decimals)?.is_zero() {
        return Err(AmountError::BelowMinorUnit {
            amount,
            decimals: asset.decimals,
        }
        .into());
    }

    Ok((wallet, amount))
}

/// Compute every beneficiary's share up front, in list order.
///
/// Percentages are not required to sum to 100.
pub fn plan_transfers(
    amount: Decimal,
    campaign: &Campaign,
    asset: &AssetConfig,
) -> Result<Vec<PlannedTransfer>, ValidationError> {
    if campaign.beneficiaries.is_empty() {
        return Err(ValidationError::NoBeneficiaries {
            campaign_id: campaign.id.clone(),
        });
    }

    let plan = campaign
        .beneficiaries
        .iter()
        .map(|b| {
            let amount = compute_share(amount, b.percentage, asset.decimals).map_err(|source| {
                ValidationError::Share {
                    beneficiary_id: b.id.clone(),
                    source,
                }
            })?;
            Ok(PlannedTransfer {
                beneficiary_id: b.id.clone(),
                destination: b.address.clone(),
                amount,
            })
        })
        .collect::<Result<Vec<_>, ValidationError>>()?;

    // Percentages may sum past 100, so the total can exceed the entered amount
    plan.iter()
        .try_fold(Uint128::zero(), |total, step| total.checked_add(step.amount))
        .map_err(|_| ValidationError::ShareTotalOverflow {
            campaign_id: campaign.id.clone(),
        })?;

    Ok(plan)
}

/// Pay each beneficiary its share of the contribution, one transfer at a
/// time, and post a ledger record after each transfer.
///
/// The first signer or ledger failure ends the run. Beneficiaries paid before
/// it stay paid and are returned inside the error; later ones are never
/// attempted. Calling this again with the same request starts over from the
/// first beneficiary.
pub async fn split_contribution<S, L>(
    signer: &S,
    ledger: &L,
    request: &ContributionRequest,
    campaign: &Campaign,
    asset: &AssetConfig,
) -> Result<SplitReceipt, SplitError>
where
    S: WalletSigner,
    L: LedgerRecorder,
{
    let (wallet, amount) = validate_request(request, asset)?;
    let plan = plan_transfers(amount, campaign, asset)?;

    info!(
        campaign_id = %campaign.id,
        wallet = %wallet,
        amount = %amount,
        beneficiaries = plan.len(),
        "splitting contribution"
    );

    let mut recorded: Vec<TransferRecord> = Vec::with_capacity(plan.len());
    let mut skipped = Vec::new();
    let mut transferred = Uint128::zero();

    for step in plan {
        if step.amount.is_zero() {
            debug!(beneficiary_id = %step.beneficiary_id, "share truncates to zero, skipping");
            skipped.push(step.beneficiary_id);
            continue;
        }

        let instruction = TransferInstruction {
            destination: step.destination.clone(),
            amount: step.amount,
            asset_type: asset.asset_type.clone(),
        };

        let transaction_hash = match signer.sign_and_submit(&instruction).await {
            Ok(hash) => hash,
            Err(source) => {
                warn!(
                    campaign_id = %campaign.id,
                    beneficiary_id = %step.beneficiary_id,
                    paid = recorded.len(),
                    error = %source,
                    "transfer failed, aborting remaining beneficiaries"
                );
                return Err(SplitError::Signer {
                    beneficiary_id: step.beneficiary_id,
                    source,
                    recorded,
                });
            }
        };

        let record = TransferRecord {
            transaction_hash,
            from_address: wallet.clone(),
            to_address: step.destination,
            amount: step.amount,
            campaign_id: campaign.id.clone(),
            beneficiary_id: step.beneficiary_id,
            recorded_at: None,
        };

        if let Err(source) = ledger.record_transfer(&record).await {
            error!(
                campaign_id = %campaign.id,
                beneficiary_id = %record.beneficiary_id,
                transaction_hash = %record.transaction_hash,
                amount = %record.amount,
                error = %source,
                "transfer committed but not recorded in ledger"
            );
            return Err(SplitError::Ledger {
                unrecorded: record,
                source,
                recorded,
            });
        }

        info!(
            campaign_id = %campaign.id,
            beneficiary_id = %record.beneficiary_id,
            transaction_hash = %record.transaction_hash,
            amount = %record.amount,
            "transfer recorded"
        );
        // bounded by plan_transfers
        transferred = transferred.saturating_add(record.amount);
        recorded.push(record);
    }

    Ok(SplitReceipt {
        campaign_id: campaign.id.clone(),
        transferred,
        records: recorded,
        skipped,
    })
}
