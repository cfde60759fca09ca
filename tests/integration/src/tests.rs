//! Integration tests for APT Fund split donations.
//!
//! These tests drive a [`DonationSession`] end to end over the in-memory
//! directory, ledger and dry-run signer, checking both the session's view
//! state and what each collaborator actually saw.
//!
//! Run:
//! ```bash
//! cargo test -p aptfund-integration-tests
//! ```

use std::str::FromStr;

use aptfund_common::{ApiResponse, AssetConfig, Beneficiary, Campaign, Organization};
use aptfund_splitter::memory::{DryRunSigner, MemoryDirectory, MemoryLedger};
use aptfund_splitter::query::verified_organizations;
use aptfund_splitter::{
    ContributionStatus, DonationSession, SignerError, SplitError, ValidationError,
};
use cosmwasm_std::{Decimal, Uint128};

// ─── Constants ───

const DONOR: &str = "0xA11CE";
const DONOR_NORMALIZED: &str = "0xa11ce";

const BACKEND_CAMPAIGN: &str = r#"{
    "message": "Campaign retrieved",
    "data": {
        "id": "c-42",
        "title": "Clean water for Kisumu",
        "goal_amount": 500,
        "donation_amount": "120.5",
        "donation_count": 12,
        "beneficiaries": [
            {"id": "b-1", "name": "Water First", "address": "0x1", "percentage": "40"},
            {"id": "b-2", "name": "Wells Now", "address": "0x2", "percentage": 35},
            {"id": "b-3", "name": "Rain Catchers", "address": "0x3", "percentage": 25.0}
        ]
    }
}"#;

// ─── Helpers ───

type Session = DonationSession<MemoryDirectory, DryRunSigner, MemoryLedger>;

fn beneficiary(id: &str, address: &str, percentage: &str) -> Beneficiary {
    Beneficiary {
        id: id.to_string(),
        name: format!("Organization {id}"),
        address: address.to_string(),
        percentage: Decimal::from_str(percentage).unwrap(),
        logo: None,
    }
}

fn health_campaign() -> Campaign {
    Campaign {
        id: "c-1".to_string(),
        title: "Bringing health to those who need it most".to_string(),
        description: "Mobile clinics for rural districts".to_string(),
        image: None,
        organization: None,
        goal_amount: Decimal::from_str("1000").unwrap(),
        donation_amount: Decimal::from_str("600").unwrap(),
        donation_count: 3200,
        beneficiaries: vec![
            beneficiary("b-1", "0x1", "40"),
            beneficiary("b-2", "0x2", "35"),
            beneficiary("b-3", "0x3", "25"),
        ],
        created_at: None,
    }
}

fn setup(campaign: Campaign) -> (Session, DryRunSigner, MemoryLedger) {
    let ledger = MemoryLedger::new();
    let signer = DryRunSigner::new(DONOR_NORMALIZED);
    let directory = MemoryDirectory::new()
        .with_campaign(campaign)
        .with_ledger(ledger.clone(), 8);
    let session = DonationSession::new(
        directory,
        signer.clone(),
        ledger.clone(),
        AssetConfig::default(),
    );
    (session, signer, ledger)
}

async fn opened(campaign: Campaign) -> (Session, DryRunSigner, MemoryLedger) {
    let (session, signer, ledger) = setup(campaign);
    session.open("c-1").await.unwrap();
    session.open_dialog();
    (session, signer, ledger)
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_full_donation_cycle() {
    let (session, signer, ledger) = opened(health_campaign()).await;

    let receipt = session.submit(Some(DONOR), "100").await.unwrap();

    // 40 / 35 / 25 APT in octas, in beneficiary order
    let amounts: Vec<Uint128> = receipt.records.iter().map(|r| r.amount).collect();
    assert_eq!(
        amounts,
        vec![
            Uint128::new(4_000_000_000),
            Uint128::new(3_500_000_000),
            Uint128::new(2_500_000_000),
        ]
    );
    assert_eq!(receipt.transferred, Uint128::new(10_000_000_000));
    assert!(receipt.skipped.is_empty());

    let destinations: Vec<String> = signer.calls().into_iter().map(|c| c.destination).collect();
    assert_eq!(destinations, vec!["0x1", "0x2", "0x3"]);

    let records = ledger.records();
    assert_eq!(records.len(), 3);
    assert!(records.iter().all(|r| r.from_address == DONOR_NORMALIZED));
    assert!(records.iter().all(|r| r.campaign_id == "c-1"));

    // Refreshed after success: total and recent list include the new transfers
    let state = session.snapshot();
    assert_eq!(
        state.contribution,
        ContributionStatus::Succeeded {
            transfers: 3,
            transferred: Uint128::new(10_000_000_000),
        }
    );
    let campaign = state.campaign.loaded().unwrap();
    assert_eq!(campaign.donation_amount, Decimal::from_str("700").unwrap());
    assert_eq!(campaign.donation_count, 3203);
    assert_eq!(campaign.progress_percent(), Decimal::percent(7_000));

    let recent: Vec<&str> = state
        .recent_transfers(3)
        .iter()
        .map(|r| r.beneficiary_id.as_str())
        .collect();
    assert_eq!(recent, vec!["b-3", "b-2", "b-1"]);
}

#[tokio::test]
async fn test_signer_failure_on_second_beneficiary() {
    let (session, signer, ledger) = opened(health_campaign()).await;
    signer.reject_destination("0x2");

    let err = session.submit(Some(DONOR), "100").await.unwrap_err();

    assert!(matches!(
        &err,
        SplitError::Signer {
            source: SignerError::Rejected { .. },
            ..
        }
    ));
    assert_eq!(err.failed_beneficiary(), Some("b-2"));
    assert_eq!(signer.call_count(), 2);

    let paid: Vec<String> = ledger.records().into_iter().map(|r| r.beneficiary_id).collect();
    assert_eq!(paid, vec!["b-1"]);

    let state = session.snapshot();
    assert_eq!(
        state.contribution,
        ContributionStatus::Aborted {
            message: "Your donation could not be completed.".to_string(),
            recorded: 1,
        }
    );
    // No refresh after a failure
    assert_eq!(
        state.campaign.loaded().unwrap().donation_amount,
        Decimal::from_str("600").unwrap()
    );
}

#[tokio::test]
async fn test_ledger_failure_stops_before_next_beneficiary() {
    let (session, signer, ledger) = opened(health_campaign()).await;
    ledger.fail_for_beneficiary("b-2");

    let err = session.submit(Some(DONOR), "100").await.unwrap_err();

    match &err {
        SplitError::Ledger {
            unrecorded,
            recorded,
            ..
        } => {
            assert_eq!(unrecorded.beneficiary_id, "b-2");
            assert_eq!(unrecorded.amount, Uint128::new(3_500_000_000));
            assert_eq!(recorded.len(), 1);
        }
        other => panic!("expected ledger failure, got {other:?}"),
    }
    // b-2 was paid on-chain, b-3 never attempted
    assert_eq!(signer.call_count(), 2);
    assert_eq!(ledger.post_attempts(), 2);
    assert_eq!(ledger.records().len(), 1);
    assert_eq!(err.user_message(), "Your donation could not be completed.");
}

#[tokio::test]
async fn test_invalid_amounts_never_reach_signer() {
    let (session, signer, ledger) = opened(health_campaign()).await;

    for amount in ["", "abc", "0", "0.0", "-5", "1e3", "0.000000001"] {
        let err = session.submit(Some(DONOR), amount).await.unwrap_err();
        assert!(err.is_validation(), "{amount:?} should fail validation");
        assert!(matches!(
            session.snapshot().contribution,
            ContributionStatus::Invalid { .. }
        ));
    }

    let err = session.submit(None, "10").await.unwrap_err();
    assert_eq!(err, SplitError::Validation(ValidationError::MissingWallet));

    let err = session.submit(Some("alice"), "10").await.unwrap_err();
    assert!(matches!(
        err,
        SplitError::Validation(ValidationError::Wallet(_))
    ));

    assert_eq!(signer.call_count(), 0);
    assert_eq!(ledger.post_attempts(), 0);
}

#[tokio::test]
async fn test_resubmission_repays_earlier_beneficiaries() {
    let (session, signer, ledger) = opened(health_campaign()).await;
    signer.reject_destination("0x3");

    let err = session.submit(Some(DONOR), "10").await.unwrap_err();
    assert_eq!(err.recorded().len(), 2);

    signer.accept_destination("0x3");
    session.open_dialog();
    session.submit(Some(DONOR), "10").await.unwrap();

    // Nothing reconciles against the ledger: b-1 and b-2 are paid twice
    let paid: Vec<String> = ledger.records().into_iter().map(|r| r.beneficiary_id).collect();
    assert_eq!(paid, vec!["b-1", "b-2", "b-1", "b-2", "b-3"]);
    let to_first = signer
        .calls()
        .iter()
        .filter(|c| c.destination == "0x1")
        .count();
    assert_eq!(to_first, 2);
}

#[tokio::test]
async fn test_backend_payload_splits_by_percentages() {
    let res: ApiResponse<Campaign> = serde_json::from_str(BACKEND_CAMPAIGN).unwrap();
    let mut campaign = res.data;
    campaign.id = "c-1".to_string();

    let (session, _signer, ledger) = opened(campaign).await;
    let before = session.snapshot();
    assert_eq!(
        before.campaign.loaded().unwrap().progress_percent(),
        Decimal::percent(2_410)
    );

    session.submit(Some(DONOR), "2.5").await.unwrap();

    let amounts: Vec<Uint128> = ledger.records().iter().map(|r| r.amount).collect();
    assert_eq!(
        amounts,
        vec![
            Uint128::new(100_000_000),
            Uint128::new(87_500_000),
            Uint128::new(62_500_000),
        ]
    );
}

#[tokio::test]
async fn test_shares_truncate_and_tiny_shares_are_skipped() {
    let mut campaign = health_campaign();
    campaign.beneficiaries = vec![
        beneficiary("b-1", "0x1", "99.999"),
        beneficiary("b-2", "0x2", "0.001"),
    ];
    let (session, signer, ledger) = opened(campaign).await;

    // 0.001% of 0.0001 APT is 0.1 octa
    let receipt = session.submit(Some(DONOR), "0.0001").await.unwrap();
    assert_eq!(receipt.records.len(), 1);
    assert_eq!(receipt.records[0].amount, Uint128::new(9_999));
    assert_eq!(receipt.skipped, vec!["b-2"]);
    assert_eq!(signer.call_count(), 1);
    assert_eq!(ledger.records().len(), 1);
}

#[tokio::test]
async fn test_dismissed_session_keeps_paying_and_reopens_clean() {
    let (session, _signer, ledger) = opened(health_campaign()).await;
    session.dismiss_dialog();

    // A submission without an open dialog still runs; only its status is dropped
    session.submit(Some(DONOR), "1").await.unwrap();
    assert_eq!(ledger.records().len(), 3);
    assert_eq!(session.snapshot().contribution, ContributionStatus::NotStarted);

    session.open_dialog();
    assert_eq!(session.snapshot().contribution, ContributionStatus::NotStarted);
}

#[tokio::test]
async fn test_directory_outage_keeps_loaded_page() {
    let ledger = MemoryLedger::new();
    let directory = MemoryDirectory::new().with_campaign(health_campaign());
    let session = DonationSession::new(
        directory.clone(),
        DryRunSigner::new(DONOR_NORMALIZED),
        ledger,
        AssetConfig::default(),
    );
    session.open("c-1").await.unwrap();

    directory.set_unavailable(true);
    assert!(session.refresh().await.is_err());
    assert!(session.snapshot().campaign.loaded().is_some());
}

#[tokio::test]
async fn test_verified_organizations_only() {
    let organization = |id: &str, verified: u8| Organization {
        id: id.to_string(),
        name: format!("Org {id}"),
        description: String::new(),
        logo: None,
        impact: String::new(),
        address: "0x1".to_string(),
        verified,
        created_at: None,
    };
    let directory = MemoryDirectory::new()
        .with_organization(organization("org-1", 1))
        .with_organization(organization("org-2", 0));

    let verified = verified_organizations(&directory).await.unwrap();
    assert_eq!(verified.len(), 1);
    assert_eq!(verified[0].id, "org-1");
}
