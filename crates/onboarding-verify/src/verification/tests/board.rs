use super::common::*;
use crate::verification::board::{
    PublishOutcome, PublishedVerification, VerificationBoard,
};
use crate::verification::checks::VerificationCheck;
use crate::verification::domain::{
    CheckOutcome, OverallStatus, VendorId, VendorProfile, VerificationResult,
};
use crate::verification::orchestrator::VerificationOrchestrator;
use crate::verification::service::VerificationService;
use std::sync::Arc;

fn vendor() -> VendorId {
    VendorId("vendor-042".to_string())
}

fn settled(message: &str) -> VerificationResult {
    let mut result = VerificationResult::pending();
    result.email_domain = CheckOutcome::verified(message);
    result.phone_format = CheckOutcome::verified(message);
    result.ein_format = CheckOutcome::verified(message);
    result.address = CheckOutcome::verified(message);
    result.business_registry = CheckOutcome::warning(message);
    result
}

#[test]
fn run_numbers_increase() {
    let board = VerificationBoard::new();
    let first = board.begin(vendor());
    let second = board.begin(VendorId("other".to_string()));
    let third = board.begin(vendor());

    assert!(first.run < second.run);
    assert!(second.run < third.run);
}

#[test]
fn stale_run_cannot_overwrite_newer_result() {
    let board = VerificationBoard::new();
    let older = board.begin(vendor());
    let newer = board.begin(vendor());

    let accepted = board.publish(PublishedVerification::new(newer.clone(), settled("newer")));
    let rejected = board.publish(PublishedVerification::new(older, settled("older")));

    assert_eq!(accepted, PublishOutcome::Accepted);
    assert_eq!(
        rejected,
        PublishOutcome::Superseded {
            current_run: newer.run
        }
    );
    let latest = board.latest(&vendor()).expect("published");
    assert_eq!(latest.run, newer.run);
    assert_eq!(latest.result.email_domain.message, "newer");
}

#[test]
fn in_order_runs_replace_each_other() {
    let board = VerificationBoard::new();
    let first = board.begin(vendor());
    assert_eq!(
        board.publish(PublishedVerification::new(first, settled("first"))),
        PublishOutcome::Accepted
    );

    let second = board.begin(vendor());
    assert_eq!(
        board.publish(PublishedVerification::new(second.clone(), settled("second"))),
        PublishOutcome::Accepted
    );
    assert_eq!(board.latest(&vendor()).expect("published").run, second.run);
}

#[test]
fn vendors_do_not_share_results() {
    let board = VerificationBoard::new();
    let ticket = board.begin(vendor());
    board.publish(PublishedVerification::new(ticket, settled("mine")));

    assert!(board.latest(&VendorId("someone-else".to_string())).is_none());
}

#[test]
fn published_verification_carries_overall_view() {
    let board = VerificationBoard::new();
    let published = PublishedVerification::new(board.begin(vendor()), settled("ok"));

    assert_eq!(published.overall.status, OverallStatus::ReviewRequired);
    assert_eq!(published.overall.headline, "Review Required");
}

#[tokio::test]
async fn subscribers_observe_accepted_publishes() {
    let board = VerificationBoard::new();
    let mut receiver = board.subscribe(&vendor());
    assert!(receiver.borrow().is_none());

    let ticket = board.begin(vendor());
    board.publish(PublishedVerification::new(ticket.clone(), settled("live")));

    receiver.changed().await.expect("board alive");
    let seen = receiver.borrow().clone().expect("value published");
    assert_eq!(seen.run, ticket.run);
}

#[tokio::test(start_paused = true)]
async fn re_verify_supersedes_slower_prior_run() {
    let suite = suite_of(|id| -> Arc<dyn VerificationCheck> {
        Arc::new(CompanyPacedCheck { id })
    });
    let service = VerificationService::new(VerificationOrchestrator::new(suite));

    let slow_profile = VendorProfile {
        company_name: Some("Slow Lane Freight".to_string()),
        ..VendorProfile::default()
    };
    let fast_profile = VendorProfile {
        company_name: Some("Fast Lane Freight".to_string()),
        ..VendorProfile::default()
    };

    let (first, second) = tokio::join!(
        service.verify(vendor(), slow_profile),
        service.verify(vendor(), fast_profile),
    );

    assert!(first.verification.run < second.verification.run);
    assert!(first.superseded, "stale run must not replace the re-verify");
    assert!(!second.superseded);

    let latest = service.latest(&vendor()).expect("published");
    assert_eq!(latest.run, second.verification.run);
    assert_eq!(
        latest.result.email_domain.message,
        "checked Fast Lane Freight"
    );
}

#[tokio::test]
async fn service_publishes_each_run() {
    let service = VerificationService::new(orchestrator_with(Arc::new(healthy_transport())));
    let mut receiver = service.subscribe(&vendor());

    let receipt = service.verify(vendor(), complete_profile()).await;

    assert!(!receipt.superseded);
    assert_eq!(receipt.verification.overall.status, OverallStatus::AllPassed);
    receiver.changed().await.expect("board alive");
    assert_eq!(
        receiver.borrow().as_ref().map(|published| published.run),
        Some(receipt.verification.run)
    );
}
