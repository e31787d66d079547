use serde::Serialize;
use tokio::sync::watch;

use super::board::{PublishOutcome, PublishedVerification, VerificationBoard};
use super::domain::{VendorId, VendorProfile};
use super::orchestrator::VerificationOrchestrator;

/// Outcome of one verify call, including whether a newer run already replaced it.
#[derive(Debug, Clone, Serialize)]
pub struct VerificationReceipt {
    pub verification: PublishedVerification,
    pub superseded: bool,
}

/// Service composing the orchestrator with the reviewer-facing result board.
pub struct VerificationService {
    orchestrator: VerificationOrchestrator,
    board: VerificationBoard,
}

impl VerificationService {
    pub fn new(orchestrator: VerificationOrchestrator) -> Self {
        Self {
            orchestrator,
            board: VerificationBoard::new(),
        }
    }

    /// Run a fresh verification for the vendor and publish it. Re-verifying
    /// while a prior run is in flight is allowed; the later-started run wins.
    pub async fn verify(&self, vendor_id: VendorId, profile: VendorProfile) -> VerificationReceipt {
        let ticket = self.board.begin(vendor_id);
        let result = self.orchestrator.run(&profile).await;
        let verification = PublishedVerification::new(ticket, result);

        let superseded = matches!(
            self.board.publish(verification.clone()),
            PublishOutcome::Superseded { .. }
        );

        VerificationReceipt {
            verification,
            superseded,
        }
    }

    pub fn latest(&self, vendor_id: &VendorId) -> Option<PublishedVerification> {
        self.board.latest(vendor_id)
    }

    pub fn subscribe(&self, vendor_id: &VendorId) -> watch::Receiver<Option<PublishedVerification>> {
        self.board.subscribe(vendor_id)
    }
}
