use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::watch;
use tracing::debug;

use super::domain::{OverallStatusView, VendorId, VerificationResult};

/// Handle for one verification run; numbers increase with every `begin`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunTicket {
    pub vendor_id: VendorId,
    pub run: u64,
}

/// A settled run as handed to the reviewer workflow.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PublishedVerification {
    pub vendor_id: VendorId,
    pub run: u64,
    pub completed_at: DateTime<Utc>,
    pub overall: OverallStatusView,
    pub result: VerificationResult,
}

impl PublishedVerification {
    pub fn new(ticket: RunTicket, result: VerificationResult) -> Self {
        Self {
            vendor_id: ticket.vendor_id,
            run: ticket.run,
            completed_at: Utc::now(),
            overall: result.overall().view(),
            result,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublishOutcome {
    Accepted,
    /// A later-started run already published; the stale result was dropped.
    Superseded { current_run: u64 },
}

type Slot = watch::Sender<Option<PublishedVerification>>;

/// Per-vendor result channel. Latest-started run wins: a run that finishes
/// after a newer run has published is discarded rather than displayed.
#[derive(Debug, Default)]
pub struct VerificationBoard {
    sequence: AtomicU64,
    slots: Mutex<HashMap<VendorId, Slot>>,
}

impl VerificationBoard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin(&self, vendor_id: VendorId) -> RunTicket {
        let run = self.sequence.fetch_add(1, Ordering::Relaxed) + 1;
        RunTicket { vendor_id, run }
    }

    pub fn publish(&self, verification: PublishedVerification) -> PublishOutcome {
        let mut slots = self.slots();
        let slot = slots
            .entry(verification.vendor_id.clone())
            .or_insert_with(|| watch::channel(None).0);

        let current_run = slot.borrow().as_ref().map(|current| current.run);
        if let Some(current_run) = current_run.filter(|current| *current > verification.run) {
            debug!(
                vendor_id = %verification.vendor_id.0,
                stale_run = verification.run,
                current_run,
                "dropping superseded verification"
            );
            return PublishOutcome::Superseded { current_run };
        }

        slot.send_replace(Some(verification));
        PublishOutcome::Accepted
    }

    pub fn latest(&self, vendor_id: &VendorId) -> Option<PublishedVerification> {
        self.slots()
            .get(vendor_id)
            .and_then(|slot| slot.borrow().clone())
    }

    /// Receivers observe every accepted publish for the vendor.
    pub fn subscribe(&self, vendor_id: &VendorId) -> watch::Receiver<Option<PublishedVerification>> {
        self.slots()
            .entry(vendor_id.clone())
            .or_insert_with(|| watch::channel(None).0)
            .subscribe()
    }

    fn slots(&self) -> MutexGuard<'_, HashMap<VendorId, Slot>> {
        self.slots.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
