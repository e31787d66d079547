//! Vendor identity verification: five independent source checks fanned out
//! concurrently and folded into one reviewer-facing result.

pub mod board;
pub mod checks;
pub mod domain;
pub mod orchestrator;
pub mod router;
pub mod service;
pub mod transport;

#[cfg(test)]
mod tests;

pub use board::{PublishOutcome, PublishedVerification, RunTicket, VerificationBoard};
pub use checks::{
    AddressGeocodeCheck, BusinessRegistryCheck, EinFormatCheck, EmailDomainCheck,
    PhoneNumberCheck, VerificationCheck,
};
pub use domain::{
    CheckId, CheckOutcome, CheckStatus, OverallStatus, OverallStatusView, VendorId, VendorProfile,
    VerificationResult,
};
pub use orchestrator::{CheckSuite, VerificationOrchestrator};
pub use router::verification_router;
pub use service::{VerificationReceipt, VerificationService};
pub use transport::{HttpTransport, SourceRequest, SourceTransport, TransportError};
