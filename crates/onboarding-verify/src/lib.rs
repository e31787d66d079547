//! Multi-source identity verification for vendor onboarding reviews.
//!
//! The [`verification`] module fans a vendor profile out to five independent
//! checks, folds their outcomes into a fixed-key result, and publishes it to
//! reviewers through an explicit result board.

pub mod config;
pub mod error;
pub mod telemetry;
pub mod verification;
