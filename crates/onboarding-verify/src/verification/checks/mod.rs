//! Source adapters. Each one absorbs its upstream's response shape into a
//! [`CheckOutcome`] and never lets a failure escape.

mod address;
mod ein;
mod email;
mod phone;
mod registry;

pub use address::AddressGeocodeCheck;
pub use ein::EinFormatCheck;
pub use email::EmailDomainCheck;
pub use phone::PhoneNumberCheck;
pub use registry::BusinessRegistryCheck;

use async_trait::async_trait;
use serde_json::{Map, Value};

use super::domain::{CheckId, CheckOutcome, VendorProfile};

/// Uniform capability implemented by every check adapter.
#[async_trait]
pub trait VerificationCheck: Send + Sync {
    fn id(&self) -> CheckId;

    /// Total over all profiles: always yields exactly one outcome.
    async fn verify(&self, profile: &VendorProfile) -> CheckOutcome;
}

/// Copies an upstream JSON object into outcome details; other shapes yield nothing.
fn object_details(value: &Value) -> Option<Map<String, Value>> {
    value.as_object().cloned()
}

/// Builds a details map from selected upstream fields, keeping nulls for absent ones.
fn pick_details(source: &Value, fields: &[(&str, &str)]) -> Map<String, Value> {
    fields
        .iter()
        .map(|(key, field)| {
            (
                (*key).to_string(),
                source.get(*field).cloned().unwrap_or(Value::Null),
            )
        })
        .collect()
}
