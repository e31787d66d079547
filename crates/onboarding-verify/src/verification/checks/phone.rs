use std::sync::{Arc, OnceLock};
use std::time::Duration;

use async_trait::async_trait;
use regex::Regex;
use serde_json::Value;
use tracing::{debug, warn};

use super::{object_details, VerificationCheck};
use crate::verification::domain::{provided, CheckId, CheckOutcome, VendorProfile};
use crate::verification::transport::{
    fetch_with_timeout, SourceRequest, SourceTransport, TransportError,
};

fn us_phone_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^\+?1?[-.\s]?\(?[0-9]{3}\)?[-.\s]?[0-9]{3}[-.\s]?[0-9]{4}$")
            .expect("valid phone pattern")
    })
}

/// Phone validation backed by a keyed lookup service, degrading to a local
/// US-format match whenever the service cannot be reached.
#[derive(Clone)]
pub struct PhoneNumberCheck {
    transport: Arc<dyn SourceTransport>,
    service_url: String,
    api_key: Option<String>,
    timeout: Duration,
}

impl PhoneNumberCheck {
    pub fn new(
        transport: Arc<dyn SourceTransport>,
        service_url: impl Into<String>,
        api_key: Option<String>,
        timeout: Duration,
    ) -> Self {
        Self {
            transport,
            service_url: service_url.into(),
            api_key,
            timeout,
        }
    }

    pub async fn check(&self, phone: Option<&str>) -> CheckOutcome {
        let Some(phone) = provided(phone) else {
            return CheckOutcome::warning("No phone number provided");
        };

        match self.lookup(phone).await {
            Ok(answer) if answer.get("valid").and_then(Value::as_bool) == Some(true) => {
                CheckOutcome::verified(describe_valid_number(&answer, phone))
                    .with_optional_details(object_details(&answer))
            }
            Ok(_) => CheckOutcome::warning("Phone number format could not be verified"),
            Err(err) => {
                warn!(check = CheckId::PhoneFormat.as_str(), error = %err, "phone validation unavailable, using local format rule");
                local_format_outcome(phone)
            }
        }
    }

    async fn lookup(&self, phone: &str) -> Result<Value, TransportError> {
        let Some(api_key) = self.api_key.as_deref() else {
            debug!("no phone validation key configured");
            return Err(TransportError::MissingCredential("phone validation"));
        };

        let request = SourceRequest::get(&self.service_url)
            .param("api_key", api_key)
            .param("phone", phone);
        fetch_with_timeout(self.transport.as_ref(), &request, self.timeout).await
    }
}

fn describe_valid_number(answer: &Value, phone: &str) -> String {
    let country = answer
        .pointer("/country/name")
        .and_then(Value::as_str)
        .filter(|name| !name.is_empty());
    let international = answer
        .pointer("/format/international")
        .and_then(Value::as_str)
        .filter(|format| !format.is_empty())
        .unwrap_or(phone);

    match country {
        Some(country) => format!("Valid {country} phone - {international}"),
        None => format!("Valid phone - {international}"),
    }
}

fn local_format_outcome(phone: &str) -> CheckOutcome {
    if us_phone_pattern().is_match(phone) {
        CheckOutcome::verified("Valid US phone format")
    } else {
        CheckOutcome::warning("Invalid phone format")
    }
}

#[async_trait]
impl VerificationCheck for PhoneNumberCheck {
    fn id(&self) -> CheckId {
        CheckId::PhoneFormat
    }

    async fn verify(&self, profile: &VendorProfile) -> CheckOutcome {
        self.check(profile.contact_phone.as_deref()).await
    }
}

impl std::fmt::Debug for PhoneNumberCheck {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PhoneNumberCheck")
            .field("service_url", &self.service_url)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}
