use std::sync::{Arc, OnceLock};
use std::time::Duration;

use async_trait::async_trait;
use regex::Regex;
use serde_json::Value;
use tracing::warn;

use super::{object_details, VerificationCheck};
use crate::verification::domain::{provided, CheckId, CheckOutcome, VendorProfile};
use crate::verification::transport::{fetch_with_timeout, SourceRequest, SourceTransport};

fn email_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email pattern"))
}

/// Validates the address shape, then asks a DNS-over-HTTPS resolver for MX records.
#[derive(Debug, Clone)]
pub struct EmailDomainCheck {
    transport: Arc<dyn SourceTransport>,
    resolver_url: String,
    timeout: Duration,
}

impl EmailDomainCheck {
    pub fn new(
        transport: Arc<dyn SourceTransport>,
        resolver_url: impl Into<String>,
        timeout: Duration,
    ) -> Self {
        Self {
            transport,
            resolver_url: resolver_url.into(),
            timeout,
        }
    }

    pub async fn check(&self, email: Option<&str>) -> CheckOutcome {
        let Some(email) = provided(email) else {
            return CheckOutcome::warning("No email provided");
        };

        if !email_pattern().is_match(email) {
            return CheckOutcome::failed("Invalid email format");
        }

        let Some((_, domain)) = email.split_once('@') else {
            return CheckOutcome::failed("Invalid email format");
        };

        let request = SourceRequest::get(&self.resolver_url)
            .param("name", domain)
            .param("type", "MX");

        match fetch_with_timeout(self.transport.as_ref(), &request, self.timeout).await {
            Ok(answer) if has_mx_records(&answer) => CheckOutcome::verified(format!(
                "Valid email domain - MX records found for {domain}"
            ))
            .with_optional_details(object_details(&answer)),
            Ok(_) => CheckOutcome::failed(format!("No mail server found for domain {domain}")),
            Err(err) => {
                warn!(check = CheckId::EmailDomain.as_str(), %domain, error = %err, "dns resolver unavailable");
                CheckOutcome::error("Email verification service unavailable")
            }
        }
    }
}

/// Resolver answered `NOERROR` with at least one answer record.
fn has_mx_records(answer: &Value) -> bool {
    let resolved = answer.get("Status").and_then(Value::as_i64) == Some(0);
    let answered = answer
        .get("Answer")
        .and_then(Value::as_array)
        .is_some_and(|records| !records.is_empty());
    resolved && answered
}

#[async_trait]
impl VerificationCheck for EmailDomainCheck {
    fn id(&self) -> CheckId {
        CheckId::EmailDomain
    }

    async fn verify(&self, profile: &VendorProfile) -> CheckOutcome {
        self.check(profile.contact_email.as_deref()).await
    }
}
