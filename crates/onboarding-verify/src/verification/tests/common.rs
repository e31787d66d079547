use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::config::SourcesConfig;
use crate::verification::checks::VerificationCheck;
use crate::verification::domain::{CheckId, CheckOutcome, VendorProfile};
use crate::verification::orchestrator::{CheckSuite, VerificationOrchestrator};
use crate::verification::transport::{SourceRequest, SourceTransport, TransportError};

pub(super) const DNS_URL: &str = "https://dns.test/resolve";
pub(super) const PHONE_URL: &str = "https://phone.test/v1/";
pub(super) const GEOCODER_URL: &str = "https://geo.test/search";
pub(super) const REGISTRY_URL: &str = "https://registry.test/companies/search";
pub(super) const CHECK_TIMEOUT: Duration = Duration::from_secs(2);

#[derive(Debug, Clone)]
pub(super) enum StubReply {
    Json(Value),
    Unavailable,
    Delayed(Duration, Value),
}

/// Canned upstream replies keyed by source URL; records every request.
#[derive(Debug, Default)]
pub(super) struct StubTransport {
    routes: HashMap<String, StubReply>,
    calls: Mutex<Vec<SourceRequest>>,
}

impl StubTransport {
    pub(super) fn with(mut self, url: &str, reply: StubReply) -> Self {
        self.routes.insert(url.to_string(), reply);
        self
    }

    pub(super) fn calls(&self) -> Vec<SourceRequest> {
        self.calls.lock().expect("calls mutex poisoned").clone()
    }

    pub(super) fn calls_to(&self, url: &str) -> Vec<SourceRequest> {
        self.calls()
            .into_iter()
            .filter(|request| request.url == url)
            .collect()
    }
}

#[async_trait]
impl SourceTransport for StubTransport {
    async fn get_json(&self, request: &SourceRequest) -> Result<Value, TransportError> {
        self.calls
            .lock()
            .expect("calls mutex poisoned")
            .push(request.clone());

        match self.routes.get(&request.url) {
            Some(StubReply::Json(value)) => Ok(value.clone()),
            Some(StubReply::Delayed(delay, value)) => {
                tokio::time::sleep(*delay).await;
                Ok(value.clone())
            }
            Some(StubReply::Unavailable) => Err(TransportError::Http(
                "connection refused".to_string(),
            )),
            None => Err(TransportError::Status(404)),
        }
    }
}

pub(super) fn mx_answer() -> Value {
    json!({
        "Status": 0,
        "Answer": [
            { "name": "acme.com.", "type": 15, "TTL": 300, "data": "10 mx1.acme.com." }
        ]
    })
}

pub(super) fn valid_phone_answer() -> Value {
    json!({
        "phone": "12125550147",
        "valid": true,
        "format": { "international": "+1 212-555-0147", "local": "(212) 555-0147" },
        "country": { "code": "US", "name": "United States", "prefix": "+1" },
        "type": "landline"
    })
}

pub(super) fn geocoder_answer() -> Value {
    json!([
        {
            "display_name": "200 West Street, Manhattan, New York, 10282, United States",
            "lat": "40.7148",
            "lon": "-74.0143",
            "type": "office",
            "importance": 0.61,
            "osm_id": 123456
        }
    ])
}

pub(super) fn registry_answer(status: Option<&str>) -> Value {
    json!({
        "results": {
            "companies": [
                {
                    "company": {
                        "name": "ACME SUPPLY CORP",
                        "jurisdiction_code": "us_de",
                        "current_status": status,
                        "incorporation_date": "2004-06-15",
                        "company_number": "3812331"
                    }
                }
            ],
            "total_count": 1
        }
    })
}

pub(super) fn healthy_transport() -> StubTransport {
    StubTransport::default()
        .with(DNS_URL, StubReply::Json(mx_answer()))
        .with(PHONE_URL, StubReply::Json(valid_phone_answer()))
        .with(GEOCODER_URL, StubReply::Json(geocoder_answer()))
        .with(REGISTRY_URL, StubReply::Json(registry_answer(Some("Active"))))
}

pub(super) fn sources_config() -> SourcesConfig {
    SourcesConfig {
        dns_resolver_url: DNS_URL.to_string(),
        phone_validation_url: PHONE_URL.to_string(),
        phone_api_key: Some("test-key".to_string()),
        geocoder_url: GEOCODER_URL.to_string(),
        registry_url: REGISTRY_URL.to_string(),
        registry_jurisdiction: "us".to_string(),
        user_agent: "VendorOnboarding/test".to_string(),
        check_timeout: CHECK_TIMEOUT,
    }
}

pub(super) fn orchestrator_with(transport: Arc<StubTransport>) -> VerificationOrchestrator {
    VerificationOrchestrator::new(CheckSuite::from_sources(&sources_config(), transport))
}

pub(super) fn complete_profile() -> VendorProfile {
    VendorProfile {
        company_name: Some("Acme Supply Corp".to_string()),
        contact_email: Some("ops@acme.com".to_string()),
        contact_phone: Some("(212) 555-0147".to_string()),
        address: Some("200 West Street, New York, NY 10282".to_string()),
        ein: Some("12-3456789".to_string()),
    }
}

/// Adapter that settles after a fixed delay with a verified outcome.
#[derive(Debug)]
pub(super) struct SlowCheck {
    pub(super) id: CheckId,
    pub(super) delay: Duration,
}

#[async_trait]
impl VerificationCheck for SlowCheck {
    fn id(&self) -> CheckId {
        self.id
    }

    async fn verify(&self, _profile: &VendorProfile) -> CheckOutcome {
        tokio::time::sleep(self.delay).await;
        CheckOutcome::verified(format!("{} settled", self.id.as_str()))
    }
}

/// Adapter whose latency depends on the company name, so two runs can be
/// made to finish in the opposite order they started.
#[derive(Debug)]
pub(super) struct CompanyPacedCheck {
    pub(super) id: CheckId,
}

impl CompanyPacedCheck {
    pub(super) const SLOW: Duration = Duration::from_millis(500);
    pub(super) const FAST: Duration = Duration::from_millis(10);
}

#[async_trait]
impl VerificationCheck for CompanyPacedCheck {
    fn id(&self) -> CheckId {
        self.id
    }

    async fn verify(&self, profile: &VendorProfile) -> CheckOutcome {
        let company = profile.company_name.clone().unwrap_or_default();
        let delay = if company.starts_with("Slow") {
            Self::SLOW
        } else {
            Self::FAST
        };
        tokio::time::sleep(delay).await;
        CheckOutcome::verified(format!("checked {company}"))
    }
}

/// Adapter that records how many times it ran to completion.
#[derive(Debug)]
pub(super) struct CountingCheck {
    pub(super) id: CheckId,
    pub(super) delay: Duration,
    pub(super) completed: Arc<AtomicUsize>,
}

#[async_trait]
impl VerificationCheck for CountingCheck {
    fn id(&self) -> CheckId {
        self.id
    }

    async fn verify(&self, _profile: &VendorProfile) -> CheckOutcome {
        tokio::time::sleep(self.delay).await;
        self.completed.fetch_add(1, Ordering::SeqCst);
        CheckOutcome::verified(format!("{} settled", self.id.as_str()))
    }
}

/// Adapter that violates the no-panic contract.
#[derive(Debug)]
pub(super) struct PanickingCheck;

#[async_trait]
impl VerificationCheck for PanickingCheck {
    fn id(&self) -> CheckId {
        CheckId::Address
    }

    async fn verify(&self, _profile: &VendorProfile) -> CheckOutcome {
        panic!("geocoder client bug");
    }
}

pub(super) fn suite_of<F>(make: F) -> CheckSuite
where
    F: Fn(CheckId) -> Arc<dyn VerificationCheck>,
{
    CheckSuite {
        email_domain: make(CheckId::EmailDomain),
        phone_format: make(CheckId::PhoneFormat),
        ein_format: make(CheckId::EinFormat),
        address: make(CheckId::Address),
        business_registry: make(CheckId::BusinessRegistry),
    }
}
