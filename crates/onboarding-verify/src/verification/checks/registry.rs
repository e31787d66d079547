use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use tracing::warn;

use super::{pick_details, VerificationCheck};
use crate::verification::domain::{provided, CheckId, CheckOutcome, VendorProfile};
use crate::verification::transport::{fetch_with_timeout, SourceRequest, SourceTransport};

const ACTIVE_STATUS: &str = "Active";

/// Company-registry search by name within a single jurisdiction.
#[derive(Debug, Clone)]
pub struct BusinessRegistryCheck {
    transport: Arc<dyn SourceTransport>,
    search_url: String,
    jurisdiction: String,
    timeout: Duration,
}

impl BusinessRegistryCheck {
    pub fn new(
        transport: Arc<dyn SourceTransport>,
        search_url: impl Into<String>,
        jurisdiction: impl Into<String>,
        timeout: Duration,
    ) -> Self {
        Self {
            transport,
            search_url: search_url.into(),
            jurisdiction: jurisdiction.into(),
            timeout,
        }
    }

    pub async fn check(&self, company_name: Option<&str>) -> CheckOutcome {
        let Some(company_name) = provided(company_name) else {
            return CheckOutcome::warning("No company name provided");
        };

        let request = SourceRequest::get(&self.search_url)
            .param("q", company_name)
            .param("jurisdiction_code", self.jurisdiction.as_str())
            .param("order", "score");

        let listing =
            match fetch_with_timeout(self.transport.as_ref(), &request, self.timeout).await {
                Ok(listing) => listing,
                Err(err) => {
                    warn!(check = CheckId::BusinessRegistry.as_str(), error = %err, "company registry unavailable");
                    return CheckOutcome::error("Business registry check unavailable");
                }
            };

        let Some(top_match) = listing
            .pointer("/results/companies/0/company")
            .filter(|company| company.is_object())
        else {
            return CheckOutcome::warning("No business registration found in the company registry");
        };

        let name = top_match
            .get("name")
            .and_then(Value::as_str)
            .unwrap_or(company_name);
        let current_status = top_match
            .get("current_status")
            .and_then(Value::as_str)
            .filter(|status| !status.is_empty());
        let details = pick_details(
            top_match,
            &[
                ("name", "name"),
                ("jurisdiction", "jurisdiction_code"),
                ("status", "current_status"),
                ("incorporation_date", "incorporation_date"),
            ],
        );

        match current_status {
            Some(ACTIVE_STATUS) => {
                CheckOutcome::verified(format!("Found: {name} ({ACTIVE_STATUS})")).with_details(details)
            }
            other => CheckOutcome::warning(format!(
                "Found: {name} ({})",
                other.unwrap_or("Unknown Status")
            ))
            .with_details(details),
        }
    }
}

#[async_trait]
impl VerificationCheck for BusinessRegistryCheck {
    fn id(&self) -> CheckId {
        CheckId::BusinessRegistry
    }

    async fn verify(&self, profile: &VendorProfile) -> CheckOutcome {
        self.check(profile.company_name.as_deref()).await
    }
}
