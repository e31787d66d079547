use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use tracing::warn;

use super::{pick_details, VerificationCheck};
use crate::verification::domain::{provided, CheckId, CheckOutcome, VendorProfile};
use crate::verification::transport::{fetch_with_timeout, SourceRequest, SourceTransport};

/// Free-text geocoding of the postal address.
#[derive(Debug, Clone)]
pub struct AddressGeocodeCheck {
    transport: Arc<dyn SourceTransport>,
    geocoder_url: String,
    timeout: Duration,
}

impl AddressGeocodeCheck {
    pub fn new(
        transport: Arc<dyn SourceTransport>,
        geocoder_url: impl Into<String>,
        timeout: Duration,
    ) -> Self {
        Self {
            transport,
            geocoder_url: geocoder_url.into(),
            timeout,
        }
    }

    pub async fn check(&self, address: Option<&str>) -> CheckOutcome {
        let Some(address) = provided(address) else {
            return CheckOutcome::warning("No address provided");
        };

        let request = SourceRequest::get(&self.geocoder_url)
            .param("format", "json")
            .param("q", address);

        let places = match fetch_with_timeout(self.transport.as_ref(), &request, self.timeout).await
        {
            Ok(places) => places,
            Err(err) => {
                warn!(check = CheckId::Address.as_str(), error = %err, "geocoder unavailable");
                return CheckOutcome::error("Address verification service unavailable");
            }
        };

        match places.as_array().and_then(|places| places.first()) {
            Some(best) => {
                let display_name = best
                    .get("display_name")
                    .and_then(Value::as_str)
                    .unwrap_or(address);
                CheckOutcome::verified(format!("Address verified: {display_name}")).with_details(
                    pick_details(
                        best,
                        &[
                            ("lat", "lat"),
                            ("lon", "lon"),
                            ("type", "type"),
                            ("importance", "importance"),
                        ],
                    ),
                )
            }
            None => CheckOutcome::warning("Address could not be geocoded"),
        }
    }
}

#[async_trait]
impl VerificationCheck for AddressGeocodeCheck {
    fn id(&self) -> CheckId {
        CheckId::Address
    }

    async fn verify(&self, profile: &VendorProfile) -> CheckOutcome {
        self.check(profile.address.as_deref()).await
    }
}
