use std::sync::Arc;
use std::time::Instant;

use tokio::task::JoinHandle;
use tracing::{error, info, info_span, Instrument};

use super::checks::{
    AddressGeocodeCheck, BusinessRegistryCheck, EinFormatCheck, EmailDomainCheck,
    PhoneNumberCheck, VerificationCheck,
};
use super::domain::{CheckId, CheckOutcome, VendorProfile, VerificationResult};
use super::transport::{HttpTransport, SourceTransport, TransportError};
use crate::config::SourcesConfig;

/// One adapter per fixed result slot.
#[derive(Clone)]
pub struct CheckSuite {
    pub email_domain: Arc<dyn VerificationCheck>,
    pub phone_format: Arc<dyn VerificationCheck>,
    pub ein_format: Arc<dyn VerificationCheck>,
    pub address: Arc<dyn VerificationCheck>,
    pub business_registry: Arc<dyn VerificationCheck>,
}

impl CheckSuite {
    /// Wires the standard adapters to `transport` using the configured endpoints.
    pub fn from_sources(config: &SourcesConfig, transport: Arc<dyn SourceTransport>) -> Self {
        let timeout = config.check_timeout;
        Self {
            email_domain: Arc::new(EmailDomainCheck::new(
                transport.clone(),
                config.dns_resolver_url.clone(),
                timeout,
            )),
            phone_format: Arc::new(PhoneNumberCheck::new(
                transport.clone(),
                config.phone_validation_url.clone(),
                config.phone_api_key.clone(),
                timeout,
            )),
            ein_format: Arc::new(EinFormatCheck),
            address: Arc::new(AddressGeocodeCheck::new(
                transport.clone(),
                config.geocoder_url.clone(),
                timeout,
            )),
            business_registry: Arc::new(BusinessRegistryCheck::new(
                transport,
                config.registry_url.clone(),
                config.registry_jurisdiction.clone(),
                timeout,
            )),
        }
    }
}

/// Fans a profile out to every check and joins on all of them.
#[derive(Clone)]
pub struct VerificationOrchestrator {
    suite: CheckSuite,
}

impl VerificationOrchestrator {
    pub fn new(suite: CheckSuite) -> Self {
        Self { suite }
    }

    /// Builds the production orchestrator backed by [`HttpTransport`].
    pub fn from_config(config: &SourcesConfig) -> Result<Self, TransportError> {
        let transport = HttpTransport::new(&config.user_agent, config.check_timeout)?;
        Ok(Self::new(CheckSuite::from_sources(config, Arc::new(transport))))
    }

    /// Never fails: every slot of the returned result holds a settled outcome.
    /// Dropping the returned future aborts any checks still in flight.
    pub async fn run(&self, profile: &VendorProfile) -> VerificationResult {
        let span = info_span!(
            "vendor_verification",
            has_company = profile.company_name.is_some()
        );
        self.run_checks(Arc::new(profile.clone()))
            .instrument(span)
            .await
    }

    async fn run_checks(&self, profile: Arc<VendorProfile>) -> VerificationResult {
        let started = Instant::now();

        let (email_domain, phone_format, ein_format, address, business_registry) = tokio::join!(
            settle(CheckId::EmailDomain, spawn_check(&self.suite.email_domain, &profile)),
            settle(CheckId::PhoneFormat, spawn_check(&self.suite.phone_format, &profile)),
            settle(CheckId::EinFormat, spawn_check(&self.suite.ein_format, &profile)),
            settle(CheckId::Address, spawn_check(&self.suite.address, &profile)),
            settle(
                CheckId::BusinessRegistry,
                spawn_check(&self.suite.business_registry, &profile)
            ),
        );

        let result = VerificationResult {
            email_domain,
            phone_format,
            ein_format,
            address,
            business_registry,
        };

        info!(
            overall = result.overall().label(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "vendor verification settled"
        );
        result
    }
}

/// Spawned check that is aborted when its owner goes away.
struct CheckTask(JoinHandle<CheckOutcome>);

impl Drop for CheckTask {
    fn drop(&mut self) {
        self.0.abort();
    }
}

fn spawn_check(
    check: &Arc<dyn VerificationCheck>,
    profile: &Arc<VendorProfile>,
) -> CheckTask {
    let check = Arc::clone(check);
    let profile = Arc::clone(profile);
    let span = info_span!("verification_check", check = check.id().as_str());
    CheckTask(tokio::spawn(
        async move { check.verify(&profile).await }.instrument(span),
    ))
}

/// A panicking adapter settles as `error` instead of sinking the run.
async fn settle(slot: CheckId, mut task: CheckTask) -> CheckOutcome {
    match (&mut task.0).await {
        Ok(outcome) => outcome,
        Err(err) => {
            error!(check = slot.as_str(), error = %err, "verification check aborted");
            CheckOutcome::error(format!("{} unavailable", slot.title()))
        }
    }
}
