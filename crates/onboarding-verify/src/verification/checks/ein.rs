use std::sync::OnceLock;

use async_trait::async_trait;
use regex::Regex;

use super::VerificationCheck;
use crate::verification::domain::{provided, CheckId, CheckOutcome, VendorProfile};

fn ein_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[0-9]{2}-[0-9]{7}$").expect("valid EIN pattern"))
}

/// Local-only check of the `XX-XXXXXXX` tax identifier shape.
#[derive(Debug, Clone, Copy, Default)]
pub struct EinFormatCheck;

impl EinFormatCheck {
    pub fn check(&self, ein: Option<&str>) -> CheckOutcome {
        let Some(ein) = provided(ein) else {
            return CheckOutcome::warning("No EIN provided");
        };

        if ein_pattern().is_match(ein) {
            CheckOutcome::verified("Valid EIN format (XX-XXXXXXX)")
        } else {
            CheckOutcome::failed("Invalid EIN format - should be XX-XXXXXXX")
        }
    }
}

#[async_trait]
impl VerificationCheck for EinFormatCheck {
    fn id(&self) -> CheckId {
        CheckId::EinFormat
    }

    async fn verify(&self, profile: &VendorProfile) -> CheckOutcome {
        self.check(profile.ein.as_deref())
    }
}
