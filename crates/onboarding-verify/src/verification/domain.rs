use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Identifier wrapper for the vendor record under review.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VendorId(pub String);

/// Contact and business fields submitted by a vendor. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VendorProfile {
    pub company_name: Option<String>,
    pub contact_email: Option<String>,
    pub contact_phone: Option<String>,
    pub address: Option<String>,
    pub ein: Option<String>,
}

/// Treats blank strings as absent. Present values are passed through untouched
/// so surrounding whitespace still fails the anchored format rules.
pub(crate) fn provided(value: Option<&str>) -> Option<&str> {
    value.filter(|value| !value.trim().is_empty())
}

/// Closed status taxonomy shared by every check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckStatus {
    Verified,
    Warning,
    Failed,
    Error,
    Pending,
}

impl CheckStatus {
    pub fn label(self) -> &'static str {
        match self {
            CheckStatus::Verified => "verified",
            CheckStatus::Warning => "warning",
            CheckStatus::Failed => "failed",
            CheckStatus::Error => "error",
            CheckStatus::Pending => "pending",
        }
    }
}

/// Result of one verification check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckOutcome {
    pub status: CheckStatus,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<Map<String, Value>>,
}

impl CheckOutcome {
    pub fn new(status: CheckStatus, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            details: None,
        }
    }

    pub fn verified(message: impl Into<String>) -> Self {
        Self::new(CheckStatus::Verified, message)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(CheckStatus::Warning, message)
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self::new(CheckStatus::Failed, message)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(CheckStatus::Error, message)
    }

    pub fn pending(message: impl Into<String>) -> Self {
        Self::new(CheckStatus::Pending, message)
    }

    pub fn with_details(mut self, details: Map<String, Value>) -> Self {
        self.details = Some(details);
        self
    }

    pub fn with_optional_details(mut self, details: Option<Map<String, Value>>) -> Self {
        self.details = details;
        self
    }
}

/// The five fixed verification slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckId {
    EmailDomain,
    PhoneFormat,
    EinFormat,
    Address,
    BusinessRegistry,
}

impl CheckId {
    pub const ALL: [CheckId; 5] = [
        CheckId::EmailDomain,
        CheckId::PhoneFormat,
        CheckId::EinFormat,
        CheckId::Address,
        CheckId::BusinessRegistry,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            CheckId::EmailDomain => "email_domain",
            CheckId::PhoneFormat => "phone_format",
            CheckId::EinFormat => "ein_format",
            CheckId::Address => "address",
            CheckId::BusinessRegistry => "business_registry",
        }
    }

    /// Reviewer-facing heading for the check.
    pub fn title(self) -> &'static str {
        match self {
            CheckId::EmailDomain => "Email Domain Verification",
            CheckId::PhoneFormat => "Phone Number Validation",
            CheckId::EinFormat => "EIN Format Verification",
            CheckId::Address => "Business Address Validation",
            CheckId::BusinessRegistry => "Business Registry Check",
        }
    }
}

/// Aggregate of all five check outcomes, keyed by fixed identifiers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerificationResult {
    pub email_domain: CheckOutcome,
    pub phone_format: CheckOutcome,
    pub ein_format: CheckOutcome,
    pub address: CheckOutcome,
    pub business_registry: CheckOutcome,
}

impl VerificationResult {
    /// Placeholder shown while a run is in flight.
    pub fn pending() -> Self {
        Self {
            email_domain: CheckOutcome::pending("Checking..."),
            phone_format: CheckOutcome::pending("Validating..."),
            ein_format: CheckOutcome::pending("Validating..."),
            address: CheckOutcome::pending("Verifying..."),
            business_registry: CheckOutcome::pending("Searching..."),
        }
    }

    pub fn get(&self, id: CheckId) -> &CheckOutcome {
        match id {
            CheckId::EmailDomain => &self.email_domain,
            CheckId::PhoneFormat => &self.phone_format,
            CheckId::EinFormat => &self.ein_format,
            CheckId::Address => &self.address,
            CheckId::BusinessRegistry => &self.business_registry,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (CheckId, &CheckOutcome)> + '_ {
        CheckId::ALL.into_iter().map(move |id| (id, self.get(id)))
    }

    pub fn is_settled(&self) -> bool {
        self.iter()
            .all(|(_, outcome)| outcome.status != CheckStatus::Pending)
    }

    /// Derived on every call; never cached alongside the result.
    pub fn overall(&self) -> OverallStatus {
        OverallStatus::derive(self.iter().map(|(_, outcome)| outcome.status))
    }
}

/// Reviewer-facing signal folded from every check status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverallStatus {
    AllPassed,
    IssuesFound,
    ReviewRequired,
}

impl OverallStatus {
    /// First matching rule wins: all verified, then any failed, then review.
    /// Source outages (`error`) only ever land in `ReviewRequired`.
    pub fn derive<I>(statuses: I) -> Self
    where
        I: IntoIterator<Item = CheckStatus>,
    {
        let mut all_verified = true;
        let mut any_failed = false;

        for status in statuses {
            match status {
                CheckStatus::Verified => {}
                CheckStatus::Failed => {
                    all_verified = false;
                    any_failed = true;
                }
                CheckStatus::Warning | CheckStatus::Error | CheckStatus::Pending => {
                    all_verified = false;
                }
            }
        }

        if all_verified {
            OverallStatus::AllPassed
        } else if any_failed {
            OverallStatus::IssuesFound
        } else {
            OverallStatus::ReviewRequired
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            OverallStatus::AllPassed => "all_passed",
            OverallStatus::IssuesFound => "issues_found",
            OverallStatus::ReviewRequired => "review_required",
        }
    }

    pub fn headline(self) -> &'static str {
        match self {
            OverallStatus::AllPassed => "All Checks Passed",
            OverallStatus::IssuesFound => "Verification Issues Found",
            OverallStatus::ReviewRequired => "Review Required",
        }
    }

    pub fn view(self) -> OverallStatusView {
        OverallStatusView {
            status: self,
            headline: self.headline(),
        }
    }
}

/// Serialized form of [`OverallStatus`] with its supporting text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct OverallStatusView {
    pub status: OverallStatus,
    pub headline: &'static str,
}
