use clap::Args;
use onboarding_verify::config::AppConfig;
use onboarding_verify::error::AppError;
use onboarding_verify::telemetry;
use onboarding_verify::verification::{
    CheckStatus, PublishedVerification, VendorId, VendorProfile, VerificationOrchestrator,
    VerificationReceipt, VerificationService,
};
use std::fmt::Write as _;

#[derive(Args, Debug, Default)]
pub(crate) struct VerifyArgs {
    /// Vendor record identifier shown in the report
    #[arg(long, default_value = "cli")]
    pub(crate) vendor_id: String,
    /// Registered company name
    #[arg(long)]
    pub(crate) company: Option<String>,
    /// Contact e-mail address
    #[arg(long)]
    pub(crate) email: Option<String>,
    /// Contact phone number
    #[arg(long)]
    pub(crate) phone: Option<String>,
    /// Postal address as free text
    #[arg(long)]
    pub(crate) address: Option<String>,
    /// Employer identification number (XX-XXXXXXX)
    #[arg(long)]
    pub(crate) ein: Option<String>,
    /// Print the JSON receipt instead of the reviewer report
    #[arg(long)]
    pub(crate) json: bool,
}

pub(crate) async fn run_verification(args: VerifyArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;

    let VerifyArgs {
        vendor_id,
        company,
        email,
        phone,
        address,
        ein,
        json,
    } = args;

    let profile = VendorProfile {
        company_name: company,
        contact_email: email,
        contact_phone: phone,
        address,
        ein,
    };

    let orchestrator = VerificationOrchestrator::from_config(&config.sources)?;
    let service = VerificationService::new(orchestrator);
    let receipt = service.verify(VendorId(vendor_id), profile).await;

    if json {
        print_json(&receipt);
    } else {
        print!("{}", render_report(&receipt.verification));
    }
    Ok(())
}

fn print_json(receipt: &VerificationReceipt) {
    match serde_json::to_string_pretty(receipt) {
        Ok(json) => println!("{}", json),
        Err(err) => println!("Verification payload unavailable: {}", err),
    }
}

fn status_marker(status: CheckStatus) -> &'static str {
    match status {
        CheckStatus::Verified => "PASS",
        CheckStatus::Warning => "WARN",
        CheckStatus::Failed => "FAIL",
        CheckStatus::Error => "DOWN",
        CheckStatus::Pending => "....",
    }
}

pub(crate) fn render_report(verification: &PublishedVerification) -> String {
    let mut content = String::new();
    writeln!(
        &mut content,
        "Identity verification for vendor {} (run {}, {})",
        verification.vendor_id.0,
        verification.run,
        verification.completed_at.format("%Y-%m-%d %H:%M:%S UTC")
    )
    .expect("write heading");

    for (id, outcome) in verification.result.iter() {
        writeln!(
            &mut content,
            "- [{}] {}: {}",
            status_marker(outcome.status),
            id.title(),
            outcome.message
        )
        .expect("write check line");
    }

    writeln!(
        &mut content,
        "\nOverall verification status: {}",
        verification.overall.headline
    )
    .expect("write overall status");
    content
}

#[cfg(test)]
mod tests {
    use super::*;
    use onboarding_verify::verification::{CheckOutcome, RunTicket, VerificationResult};

    #[test]
    fn report_lists_every_check_and_overall_headline() {
        let result = VerificationResult {
            email_domain: CheckOutcome::verified("Valid email domain - MX records found for acme.com"),
            phone_format: CheckOutcome::verified("Valid US phone format"),
            ein_format: CheckOutcome::failed("Invalid EIN format - should be XX-XXXXXXX"),
            address: CheckOutcome::error("Address verification service unavailable"),
            business_registry: CheckOutcome::warning("No company name provided"),
        };
        let verification = PublishedVerification::new(
            RunTicket {
                vendor_id: VendorId("v-7".to_string()),
                run: 3,
            },
            result,
        );

        let report = render_report(&verification);

        assert!(report.starts_with("Identity verification for vendor v-7 (run 3,"));
        assert!(report.contains("- [FAIL] EIN Format Verification: Invalid EIN format"));
        assert!(report.contains("- [DOWN] Business Address Validation:"));
        assert!(report.contains("- [WARN] Business Registry Check: No company name provided"));
        assert!(report.ends_with("Overall verification status: Verification Issues Found\n"));
        assert_eq!(report.lines().filter(|line| line.starts_with("- [")).count(), 5);
    }
}
