use crate::report::{run_verification, VerifyArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use onboarding_verify::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Vendor Onboarding Verification",
    about = "Run vendor identity verification as a service or a one-off check",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Verify a single vendor profile against the configured sources
    Verify(VerifyArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Verify(args) => run_verification(args).await,
    }
}
