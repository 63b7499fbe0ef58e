use crate::commands::{run_calculate, run_ingest, CalculateArgs, IngestArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use stop_factor::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Stop Factor Service",
    about = "Ingest loan-request payloads and screen applicant identities for stop factors",
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
    /// Process payload files and print a stop-factor report for each stored request
    Ingest(IngestArgs),
    /// Compare two names directly without storing anything
    Calculate(CalculateArgs),
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
        Command::Ingest(args) => run_ingest(args),
        Command::Calculate(args) => run_calculate(args),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_subcommand_parses() {
        let cli = Cli::try_parse_from(["stop-factor-api"]).expect("parses");
        assert!(cli.command.is_none());
    }

    #[test]
    fn calculate_arguments_parse() {
        let cli = Cli::try_parse_from([
            "stop-factor-api",
            "calculate",
            "--reg",
            "Solomon Awich",
            "--verified",
            "SOLOMON RAORE AWICH",
            "--threshold",
            "0.9",
        ])
        .expect("parses");

        match cli.command {
            Some(Command::Calculate(args)) => {
                assert_eq!(args.reg, "Solomon Awich");
                assert_eq!(args.threshold, Some(0.9));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn ingest_requires_at_least_one_file() {
        assert!(Cli::try_parse_from(["stop-factor-api", "ingest"]).is_err());
    }
}
