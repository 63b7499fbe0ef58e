use crate::infra::{seeded_settings, InMemoryLoanRequestRepository};
use clap::Args;
use std::path::PathBuf;
use std::sync::Arc;
use stop_factor::config::{AppConfig, MatchingConfig};
use stop_factor::error::AppError;
use stop_factor::intake::LoanRequestIntakeService;
use stop_factor::screening::{StopFactorReport, StopFactorService};
use stop_factor::telemetry;
use tracing::warn;

#[derive(Args, Debug)]
pub(crate) struct IngestArgs {
    /// Loan-request JSON payload files to process
    #[arg(required = true)]
    pub(crate) files: Vec<PathBuf>,
    /// Distance ratio threshold; falls back to APP_DISTANCE_RATIO_THRESHOLD
    #[arg(long)]
    pub(crate) threshold: Option<f64>,
}

#[derive(Args, Debug)]
pub(crate) struct CalculateArgs {
    /// Name as typed on the registration form
    #[arg(long)]
    pub(crate) reg: String,
    /// Name confirmed by the credit bureau
    #[arg(long)]
    pub(crate) verified: String,
    /// Distance ratio threshold; falls back to APP_DISTANCE_RATIO_THRESHOLD
    #[arg(long)]
    pub(crate) threshold: Option<f64>,
}

pub(crate) fn run_ingest(args: IngestArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;

    let outcome = ingest_files(&args.files, &matching_config(&config, args.threshold))?;
    print!("{}", render_reports(&outcome.reports));
    if outcome.failed > 0 {
        println!("{} payload(s) rejected", outcome.failed);
    }

    Ok(())
}

pub(crate) fn run_calculate(args: CalculateArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;

    let stop_factor = calculate(&args, &matching_config(&config, args.threshold))?;
    println!("stop factor: {stop_factor}");
    Ok(())
}

#[derive(Debug)]
struct IngestOutcome {
    reports: Vec<StopFactorReport>,
    failed: usize,
}

/// Unreadable files and rejected payloads are logged and counted; the rest still get reports.
fn ingest_files(files: &[PathBuf], matching: &MatchingConfig) -> Result<IngestOutcome, AppError> {
    let repository = Arc::new(InMemoryLoanRequestRepository::default());
    let settings = seeded_settings(matching)?;
    let intake = LoanRequestIntakeService::new(repository.clone());
    let screening = StopFactorService::new(repository, settings);

    let mut failed = 0usize;
    for path in files {
        let raw = match std::fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(error) => {
                warn!(path = %path.display(), %error, "payload file unreadable");
                failed += 1;
                continue;
            }
        };
        if let Err(error) = intake.process(&raw) {
            warn!(path = %path.display(), %error, "payload rejected");
            failed += 1;
        }
    }

    let reports = screening.evaluate_all()?;
    Ok(IngestOutcome { reports, failed })
}

fn calculate(args: &CalculateArgs, matching: &MatchingConfig) -> Result<bool, AppError> {
    let repository = Arc::new(InMemoryLoanRequestRepository::default());
    let screening = StopFactorService::new(repository, seeded_settings(matching)?);

    Ok(screening.calculate(Some(args.reg.as_str()), Some(args.verified.as_str()))?)
}

fn matching_config(config: &AppConfig, threshold: Option<f64>) -> MatchingConfig {
    MatchingConfig {
        distance_ratio_threshold: threshold.or(config.matching.distance_ratio_threshold),
    }
}

fn render_reports(reports: &[StopFactorReport]) -> String {
    let mut output = String::new();
    for report in reports {
        output.push_str(&format!(
            "{}\n  registered: {}\n  verified:   {}\n  stop factor: {}\n",
            report.loan_request_id, report.reg_person, report.verified_name, report.stop_factor
        ));
    }
    if reports.is_empty() {
        output.push_str("no loan requests with both identities\n");
    }
    output
}
