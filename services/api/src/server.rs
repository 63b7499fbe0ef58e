use crate::cli::ServeArgs;
use crate::infra::{seeded_settings, AppState, InMemoryLoanRequestRepository};
use crate::routes::with_api_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use stop_factor::config::AppConfig;
use stop_factor::error::AppError;
use stop_factor::intake::LoanRequestIntakeService;
use stop_factor::screening::StopFactorService;
use stop_factor::telemetry;
use tracing::info;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let repository = Arc::new(InMemoryLoanRequestRepository::default());
    let settings = seeded_settings(&config.matching)?;
    let intake = Arc::new(LoanRequestIntakeService::new(repository.clone()));
    let screening = Arc::new(StopFactorService::new(repository, settings));

    let app = with_api_routes(intake, screening)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "stop factor service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
