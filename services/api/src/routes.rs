use crate::infra::AppState;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use serde_json::json;
use std::sync::Arc;
use stop_factor::intake::{intake_router, LoanRequestIntakeService, LoanRequestRepository};
use stop_factor::screening::{screening_router, StopFactorService};
use stop_factor::settings::SettingsRepository;

pub(crate) fn with_api_routes<R, S>(
    intake: Arc<LoanRequestIntakeService<R>>,
    screening: Arc<StopFactorService<R, S>>,
) -> axum::Router
where
    R: LoanRequestRepository + 'static,
    S: SettingsRepository + 'static,
{
    intake_router(intake)
        .merge(screening_router(screening))
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}
