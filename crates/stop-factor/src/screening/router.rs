use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::service::{StopFactorService, StopFactorServiceError};
use crate::intake::{LoanRequestId, LoanRequestRepository};
use crate::settings::SettingsRepository;

/// Pair of already assembled identity names to compare.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StopFactorRequest {
    #[serde(default)]
    pub reg_person_string: Option<String>,
    #[serde(default)]
    pub verified_name_string: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StopFactorResponse {
    pub stop_factor: bool,
}

/// Router builder exposing stop-factor calculation endpoints.
pub fn screening_router<R, S>(service: Arc<StopFactorService<R, S>>) -> Router
where
    R: LoanRequestRepository + 'static,
    S: SettingsRepository + 'static,
{
    Router::new()
        .route("/api/calculate", post(calculate_handler::<R, S>))
        .route(
            "/api/stop-factor/:loan_request_id",
            get(evaluate_handler::<R, S>),
        )
        .with_state(service)
}

pub(crate) async fn calculate_handler<R, S>(
    State(service): State<Arc<StopFactorService<R, S>>>,
    Json(request): Json<StopFactorRequest>,
) -> Response
where
    R: LoanRequestRepository + 'static,
    S: SettingsRepository + 'static,
{
    match service.calculate(
        request.reg_person_string.as_deref(),
        request.verified_name_string.as_deref(),
    ) {
        Ok(stop_factor) => (StatusCode::OK, Json(StopFactorResponse { stop_factor })).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn evaluate_handler<R, S>(
    State(service): State<Arc<StopFactorService<R, S>>>,
    Path(loan_request_id): Path<String>,
) -> Response
where
    R: LoanRequestRepository + 'static,
    S: SettingsRepository + 'static,
{
    match service.evaluate(&LoanRequestId(loan_request_id)) {
        Ok(report) => (StatusCode::OK, Json(report)).into_response(),
        Err(error) => error_response(error),
    }
}

fn error_response(error: StopFactorServiceError) -> Response {
    let status = match error {
        StopFactorServiceError::IdentityNotFound(_) => StatusCode::NOT_FOUND,
        StopFactorServiceError::Settings(_) | StopFactorServiceError::Repository(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };

    let payload = json!({
        "error": error.to_string(),
    });
    (status, Json(payload)).into_response()
}
