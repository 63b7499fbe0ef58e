use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Router,
};
use serde_json::json;

use super::repository::LoanRequestRepository;
use super::service::{IntakeError, LoanRequestIntakeService};

/// Router builder exposing payload intake endpoints.
pub fn intake_router<R>(service: Arc<LoanRequestIntakeService<R>>) -> Router
where
    R: LoanRequestRepository + 'static,
{
    Router::new()
        .route("/api/process", post(process_handler::<R>))
        .route("/api/process-all", post(process_all_handler::<R>))
        .with_state(service)
}

pub(crate) async fn process_handler<R>(
    State(service): State<Arc<LoanRequestIntakeService<R>>>,
    body: String,
) -> Response
where
    R: LoanRequestRepository + 'static,
{
    match service.process(&body) {
        Ok(loan_request_id) => {
            let payload = json!({
                "message": "Request processed successfully",
                "loan_request_id": loan_request_id,
            });
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Err(error @ (IntakeError::MalformedJson(_) | IntakeError::MissingField(_))) => {
            let payload = json!({
                "error": format!("Error processing request: {error}"),
            });
            (StatusCode::BAD_REQUEST, axum::Json(payload)).into_response()
        }
        Err(other) => {
            let payload = json!({
                "error": other.to_string(),
            });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}

pub(crate) async fn process_all_handler<R>(
    State(service): State<Arc<LoanRequestIntakeService<R>>>,
) -> Response
where
    R: LoanRequestRepository + 'static,
{
    match service.process_all() {
        Ok(summary) => {
            let payload = json!({
                "message": "All requests processed successfully",
                "processed": summary.processed,
                "failed": summary.failed,
            });
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Err(error) => {
            let payload = json!({
                "error": format!("Error processing all requests: {error}"),
            });
            (StatusCode::BAD_REQUEST, axum::Json(payload)).into_response()
        }
    }
}
