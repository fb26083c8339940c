//! HTTP handlers for plan-change endpoints.
//!
//! These handlers connect Axum routes to the plan-change evaluation handler.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Json, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use thiserror::Error;

use crate::application::{EvaluatePlanChangeHandler, PlanChangeTrigger};

use super::dto::{ErrorResponse, EvaluationResponse, HealthResponse};

// ════════════════════════════════════════════════════════════════════════════════
// Application State
// ════════════════════════════════════════════════════════════════════════════════

/// Shared state for the gate routes.
#[derive(Clone)]
pub struct GateAppState {
    pub handler: Arc<EvaluatePlanChangeHandler>,
}

impl GateAppState {
    pub fn new(handler: Arc<EvaluatePlanChangeHandler>) -> Self {
        Self { handler }
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Handlers
// ════════════════════════════════════════════════════════════════════════════════

/// POST /v1/plan-change/evaluate - Evaluate a plan-change trigger
///
/// Always 200 for a well-formed body; the decision is in the response.
pub async fn evaluate_plan_change(
    State(state): State<GateAppState>,
    payload: Result<Json<PlanChangeTrigger>, JsonRejection>,
) -> Result<impl IntoResponse, GateError> {
    let Json(trigger) = payload?;

    let evaluation = state.handler.handle(&trigger).await;

    Ok(Json(EvaluationResponse::from(&evaluation)))
}

/// GET /health - Liveness probe
pub async fn health() -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}

// ════════════════════════════════════════════════════════════════════════════════
// Error Handling
// ════════════════════════════════════════════════════════════════════════════════

/// API error type for the gate endpoints.
#[derive(Debug, Error)]
pub enum GateError {
    #[error("Request body is not valid JSON for a plan-change trigger: {0}")]
    InvalidPayload(String),

    #[error("Expected request with `Content-Type: application/json`")]
    UnsupportedMediaType,
}

impl From<JsonRejection> for GateError {
    fn from(rejection: JsonRejection) -> Self {
        match rejection {
            JsonRejection::MissingJsonContentType(_) => GateError::UnsupportedMediaType,
            other => GateError::InvalidPayload(other.body_text()),
        }
    }
}

impl IntoResponse for GateError {
    fn into_response(self) -> axum::response::Response {
        let (status, error_code) = match &self {
            GateError::InvalidPayload(_) => (StatusCode::BAD_REQUEST, "INVALID_PAYLOAD"),
            GateError::UnsupportedMediaType => {
                (StatusCode::UNSUPPORTED_MEDIA_TYPE, "UNSUPPORTED_MEDIA_TYPE")
            }
        };

        tracing::debug!(error = %self, "Rejected plan change request");
        let body = ErrorResponse::new(error_code, self.to_string());
        (status, Json(body)).into_response()
    }
}
