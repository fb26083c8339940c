//! Axum router configuration for the gate endpoints.

use std::time::Duration;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use super::handlers::{evaluate_plan_change, health, GateAppState};

/// Create the gate API routes.
///
/// # Routes
/// - `POST /v1/plan-change/evaluate` - Evaluate a plan-change trigger
/// - `GET /health` - Liveness probe
pub fn gate_routes() -> Router<GateAppState> {
    Router::new()
        .route("/v1/plan-change/evaluate", post(evaluate_plan_change))
        .route("/health", get(health))
}

/// Create the complete gate router with state and middleware applied.
///
/// `request_timeout` bounds a whole request; it should exceed the sum of the
/// per-collaborator budgets or the host sees a 408 instead of a decision.
///
/// # Example
///
/// ```ignore
/// let app = gate_router(GateAppState::new(handler), Duration::from_secs(30));
/// axum::serve(listener, app).await?;
/// ```
pub fn gate_router(state: GateAppState, request_timeout: Duration) -> Router {
    gate_routes()
        .with_state(state)
        .layer(TimeoutLayer::new(request_timeout))
        .layer(TraceLayer::new_for_http())
}
