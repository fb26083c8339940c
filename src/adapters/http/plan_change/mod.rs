//! HTTP adapter for plan-change evaluation.
//!
//! - `POST /v1/plan-change/evaluate` - Evaluate a plan-change trigger
//! - `GET /health` - Liveness probe

pub mod dto;
pub mod handlers;
pub mod routes;

pub use dto::*;
pub use handlers::{GateAppState, GateError};
pub use routes::{gate_router, gate_routes};
