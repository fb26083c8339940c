//! HTTP adapters - REST binding for the gate.
//!
//! The host calls the gate over HTTP before committing a plan change.

pub mod plan_change;

pub use plan_change::{gate_router, GateAppState};
