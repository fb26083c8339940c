//! Application layer - Handlers.
//!
//! This layer orchestrates domain operations and coordinates between ports.

pub mod handlers;

pub use handlers::plan_change::{
    EvaluatePlanChangeHandler, Evaluation, GateTimeouts, PlanChangeRequest, PlanChangeTrigger,
    Terminal,
};
