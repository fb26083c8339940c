//! Entitlement domain module.
//!
//! Turns billing entitlement data into the effective limit for a feature
//! under a specific plan.
//!
//! # Module Structure
//!
//! - `limit` - `Limit` sum type, raw values and sentinel normalization
//! - `model` - Canonical `Entitlement` / `PlanLimit` shape
//! - `resolver` - Limit resolution for a (feature, plan) pair

mod limit;
mod model;
mod resolver;

pub use limit::{normalize, Limit, RawLimit, UNLIMITED_SENTINEL};
pub use model::{Entitlement, PlanLimit};
pub use resolver::{resolve, resolve_limit, LimitSource, Resolution};
