//! Plan Gate - Downgrade gating for subscription plan changes
//!
//! This crate decides whether a user may move to another plan by comparing
//! current usage of a tracked feature against the target plan's entitlement
//! limit, and reports denials back to the host.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
