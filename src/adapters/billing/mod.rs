//! Billing management API adapter.

mod client;
pub mod wire;

pub use client::BillingApiClient;
