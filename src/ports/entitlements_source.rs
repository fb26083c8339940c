//! Entitlements port.
//!
//! Implementations return entitlements already mapped into the canonical
//! shape, expanded per plan.

use async_trait::async_trait;

use super::CollaboratorError;
use crate::domain::entitlement::Entitlement;
use crate::domain::foundation::BillingCustomerId;

/// Port for fetching a customer's entitlements.
#[async_trait]
pub trait EntitlementsSource: Send + Sync {
    /// Fetch every entitlement of `customer_id` with per-plan breakdown.
    ///
    /// `feature_max_fallback` asks the source to report absent maxima as
    /// that value instead of `null`, so all limits arrive in one encoding.
    async fn get_entitlements(
        &self,
        customer_id: &BillingCustomerId,
        feature_max_fallback: u32,
    ) -> Result<Vec<Entitlement>, CollaboratorError>;
}
