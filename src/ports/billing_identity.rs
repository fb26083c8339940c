//! Billing identity port.
//!
//! Maps a user to the customer record that owns their subscription.

use async_trait::async_trait;

use super::CollaboratorError;
use crate::domain::foundation::{BillingCustomerId, UserId};

/// Port for resolving a user's billing customer.
#[async_trait]
pub trait BillingIdentityLookup: Send + Sync {
    /// Returns `None` when the user has no billing customer.
    async fn get_billing_customer_id(
        &self,
        user_id: &UserId,
    ) -> Result<Option<BillingCustomerId>, CollaboratorError>;
}
