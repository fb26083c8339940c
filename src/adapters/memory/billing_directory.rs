//! In-memory billing directory.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use async_trait::async_trait;

use crate::domain::entitlement::Entitlement;
use crate::domain::foundation::{BillingCustomerId, UserId};
use crate::ports::{BillingIdentityLookup, CollaboratorError, EntitlementsSource};

/// Billing identities and entitlements held in memory.
///
/// Implements both billing ports. Used for local runs and tests; nothing
/// survives a restart.
///
/// # Example
///
/// ```ignore
/// let directory = InMemoryBillingDirectory::new()
///     .with_customer(user_id.clone(), customer_id.clone())
///     .with_entitlements(customer_id, vec![entitlement]);
/// ```
#[derive(Debug, Default)]
pub struct InMemoryBillingDirectory {
    customers: RwLock<HashMap<UserId, BillingCustomerId>>,
    entitlements: RwLock<HashMap<BillingCustomerId, Vec<Entitlement>>>,
    identity_error: RwLock<Option<CollaboratorError>>,
    entitlements_error: RwLock<Option<CollaboratorError>>,
}

impl InMemoryBillingDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Links a user to a billing customer.
    pub fn with_customer(self, user_id: UserId, customer_id: BillingCustomerId) -> Self {
        self.insert_customer(user_id, customer_id);
        self
    }

    /// Sets the entitlement list returned for a customer.
    pub fn with_entitlements(
        self,
        customer_id: BillingCustomerId,
        entitlements: Vec<Entitlement>,
    ) -> Self {
        self.insert_entitlements(customer_id, entitlements);
        self
    }

    /// Makes every identity lookup fail with `error`.
    pub fn with_identity_error(self, error: CollaboratorError) -> Self {
        *self
            .identity_error
            .write()
            .unwrap_or_else(PoisonError::into_inner) = Some(error);
        self
    }

    /// Makes every entitlements fetch fail with `error`.
    pub fn with_entitlements_error(self, error: CollaboratorError) -> Self {
        *self
            .entitlements_error
            .write()
            .unwrap_or_else(PoisonError::into_inner) = Some(error);
        self
    }

    pub fn insert_customer(&self, user_id: UserId, customer_id: BillingCustomerId) {
        self.customers
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(user_id, customer_id);
    }

    pub fn insert_entitlements(&self, customer_id: BillingCustomerId, entitlements: Vec<Entitlement>) {
        self.entitlements
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(customer_id, entitlements);
    }
}

#[async_trait]
impl BillingIdentityLookup for InMemoryBillingDirectory {
    async fn get_billing_customer_id(
        &self,
        user_id: &UserId,
    ) -> Result<Option<BillingCustomerId>, CollaboratorError> {
        if let Some(err) = self
            .identity_error
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
        {
            return Err(err);
        }
        Ok(self
            .customers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(user_id)
            .cloned())
    }
}

#[async_trait]
impl EntitlementsSource for InMemoryBillingDirectory {
    async fn get_entitlements(
        &self,
        customer_id: &BillingCustomerId,
        _feature_max_fallback: u32,
    ) -> Result<Vec<Entitlement>, CollaboratorError> {
        if let Some(err) = self
            .entitlements_error
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
        {
            return Err(err);
        }
        Ok(self
            .entitlements
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(customer_id)
            .cloned()
            .unwrap_or_default())
    }
}
