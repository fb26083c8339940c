//! Fixed usage counts for local runs and tests.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use async_trait::async_trait;

use crate::domain::foundation::{FeatureKey, UserId};
use crate::domain::gate::UsageSnapshot;
use crate::ports::{CollaboratorError, UsageSource};

/// Usage source backed by a map of `(subject, feature) -> count`.
///
/// Unknown pairs return `NotFound`, matching the metering API.
#[derive(Debug, Default)]
pub struct StaticUsageSource {
    counts: RwLock<HashMap<(UserId, FeatureKey), u64>>,
    force_error: RwLock<Option<CollaboratorError>>,
}

impl StaticUsageSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_count(self, subject_id: UserId, feature_key: FeatureKey, count: u64) -> Self {
        self.set_count(subject_id, feature_key, count);
        self
    }

    /// Makes every lookup fail with `error`.
    pub fn with_error(self, error: CollaboratorError) -> Self {
        *self.force_error.write().unwrap_or_else(PoisonError::into_inner) = Some(error);
        self
    }

    pub fn set_count(&self, subject_id: UserId, feature_key: FeatureKey, count: u64) {
        self.counts
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert((subject_id, feature_key), count);
    }
}

#[async_trait]
impl UsageSource for StaticUsageSource {
    async fn get_usage(
        &self,
        subject_id: &UserId,
        feature_key: &FeatureKey,
    ) -> Result<UsageSnapshot, CollaboratorError> {
        if let Some(err) = self
            .force_error
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
        {
            return Err(err);
        }

        let counts = self.counts.read().unwrap_or_else(PoisonError::into_inner);
        counts
            .get(&(subject_id.clone(), feature_key.clone()))
            .map(|&count| UsageSnapshot {
                subject_id: subject_id.clone(),
                count,
            })
            .ok_or_else(|| CollaboratorError::not_found("usage subject"))
    }
}
