//! Live usage port.

use async_trait::async_trait;

use super::CollaboratorError;
use crate::domain::foundation::{FeatureKey, UserId};
use crate::domain::gate::UsageSnapshot;

/// Port for reading current consumption of a metered feature.
#[async_trait]
pub trait UsageSource: Send + Sync {
    async fn get_usage(
        &self,
        subject_id: &UserId,
        feature_key: &FeatureKey,
    ) -> Result<UsageSnapshot, CollaboratorError>;
}
