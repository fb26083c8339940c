//! Gate policy configuration

use serde::Deserialize;

use super::error::ValidationError;
use crate::domain::foundation::FeatureKey;
use crate::domain::gate::{TrackedFeature, UsageFallback};

/// Which feature the gate tracks and how it treats missing usage.
#[derive(Debug, Clone, Deserialize)]
pub struct GateConfig {
    /// Entitlement feature key to evaluate
    #[serde(default = "default_feature_key")]
    pub feature_key: String,

    /// Human-readable label used in deny reasons
    #[serde(default = "default_feature_label")]
    pub feature_label: String,

    /// Policy when usage cannot be measured: `conservative` or `optimistic`
    #[serde(default)]
    pub usage_fallback: UsageFallback,
}

impl GateConfig {
    pub fn tracked_feature(&self) -> Result<TrackedFeature, ValidationError> {
        let key = FeatureKey::new(self.feature_key.trim())
            .map_err(|_| ValidationError::BlankFeatureKey)?;
        if self.feature_label.trim().is_empty() {
            return Err(ValidationError::BlankFeatureLabel);
        }
        Ok(TrackedFeature::new(key, self.feature_label.trim()))
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        self.tracked_feature().map(|_| ())
    }
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            feature_key: default_feature_key(),
            feature_label: default_feature_label(),
            usage_fallback: UsageFallback::default(),
        }
    }
}

fn default_feature_key() -> String {
    "tracked_accounts".to_string()
}

fn default_feature_label() -> String {
    "tracked accounts".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = GateConfig::default();
        let feature = config.tracked_feature().unwrap();
        assert_eq!(feature.key.as_str(), "tracked_accounts");
        assert_eq!(feature.label, "tracked accounts");
        assert_eq!(config.usage_fallback, UsageFallback::Conservative);
    }

    #[test]
    fn test_blank_feature_key() {
        let config = GateConfig {
            feature_key: " ".to_string(),
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ValidationError::BlankFeatureKey));
    }

    #[test]
    fn test_blank_feature_label() {
        let config = GateConfig {
            feature_label: String::new(),
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ValidationError::BlankFeatureLabel));
    }
}
