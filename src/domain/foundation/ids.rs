//! Strongly-typed identifier value objects.
//!
//! Every identifier the gate handles is an opaque, non-blank string supplied
//! by a collaborator or the trigger payload. Comparison is exact and
//! case-sensitive.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::ValidationError;

/// Generates a validated string newtype with the shared accessor surface.
macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident, $field:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            #[doc = concat!("Creates a new `", stringify!($name), "`, returning error if blank.")]
            pub fn new(id: impl Into<String>) -> Result<Self, ValidationError> {
                let id = id.into();
                if id.trim().is_empty() {
                    return Err(ValidationError::empty_field($field));
                }
                Ok(Self(id))
            }

            /// Returns the inner string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl TryFrom<String> for $name {
            type Error = ValidationError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl PartialEq<str> for $name {
            fn eq(&self, other: &str) -> bool {
                self.0 == other
            }
        }
    };
}

string_id!(
    /// Identifier of the user requesting the plan change. Also the usage subject.
    UserId,
    "user_id"
);

string_id!(
    /// Code of the organization the user belongs to.
    OrganizationCode,
    "organization_code"
);

string_id!(
    /// Billing plan code, e.g. `free` or `pro`.
    PlanCode,
    "plan_code"
);

string_id!(
    /// Customer identifier in the billing system.
    BillingCustomerId,
    "customer_id"
);

string_id!(
    /// Key of a metered feature, e.g. `tracked_accounts`.
    FeatureKey,
    "feature_key"
);
