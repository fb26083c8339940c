//! Limit normalization.
//!
//! Upstream billing data expresses "no cap" three ways: a missing value, a
//! `null`, or the reserved integer `2147483647`. Inside the gate a limit is a
//! proper sum type; the sentinel integer only appears at the boundaries.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::ValidationError;

/// Reserved integer the billing API uses to mean "unlimited".
pub const UNLIMITED_SENTINEL: u32 = 2_147_483_647;

/// A normalized usage ceiling.
///
/// Ordering places every bounded limit below `Unlimited`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "u32", into = "u32")]
pub enum Limit {
    /// A concrete ceiling, always below the sentinel.
    Bounded(u32),
    /// No cap.
    Unlimited,
}

impl Limit {
    /// The most restrictive limit. Used when no entitlement exists for a feature.
    pub const ZERO: Limit = Limit::Bounded(0);

    /// Converts a trusted boundary integer, treating the sentinel (or above) as unlimited.
    pub fn from_sentinel(value: u32) -> Self {
        if value >= UNLIMITED_SENTINEL {
            Limit::Unlimited
        } else {
            Limit::Bounded(value)
        }
    }

    /// Integer form for collaborators that expect the sentinel encoding.
    pub fn as_sentinel(&self) -> u32 {
        match self {
            Limit::Bounded(n) => *n,
            Limit::Unlimited => UNLIMITED_SENTINEL,
        }
    }

    /// Returns true when `usage` fits under this limit (`usage <= limit`).
    pub fn permits(&self, usage: u64) -> bool {
        match self {
            Limit::Bounded(max) => usage <= u64::from(*max),
            Limit::Unlimited => true,
        }
    }

    pub fn is_unlimited(&self) -> bool {
        matches!(self, Limit::Unlimited)
    }
}

impl From<u32> for Limit {
    fn from(value: u32) -> Self {
        Limit::from_sentinel(value)
    }
}

impl From<Limit> for u32 {
    fn from(limit: Limit) -> Self {
        limit.as_sentinel()
    }
}

impl fmt::Display for Limit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Limit::Bounded(n) => write!(f, "{}", n),
            Limit::Unlimited => write!(f, "unlimited"),
        }
    }
}

/// A limit value exactly as the billing API reported it.
///
/// Deserializes from `null` (or a missing field via `#[serde(default)]`),
/// an integer, a decimal, or a numeric string.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawLimit {
    #[default]
    Absent,
    Number(i64),
    Decimal(f64),
    Text(String),
}

impl RawLimit {
    pub fn is_absent(&self) -> bool {
        matches!(self, RawLimit::Absent)
    }
}

impl From<i64> for RawLimit {
    fn from(value: i64) -> Self {
        RawLimit::Number(value)
    }
}

impl From<f64> for RawLimit {
    fn from(value: f64) -> Self {
        RawLimit::Decimal(value)
    }
}

impl From<&str> for RawLimit {
    fn from(value: &str) -> Self {
        RawLimit::Text(value.to_string())
    }
}

impl<T: Into<RawLimit>> From<Option<T>> for RawLimit {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(RawLimit::Absent)
    }
}

/// Normalizes a raw limit.
///
/// - absent → `Unlimited`
/// - `2147483647` as a number or numeric string → `Unlimited`
/// - any other value in `0..2147483647` → `Bounded`, with decimals
///   (`5.0`, `2.9`, `"2.5"`) truncated toward zero
///
/// Negative values, values above the sentinel, non-finite decimals and
/// non-numeric text are malformed upstream data and come back as a
/// `ValidationError`.
pub fn normalize(raw: &RawLimit) -> Result<Limit, ValidationError> {
    let value = match raw {
        RawLimit::Absent => return Ok(Limit::Unlimited),
        RawLimit::Number(n) => *n,
        RawLimit::Decimal(d) => truncate(*d)?,
        RawLimit::Text(text) => parse_text(text)?,
    };

    let sentinel = i64::from(UNLIMITED_SENTINEL);
    if !(0..=sentinel).contains(&value) {
        return Err(ValidationError::out_of_range("limit", 0, sentinel, value));
    }

    // Range checked above, the cast cannot truncate.
    Ok(Limit::from_sentinel(value as u32))
}

fn parse_text(text: &str) -> Result<i64, ValidationError> {
    let trimmed = text.trim();
    if let Ok(n) = trimmed.parse::<i64>() {
        return Ok(n);
    }
    match trimmed.parse::<f64>() {
        Ok(d) if d.is_finite() => truncate(d),
        _ => Err(ValidationError::invalid_format(
            "limit",
            format!("'{}' is not numeric", text),
        )),
    }
}

fn truncate(value: f64) -> Result<i64, ValidationError> {
    let sentinel = i64::from(UNLIMITED_SENTINEL);
    if !value.is_finite() {
        return Err(ValidationError::invalid_format(
            "limit",
            format!("{} is not a finite number", value),
        ));
    }
    if value < 0.0 {
        // `as` saturates, so a huge negative still reports a negative actual.
        return Err(ValidationError::out_of_range("limit", 0, sentinel, value.floor() as i64));
    }
    let whole = value.trunc();
    if whole > sentinel as f64 {
        return Err(ValidationError::out_of_range("limit", 0, sentinel, whole as i64));
    }
    Ok(whole as i64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn absent_normalizes_to_unlimited() {
        assert_eq!(normalize(&RawLimit::Absent), Ok(Limit::Unlimited));
    }

    #[test]
    fn sentinel_number_normalizes_to_unlimited() {
        assert_eq!(normalize(&RawLimit::Number(2147483647)), Ok(Limit::Unlimited));
    }

    #[test]
    fn sentinel_string_normalizes_to_unlimited() {
        assert_eq!(normalize(&RawLimit::from("2147483647")), Ok(Limit::Unlimited));
    }

    #[test]
    fn numeric_string_is_parsed() {
        assert_eq!(normalize(&RawLimit::from(" 25 ")), Ok(Limit::Bounded(25)));
    }

    #[test]
    fn zero_is_a_real_limit() {
        assert_eq!(normalize(&RawLimit::Number(0)), Ok(Limit::ZERO));
    }

    #[test]
    fn negative_is_rejected() {
        let err = normalize(&RawLimit::Number(-1)).unwrap_err();
        assert_eq!(err, ValidationError::out_of_range("limit", 0, 2147483647, -1));
    }

    #[test]
    fn above_sentinel_is_rejected() {
        assert!(normalize(&RawLimit::Number(2147483648)).is_err());
    }

    #[test]
    fn non_numeric_text_is_rejected() {
        assert!(normalize(&RawLimit::from("lots")).is_err());
    }

    #[test]
    fn raw_limit_deserializes_every_shape() {
        let parsed: Vec<RawLimit> =
            serde_json::from_str(r#"[null, 7, 2.5, "2147483647"]"#).unwrap();
        assert_eq!(
            parsed,
            vec![
                RawLimit::Absent,
                RawLimit::Number(7),
                RawLimit::Decimal(2.5),
                RawLimit::from("2147483647"),
            ]
        );
    }

    #[test]
    fn whole_decimal_normalizes_to_its_integer() {
        let raw: RawLimit = serde_json::from_str("5.0").unwrap();
        assert_eq!(normalize(&raw), Ok(Limit::Bounded(5)));
    }

    #[test]
    fn fractional_decimal_truncates() {
        let raw: RawLimit = serde_json::from_str("2.9").unwrap();
        assert_eq!(normalize(&raw), Ok(Limit::Bounded(2)));
    }

    #[test]
    fn decimal_string_truncates() {
        assert_eq!(normalize(&RawLimit::from("2.5")), Ok(Limit::Bounded(2)));
        assert_eq!(normalize(&RawLimit::from(" 7.99 ")), Ok(Limit::Bounded(7)));
    }

    #[test]
    fn sentinel_as_decimal_normalizes_to_unlimited() {
        assert_eq!(normalize(&RawLimit::Decimal(2147483647.0)), Ok(Limit::Unlimited));
    }

    #[test]
    fn negative_decimal_is_rejected() {
        assert!(normalize(&RawLimit::Decimal(-0.5)).is_err());
        assert!(normalize(&RawLimit::from("-2.5")).is_err());
    }

    #[test]
    fn decimal_above_sentinel_is_rejected() {
        assert!(normalize(&RawLimit::Decimal(2147483648.0)).is_err());
        assert!(normalize(&RawLimit::Decimal(1e300)).is_err());
    }

    #[test]
    fn non_finite_values_are_rejected() {
        assert!(normalize(&RawLimit::Decimal(f64::NAN)).is_err());
        assert!(normalize(&RawLimit::Decimal(f64::INFINITY)).is_err());
        assert!(normalize(&RawLimit::from("NaN")).is_err());
        assert!(normalize(&RawLimit::from("inf")).is_err());
    }

    #[test]
    fn none_converts_to_absent() {
        assert!(RawLimit::from(None::<i64>).is_absent());
        assert_eq!(RawLimit::from(Some(3_i64)), RawLimit::Number(3));
    }

    #[test]
    fn unlimited_sorts_above_every_bound() {
        assert!(Limit::Bounded(UNLIMITED_SENTINEL - 1) < Limit::Unlimited);
        assert!(Limit::Bounded(2) < Limit::Bounded(3));
    }

    #[test]
    fn sentinel_round_trips_through_u32() {
        assert_eq!(Limit::from(UNLIMITED_SENTINEL), Limit::Unlimited);
        assert_eq!(u32::from(Limit::Unlimited), UNLIMITED_SENTINEL);
        assert_eq!(serde_json::to_string(&Limit::Unlimited).unwrap(), "2147483647");
        assert_eq!(serde_json::to_string(&Limit::Bounded(2)).unwrap(), "2");
    }

    #[test]
    fn unlimited_permits_any_usage() {
        assert!(Limit::Unlimited.permits(u64::MAX));
    }

    #[test]
    fn bounded_permits_up_to_and_including_limit() {
        assert!(Limit::Bounded(2).permits(2));
        assert!(!Limit::Bounded(2).permits(3));
    }

    #[test]
    fn display_is_human_readable() {
        assert_eq!(Limit::Bounded(10).to_string(), "10");
        assert_eq!(Limit::Unlimited.to_string(), "unlimited");
    }

    proptest! {
        #[test]
        fn any_value_below_sentinel_normalizes_to_itself(n in 0_i64..2147483647) {
            let limit = normalize(&RawLimit::Number(n)).unwrap();
            prop_assert_eq!(i64::from(limit.as_sentinel()), n);
            prop_assert_eq!(limit, Limit::Bounded(n as u32));
        }

        #[test]
        fn decimals_truncate_toward_zero(d in 0.0_f64..2147483647.0) {
            let limit = normalize(&RawLimit::Decimal(d)).unwrap();
            prop_assert_eq!(limit, Limit::Bounded(d.trunc() as u32));
        }

        #[test]
        fn numeric_strings_agree_with_numbers(n in 0_i64..=2147483647) {
            let from_text = normalize(&RawLimit::Text(n.to_string())).unwrap();
            let from_number = normalize(&RawLimit::Number(n)).unwrap();
            prop_assert_eq!(from_text, from_number);
        }
    }
}
