//! Value object trait: equality by value, not identity.
//!
//! Value objects are domain objects that have **no identity** - they are defined entirely
//! by their attribute values. Two value objects with the same values are considered equal.

use serde::{Deserialize, Serialize};

/// Marker trait for value objects.
///
/// Value objects are **immutable** and **compared by value**. To "modify" one, create a
/// new one with the new values.
///
/// - **Value Object**: `Money::from_major(50)` equals any other `$50.00`
/// - **Entity**: a `Room` with id `HAB-001` is the same room whatever its rate
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}

/// Monetary amount in integer cents (single currency).
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(i64);

impl ValueObject for Money {}

impl Money {
    pub const ZERO: Money = Money(0);

    pub fn from_cents(cents: i64) -> Self {
        Self(cents)
    }

    /// Whole currency units (e.g. `from_major(120)` is `$120.00`).
    pub fn from_major(units: i64) -> Self {
        Self(units * 100)
    }

    pub fn cents(self) -> i64 {
        self.0
    }

    /// Price of `nights` at this nightly rate.
    pub fn times(self, nights: u32) -> Self {
        Self(self.0 * i64::from(nights))
    }

    pub fn is_negative(self) -> bool {
        self.0 < 0
    }

    pub fn is_zero(self) -> bool {
        self.0 == 0
    }
}

impl core::fmt::Display for Money {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        write!(f, "{sign}${}.{:02}", abs / 100, abs % 100)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn displays_with_two_decimals() {
        assert_eq!(Money::from_major(120).to_string(), "$120.00");
        assert_eq!(Money::from_cents(5).to_string(), "$0.05");
        assert_eq!(Money::from_cents(-250).to_string(), "-$2.50");
    }

    #[test]
    fn nightly_rate_scales_with_nights() {
        assert_eq!(Money::from_major(80).times(3), Money::from_major(240));
        assert!(Money::from_major(80).times(0).is_zero());
    }

    proptest! {
        #[test]
        fn equal_amounts_are_equal_values(cents in -1_000_000i64..1_000_000i64) {
            prop_assert_eq!(Money::from_cents(cents), Money::from_cents(cents));
            prop_assert_eq!(Money::from_cents(cents).cents(), cents);
        }
    }
}
