//! Strongly-typed identifiers used across the domain.
//!
//! Identifiers are readable codes (`CLI-0001`, `HAB-001`, `RES-0001`) rather than
//! opaque UUIDs: front-desk staff read them off receipts and type them back in.

use core::str::FromStr;
use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Identifier of a hotel guest.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClientId(String);

/// Identifier of a room.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoomId(String);

/// Identifier of a reservation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReservationId(String);

macro_rules! impl_code_newtype {
    ($t:ty, $prefix:literal, $width:literal, $name:literal) => {
        impl $t {
            /// Code prefix including the dash (e.g. `"CLI-"`).
            pub const PREFIX: &'static str = concat!($prefix, "-");

            /// Build the canonical code for a sequence number (zero-padded).
            pub fn from_sequence(n: u32) -> Self {
                Self(format!("{}{:0width$}", Self::PREFIX, n, width = $width))
            }

            /// Wrap an arbitrary code without validation.
            ///
            /// Prefer `FromStr` for user input.
            pub fn new(code: impl Into<String>) -> Self {
                Self(code.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Numeric suffix of a canonical code; `None` for foreign codes.
            pub fn sequence(&self) -> Option<u32> {
                self.0.strip_prefix(Self::PREFIX)?.parse().ok()
            }

            /// Next canonical code after the highest sequence in `existing`.
            pub fn next_after<'a, I>(existing: I) -> Self
            where
                I: IntoIterator<Item = &'a $t>,
            {
                let max = existing
                    .into_iter()
                    .filter_map(|id| id.sequence())
                    .max()
                    .unwrap_or(0);
                Self::from_sequence(max + 1)
            }
        }

        impl core::fmt::Display for $t {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<$t> for String {
            fn from(value: $t) -> Self {
                value.0
            }
        }

        impl FromStr for $t {
            type Err = DomainError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    return Err(DomainError::invalid_id(format!("{}: empty code", $name)));
                }
                Ok(Self(trimmed.to_string()))
            }
        }
    };
}

impl_code_newtype!(ClientId, "CLI", 4, "ClientId");
impl_code_newtype!(RoomId, "HAB", 3, "RoomId");
impl_code_newtype!(ReservationId, "RES", 4, "ReservationId");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_are_zero_padded_per_kind() {
        assert_eq!(ClientId::from_sequence(7).as_str(), "CLI-0007");
        assert_eq!(RoomId::from_sequence(12).as_str(), "HAB-012");
        assert_eq!(ReservationId::from_sequence(1).as_str(), "RES-0001");
    }

    #[test]
    fn next_after_skips_foreign_codes() {
        let ids = vec![
            ClientId::from_sequence(3),
            ClientId::new("legacy-guest"),
            ClientId::from_sequence(9),
        ];
        assert_eq!(ClientId::next_after(&ids), ClientId::from_sequence(10));
        assert_eq!(ClientId::next_after(&[]), ClientId::from_sequence(1));
    }

    #[test]
    fn blank_codes_are_rejected() {
        let err = "   ".parse::<RoomId>().unwrap_err();
        assert!(matches!(err, DomainError::InvalidId(_)));
        assert_eq!(" 101 ".parse::<RoomId>().unwrap().as_str(), "101");
    }
}
