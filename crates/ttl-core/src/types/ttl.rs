use serde::{Deserialize, Serialize};

use crate::error::{Result, TtlError};

/// Sentinel returned by the boolean/integer facades when the live TTL could
/// not be determined. Never a valid TTL.
pub const TTL_UNKNOWN: i32 = -1;

/// A validated default IPv4 TTL.
///
/// Only values in [`Ttl::MIN`]`..=`[`Ttl::MAX`] can be constructed; anything
/// else is rejected, never clamped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u8")]
pub struct Ttl(u8);

impl Ttl {
    /// Lowest TTL accepted on the device
    pub const MIN: u8 = 32;

    /// Highest TTL accepted on the device
    pub const MAX: u8 = 128;

    /// Carrier tethering-detection evasion value
    pub const CARRIER: Self = Self(65);

    /// Linux default
    pub const DEFAULT: Self = Self(64);

    /// Validate a candidate TTL.
    pub fn new(value: i64) -> Result<Self> {
        match u8::try_from(value) {
            Ok(v) if (Self::MIN..=Self::MAX).contains(&v) => Ok(Self(v)),
            _ => Err(TtlError::OutOfRange {
                value,
                min: Self::MIN,
                max: Self::MAX,
            }),
        }
    }

    /// Returns the raw value
    #[must_use]
    pub const fn get(self) -> u8 {
        self.0
    }

    /// Returns true for the carrier value (65)
    #[must_use]
    pub const fn is_carrier(self) -> bool {
        self.0 == Self::CARRIER.0
    }
}

impl TryFrom<i64> for Ttl {
    type Error = TtlError;

    fn try_from(value: i64) -> Result<Self> {
        Self::new(value)
    }
}

impl From<Ttl> for u8 {
    fn from(ttl: Ttl) -> Self {
        ttl.0
    }
}

impl std::fmt::Display for Ttl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_whole_range() {
        for v in i64::from(Ttl::MIN)..=i64::from(Ttl::MAX) {
            let ttl = Ttl::new(v).unwrap();
            assert_eq!(i64::from(ttl.get()), v);
        }
    }

    #[test]
    fn rejects_outside_range() {
        for v in [i64::MIN, -1, 0, 1, 10, 31, 129, 255, 256, i64::MAX] {
            let err = Ttl::new(v).unwrap_err();
            assert!(err.is_validation(), "{v} should be a validation error");
        }
    }

    #[test]
    fn constants() {
        assert_eq!(Ttl::CARRIER.get(), 65);
        assert_eq!(Ttl::DEFAULT.get(), 64);
        assert!(Ttl::CARRIER.is_carrier());
        assert!(!Ttl::DEFAULT.is_carrier());
        assert_ne!(TTL_UNKNOWN, i32::from(Ttl::CARRIER.get()));
    }

    #[test]
    fn serde_validates() {
        assert_eq!(serde_json::to_string(&Ttl::CARRIER).unwrap(), "65");
        assert_eq!(serde_json::from_str::<Ttl>("64").unwrap(), Ttl::DEFAULT);
        assert!(serde_json::from_str::<Ttl>("10").is_err());
    }
}
