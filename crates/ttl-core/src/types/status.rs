use serde::{Deserialize, Serialize};

/// Result of scanning the persisted sysctl configuration.
///
/// Field names are part of the front-end contract.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistentTtl {
    /// Whether a TTL entry is present in the persisted configuration
    pub is_persistent: bool,

    /// The persisted value, when present
    pub ttl_value: Option<u8>,
}

impl PersistentTtl {
    /// No entry found
    #[must_use]
    pub const fn absent() -> Self {
        Self {
            is_persistent: false,
            ttl_value: None,
        }
    }

    /// Entry found with the given value
    #[must_use]
    pub const fn present(value: u8) -> Self {
        Self {
            is_persistent: true,
            ttl_value: Some(value),
        }
    }
}

/// Live and persisted TTL in one snapshot, for display.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TtlStatus {
    /// Value the running kernel stamps on outgoing packets, if readable
    pub current_ttl: Option<u8>,

    /// Whether the live value is the carrier value (65)
    pub is_ttl_65: bool,

    /// What will apply after the next reboot or reload
    pub persistent: PersistentTtl,
}

impl TtlStatus {
    /// Returns true if the live and persisted values agree.
    ///
    /// An unreadable live value or a missing persisted entry never agrees.
    #[must_use]
    pub fn in_sync(&self) -> bool {
        match (self.current_ttl, self.persistent.ttl_value) {
            (Some(live), Some(persisted)) => live == persisted,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn persistent_ttl_json_shape() {
        let json = serde_json::to_value(PersistentTtl::present(65)).unwrap();
        assert_eq!(json, serde_json::json!({ "is_persistent": true, "ttl_value": 65 }));

        let json = serde_json::to_value(PersistentTtl::absent()).unwrap();
        assert_eq!(json, serde_json::json!({ "is_persistent": false, "ttl_value": null }));
    }

    #[test]
    fn in_sync() {
        let mut status = TtlStatus {
            current_ttl: Some(65),
            is_ttl_65: true,
            persistent: PersistentTtl::present(65),
        };
        assert!(status.in_sync());

        status.persistent = PersistentTtl::absent();
        assert!(!status.in_sync());

        status.current_ttl = None;
        status.persistent = PersistentTtl::present(65);
        assert!(!status.in_sync());
    }
}
