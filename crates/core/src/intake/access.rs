//! Access policy: which fields may be edited for a screen, based on its
//! lifecycle status.

use serde::{Deserialize, Serialize};

use super::fields;
use super::status::LifecycleStatus;

/// Edit permission for a whole wizard session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessMode {
    /// Every non-derived field is editable.
    Full,
    /// Only pricing, connectivity and compliance-document fields are
    /// editable; identity, location and physical specs are read-only.
    Restricted,
}

impl AccessMode {
    /// Whether an edit to `key` is accepted under this mode.
    pub fn allows(&self, key: &str) -> bool {
        if fields::is_derived(key) {
            return false;
        }
        match self {
            Self::Full => true,
            Self::Restricted => fields::RESTRICTED_EDITABLE_FIELDS.contains(&key),
        }
    }
}

/// Resolve the access mode from a raw lifecycle status.
///
/// Verified and scheduled-block screens are restricted. Everything else,
/// including new records and statuses this client does not recognise, gets
/// full access so the record stays editable.
pub fn resolve(status: Option<&str>) -> AccessMode {
    match status.map(LifecycleStatus::from_str_db) {
        Some(Ok(LifecycleStatus::Verified | LifecycleStatus::ScheduledBlock)) => {
            AccessMode::Restricted
        }
        _ => AccessMode::Full,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verified_and_scheduled_block_are_restricted() {
        assert_eq!(resolve(Some("VERIFIED")), AccessMode::Restricted);
        assert_eq!(resolve(Some("SCHEDULED_BLOCK")), AccessMode::Restricted);
    }

    #[test]
    fn other_statuses_are_full() {
        for status in ["DRAFT", "SUBMITTED", "REJECTED", "BLOCKED"] {
            assert_eq!(resolve(Some(status)), AccessMode::Full, "{status}");
        }
    }

    #[test]
    fn unknown_or_missing_status_is_full() {
        assert_eq!(resolve(None), AccessMode::Full);
        assert_eq!(resolve(Some("ARCHIVED")), AccessMode::Full);
        assert_eq!(resolve(Some("")), AccessMode::Full);
    }

    #[test]
    fn restricted_blocks_identity_and_specs() {
        let mode = AccessMode::Restricted;
        assert!(!mode.allows(fields::SCREEN_NAME));
        assert!(!mode.allows(fields::CITY));
        assert!(!mode.allows(fields::RESOLUTION_WIDTH));
        assert!(!mode.allows(fields::TOTAL_SLOTS_PER_LOOP));
    }

    #[test]
    fn restricted_allows_pricing_connectivity_compliance() {
        let mode = AccessMode::Restricted;
        assert!(mode.allows(fields::BASE_PRICE_PER_SLOT_INR));
        assert!(mode.allows(fields::CONNECTIVITY_TYPE));
        assert!(mode.allows(fields::OWNERSHIP_PROOF_UPLOADED));
        assert!(mode.allows(fields::GST_NUMBER));
    }

    #[test]
    fn derived_fields_are_never_editable() {
        assert!(!AccessMode::Full.allows(fields::LOOP_LENGTH_SEC));
        assert!(!AccessMode::Full.allows(fields::ORIENTATION));
        assert!(!AccessMode::Restricted.allows(fields::MAX_UPLOAD_SIZE));
    }
}
