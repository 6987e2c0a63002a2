//! Enumerations stored in the intake record: lifecycle status, owner role,
//! environment and orientation.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Lifecycle status
// ---------------------------------------------------------------------------

/// External approval state of a screen record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LifecycleStatus {
    Draft,
    Submitted,
    Verified,
    Rejected,
    Blocked,
    ScheduledBlock,
}

impl LifecycleStatus {
    /// Parse a status string from the backend.
    pub fn from_str_db(s: &str) -> Result<Self, CoreError> {
        match s {
            "DRAFT" => Ok(Self::Draft),
            "SUBMITTED" => Ok(Self::Submitted),
            "VERIFIED" => Ok(Self::Verified),
            "REJECTED" => Ok(Self::Rejected),
            "BLOCKED" => Ok(Self::Blocked),
            "SCHEDULED_BLOCK" => Ok(Self::ScheduledBlock),
            _ => Err(CoreError::Validation(format!(
                "Invalid lifecycle status '{s}'. Must be one of: DRAFT, SUBMITTED, VERIFIED, \
                 REJECTED, BLOCKED, SCHEDULED_BLOCK"
            ))),
        }
    }

    /// Convert to the backend string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "DRAFT",
            Self::Submitted => "SUBMITTED",
            Self::Verified => "VERIFIED",
            Self::Rejected => "REJECTED",
            Self::Blocked => "BLOCKED",
            Self::ScheduledBlock => "SCHEDULED_BLOCK",
        }
    }
}

// ---------------------------------------------------------------------------
// Owner role
// ---------------------------------------------------------------------------

/// Who operates the screen. Anything outside the known roles is kept as
/// free text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OwnerRole {
    Xigi,
    Partner,
    Franchise,
    Other(String),
}

impl OwnerRole {
    /// Parse a role string. Never fails; unknown roles become `Other`.
    pub fn parse(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "xigi" => Self::Xigi,
            "partner" => Self::Partner,
            "franchise" => Self::Franchise,
            _ => Self::Other(s.trim().to_string()),
        }
    }

    /// Roles whose submissions skip review and land as verified.
    pub fn is_trusted(&self) -> bool {
        matches!(self, Self::Xigi | Self::Franchise)
    }
}

/// Lifecycle status a submission lands in for the given role.
///
/// Trusted roles (xigi, franchise) go straight to `Verified`; everything
/// else, including a missing role, goes to review as `Submitted`.
pub fn submission_status(role: Option<&str>) -> LifecycleStatus {
    match role.map(OwnerRole::parse) {
        Some(r) if r.is_trusted() => LifecycleStatus::Verified,
        _ => LifecycleStatus::Submitted,
    }
}

// ---------------------------------------------------------------------------
// Environment
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Environment {
    Indoor,
    Outdoor,
}

impl Environment {
    pub fn from_str_db(s: &str) -> Result<Self, CoreError> {
        match s {
            "Indoor" => Ok(Self::Indoor),
            "Outdoor" => Ok(Self::Outdoor),
            _ => Err(CoreError::Validation(format!(
                "Invalid environment '{s}'. Must be one of: Indoor, Outdoor"
            ))),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Indoor => "Indoor",
            Self::Outdoor => "Outdoor",
        }
    }
}

// ---------------------------------------------------------------------------
// Orientation
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Orientation {
    Landscape,
    Portrait,
    Square,
}

impl Orientation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Landscape => "LANDSCAPE",
            Self::Portrait => "PORTRAIT",
            Self::Square => "SQUARE",
        }
    }

    /// Largest creative upload the screen accepts, if capped.
    pub fn max_upload_size(&self) -> Option<&'static str> {
        match self {
            Self::Landscape => Some("1 GB"),
            Self::Portrait => Some("100 MB"),
            Self::Square => None,
        }
    }
}
