//! Per-step validation rule tables and result types.
//!
//! Each wizard step has a fixed, ordered list of [`StepRule`]s. A rule pairs
//! a check on one field with a condition over the record deciding whether
//! the rule applies at all; conditional requirements (outdoor-only fields,
//! toggle-gated sub-fields) are rows in the table rather than branches in
//! the controller.

use serde::{Deserialize, Serialize};

use crate::intake::fields as f;

/// What a rule asserts about its field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Check {
    /// Present and not null, blank or an empty list.
    Required,
    /// A list with at least one element.
    NonEmptyList,
    /// Literally `true`.
    IsTrue,
    /// Anything but `true` (advisory flags that block when raised).
    NotRaised,
    /// Strictly less than another numeric field, when both are set.
    LessThan(&'static str),
    /// A fresh document attachment was chosen.
    AttachmentPresent,
    /// Every seasonal-pricing row is complete and in range.
    WellFormedSeasons,
}

/// When a rule applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Condition {
    Always,
    /// The field's string value differs from the given one (or is unset).
    NotEquals(&'static str, &'static str),
    /// The toggle field is on.
    Enabled(&'static str),
}

/// One row of a step's rule table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepRule {
    pub field: &'static str,
    pub check: Check,
    pub when: Condition,
    pub message: &'static str,
}

impl StepRule {
    const fn new(field: &'static str, check: Check, message: &'static str) -> Self {
        Self {
            field,
            check,
            when: Condition::Always,
            message,
        }
    }

    const fn required(field: &'static str, message: &'static str) -> Self {
        Self::new(field, Check::Required, message)
    }

    const fn when(mut self, condition: Condition) -> Self {
        self.when = condition;
        self
    }
}

/// The first rule that failed for a step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[error("{message}")]
pub struct StepViolation {
    pub step: u8,
    pub field: String,
    pub message: String,
}

/// Whether a finding blocks navigation or is informational.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ValidationSeverity {
    Error,
    Warning,
}

/// A single non-blocking field-level finding.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldViolation {
    pub field: String,
    pub rule_type: String,
    pub message: String,
    pub severity: ValidationSeverity,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<serde_json::Value>,
}

// ---------------------------------------------------------------------------
// Rule tables
// ---------------------------------------------------------------------------

const LOCATION_RULES: &[StepRule] = &[
    StepRule::required(f::SCREEN_NAME, "Screen name is required"),
    StepRule::new(
        f::SCREEN_NAME_TAKEN,
        Check::NotRaised,
        "A screen with this name already exists",
    ),
    StepRule::required(f::ROLE, "Select who operates this screen"),
    StepRule::required(f::ADDRESS_STREET, "Street address is required"),
    StepRule::required(f::CITY, "City is required"),
    StepRule::required(f::STATE, "State is required"),
    StepRule::required(f::PINCODE, "Pincode is required"),
    StepRule::required(f::LATITUDE, "Pick the screen location on the map (latitude missing)"),
    StepRule::required(f::LONGITUDE, "Pick the screen location on the map (longitude missing)"),
];

const DISPLAY_SPEC_RULES: &[StepRule] = &[
    StepRule::required(f::TECHNOLOGY, "Display technology is required"),
    StepRule::required(f::ENVIRONMENT, "Select Indoor or Outdoor"),
    StepRule::required(f::SCREEN_TYPE, "Screen type is required"),
    StepRule::required(f::SCREEN_WIDTH, "Screen width is required"),
    StepRule::required(f::SCREEN_HEIGHT, "Screen height is required"),
    StepRule::required(f::RESOLUTION_WIDTH, "Resolution width is required"),
    StepRule::required(f::RESOLUTION_HEIGHT, "Resolution height is required"),
];

const VISIBILITY_RULES: &[StepRule] = &[
    StepRule::required(f::MOUNT_TYPE, "Mount type is required"),
    StepRule::required(f::INSTALLATION_HEIGHT, "Installation height is required"),
    StepRule::required(f::FACING_DIRECTION, "Facing direction is required"),
    StepRule::required(f::ROAD_TYPE, "Road type is required for outdoor screens")
        .when(Condition::NotEquals(f::ENVIRONMENT, "Indoor")),
    StepRule::required(
        f::TRAFFIC_DIRECTION,
        "Traffic direction is required for outdoor screens",
    )
    .when(Condition::NotEquals(f::ENVIRONMENT, "Indoor")),
];

const PLAYBACK_RULES: &[StepRule] = &[
    StepRule::required(f::STANDARD_AD_DURATION_SEC, "Standard ad duration is required"),
    StepRule::required(f::TOTAL_SLOTS_PER_LOOP, "Total slots per loop is required"),
    StepRule::new(
        f::RESERVED_SLOTS,
        Check::LessThan(f::TOTAL_SLOTS_PER_LOOP),
        "Reserved slots must be less than total slots per loop",
    ),
    StepRule::new(
        f::SUPPORTED_FORMATS,
        Check::NonEmptyList,
        "Select at least one supported format",
    ),
    StepRule::required(f::CONNECTIVITY_TYPE, "Connectivity type is required"),
    StepRule::required(f::POWER_BACKUP, "Power backup is required"),
    StepRule::required(
        f::DOWNTIME_WINDOWS,
        "Downtime is enabled but no downtime window was entered",
    )
    .when(Condition::Enabled(f::HAS_DOWNTIME)),
];

const COMMERCIAL_RULES: &[StepRule] = &[
    StepRule::required(f::BASE_PRICE_PER_SLOT_INR, "Base price per slot is required"),
    StepRule::new(
        f::SENSITIVE_ZONES,
        Check::NonEmptyList,
        "Select at least one sensitive zone",
    ),
    StepRule::new(
        f::RESTRICTED_CATEGORIES,
        Check::NonEmptyList,
        "Select at least one restricted category",
    ),
    StepRule::new(
        f::SEASONAL_PRICES,
        Check::NonEmptyList,
        "Seasonal pricing is enabled but no seasons were added",
    )
    .when(Condition::Enabled(f::SEASONAL_PRICING_ENABLED)),
    StepRule::new(
        f::SEASONAL_PRICES,
        Check::WellFormedSeasons,
        "Each season needs a name, an adjustment type and a percentage between 0 and 100",
    )
    .when(Condition::Enabled(f::SEASONAL_PRICING_ENABLED)),
    StepRule::required(
        f::MINIMUM_BOOKING_DAYS,
        "Minimum booking is enabled but minimum booking days is missing",
    )
    .when(Condition::Enabled(f::MINIMUM_BOOKING_ENABLED)),
    StepRule::required(
        f::SURCHARGE_PERCENT,
        "Minimum booking is enabled but surcharge percent is missing",
    )
    .when(Condition::Enabled(f::MINIMUM_BOOKING_ENABLED)),
];

const COMPLIANCE_RULES: &[StepRule] = &[
    StepRule::required(f::CMS_TYPE, "CMS type is required"),
    StepRule::required(
        f::AI_CAMERA_ENDPOINT,
        "AI camera integration is enabled but no endpoint was entered",
    )
    .when(Condition::Enabled(f::AI_CAMERA_ENABLED)),
    StepRule::new(
        f::OWNERSHIP_PROOF_UPLOADED,
        Check::AttachmentPresent,
        "Upload the ownership proof document",
    ),
    StepRule::new(
        f::PERMISSION_DOCUMENT_UPLOADED,
        Check::AttachmentPresent,
        "Upload the permission document",
    ),
    StepRule::required(f::GST_NUMBER, "GST number is required"),
    StepRule::new(
        f::CONTENT_POLICY_ACCEPTED,
        Check::IsTrue,
        "Accept the content policy to continue",
    ),
];

/// The rule table for a step. The review step (7) and unknown steps have
/// no rules.
pub fn step_rules(step: u8) -> &'static [StepRule] {
    match step {
        1 => LOCATION_RULES,
        2 => DISPLAY_SPEC_RULES,
        3 => VISIBILITY_RULES,
        4 => PLAYBACK_RULES,
        5 => COMMERCIAL_RULES,
        6 => COMPLIANCE_RULES,
        _ => &[],
    }
}
