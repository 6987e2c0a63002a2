//! Field keys of the intake record, grouped by wizard step.
//!
//! The record is a flat key/value map; these constants are the only keys the
//! workflow reads or writes. They double as the backend form-field names.

// ---------------------------------------------------------------------------
// Step 1: location and identity
// ---------------------------------------------------------------------------

pub const SCREEN_NAME: &str = "screen_name";
pub const ROLE: &str = "role";
pub const PARTNER_NAME: &str = "partner_name";
pub const ADDRESS_STREET: &str = "address_street";
pub const CITY: &str = "city";
pub const DISTRICT: &str = "district";
pub const STATE: &str = "state";
pub const PINCODE: &str = "pincode";
pub const LATITUDE: &str = "latitude";
pub const LONGITUDE: &str = "longitude";
/// Derived from the address components.
pub const FULL_ADDRESS: &str = "full_address";

/// Advisory flag set by the external name uniqueness check. Local only.
pub const SCREEN_NAME_TAKEN: &str = "screen_name_taken";

// ---------------------------------------------------------------------------
// Step 2: display specs
// ---------------------------------------------------------------------------

pub const TECHNOLOGY: &str = "technology";
pub const ENVIRONMENT: &str = "environment";
pub const SCREEN_TYPE: &str = "screen_type";
pub const SCREEN_WIDTH: &str = "screen_width";
pub const SCREEN_HEIGHT: &str = "screen_height";
pub const RESOLUTION_WIDTH: &str = "resolution_width";
pub const RESOLUTION_HEIGHT: &str = "resolution_height";
pub const PIXEL_PITCH_MM: &str = "pixel_pitch_mm";
pub const BRIGHTNESS_NITS: &str = "brightness_nits";
pub const REFRESH_RATE_HZ: &str = "refresh_rate_hz";
/// Derived from the pixel resolution.
pub const ORIENTATION: &str = "orientation";
/// Derived from the physical width and height.
pub const TOTAL_AREA: &str = "total_area";

// ---------------------------------------------------------------------------
// Step 3: visibility and installation
// ---------------------------------------------------------------------------

pub const MOUNT_TYPE: &str = "mount_type";
pub const INSTALLATION_HEIGHT: &str = "installation_height";
pub const FACING_DIRECTION: &str = "facing_direction";
/// Outdoor only.
pub const ROAD_TYPE: &str = "road_type";
/// Outdoor only.
pub const TRAFFIC_DIRECTION: &str = "traffic_direction";

// ---------------------------------------------------------------------------
// Step 4: playback and connectivity
// ---------------------------------------------------------------------------

pub const STANDARD_AD_DURATION_SEC: &str = "standard_ad_duration_sec";
pub const TOTAL_SLOTS_PER_LOOP: &str = "total_slots_per_loop";
pub const RESERVED_SLOTS: &str = "reserved_slots";
/// Derived: ad duration times slots per loop.
pub const LOOP_LENGTH_SEC: &str = "loop_length_sec";
pub const SUPPORTED_FORMATS: &str = "supported_formats";
/// Derived from the orientation.
pub const MAX_UPLOAD_SIZE: &str = "max_upload_size";
pub const CONNECTIVITY_TYPE: &str = "connectivity_type";
pub const INTERNET_SPEED_MBPS: &str = "internet_speed_mbps";
pub const POWER_BACKUP: &str = "power_backup";
pub const HAS_DOWNTIME: &str = "has_downtime";
pub const DOWNTIME_WINDOWS: &str = "downtime_windows";

// ---------------------------------------------------------------------------
// Step 5: commercial terms
// ---------------------------------------------------------------------------

pub const BASE_PRICE_PER_SLOT_INR: &str = "base_price_per_slot_inr";
pub const SENSITIVE_ZONES: &str = "sensitive_zones";
pub const RESTRICTED_CATEGORIES: &str = "restricted_categories";
pub const SEASONAL_PRICING_ENABLED: &str = "seasonal_pricing_enabled";
pub const SEASONAL_PRICES: &str = "seasonal_prices";
pub const MINIMUM_BOOKING_ENABLED: &str = "minimum_booking_enabled";
pub const MINIMUM_BOOKING_DAYS: &str = "minimum_booking_days";
pub const SURCHARGE_PERCENT: &str = "surcharge_percent";

// ---------------------------------------------------------------------------
// Step 6: compliance
// ---------------------------------------------------------------------------

pub const CMS_TYPE: &str = "cms_type";
pub const CMS_ENDPOINT: &str = "cms_endpoint";
pub const AI_CAMERA_ENABLED: &str = "ai_camera_enabled";
pub const AI_CAMERA_ENDPOINT: &str = "ai_camera_endpoint";
/// Document upload.
pub const OWNERSHIP_PROOF_UPLOADED: &str = "ownership_proof_uploaded";
/// Document upload.
pub const PERMISSION_DOCUMENT_UPLOADED: &str = "permission_document_uploaded";
pub const GST_NUMBER: &str = "gst_number";
pub const CONTENT_POLICY_ACCEPTED: &str = "content_policy_accepted";

// ---------------------------------------------------------------------------
// Workflow metadata
// ---------------------------------------------------------------------------

pub const ID: &str = "id";
pub const STATUS: &str = "status";
pub const CURRENT_STEP: &str = "current_step";
pub const ONBOARDED_BY: &str = "onboarded_by";
pub const SUBMITTED_AT: &str = "submitted_at";

// ---------------------------------------------------------------------------
// Field groups
// ---------------------------------------------------------------------------

/// Fields computed by the derived-field calculator. Never user-editable.
pub const DERIVED_FIELDS: &[&str] = &[
    FULL_ADDRESS,
    ORIENTATION,
    TOTAL_AREA,
    LOOP_LENGTH_SEC,
    MAX_UPLOAD_SIZE,
];

/// Fields holding binary document uploads.
pub const UPLOAD_FIELDS: &[&str] = &[OWNERSHIP_PROOF_UPLOADED, PERMISSION_DOCUMENT_UPLOADED];

/// Fields that only apply to outdoor screens.
pub const OUTDOOR_ONLY_FIELDS: &[&str] = &[ROAD_TYPE, TRAFFIC_DIRECTION];

/// Fields that never leave the client.
pub const LOCAL_ONLY_FIELDS: &[&str] = &[SCREEN_NAME_TAKEN];

/// Record metadata managed by the workflow itself, never by an editor.
pub const WORKFLOW_FIELDS: &[&str] = &[ID, STATUS, CURRENT_STEP, ONBOARDED_BY, SUBMITTED_AT];

/// Fields that stay editable once a screen is verified: pricing,
/// connectivity and compliance documents.
pub const RESTRICTED_EDITABLE_FIELDS: &[&str] = &[
    // pricing
    BASE_PRICE_PER_SLOT_INR,
    SENSITIVE_ZONES,
    RESTRICTED_CATEGORIES,
    SEASONAL_PRICING_ENABLED,
    SEASONAL_PRICES,
    MINIMUM_BOOKING_ENABLED,
    MINIMUM_BOOKING_DAYS,
    SURCHARGE_PERCENT,
    // connectivity
    CONNECTIVITY_TYPE,
    INTERNET_SPEED_MBPS,
    POWER_BACKUP,
    HAS_DOWNTIME,
    DOWNTIME_WINDOWS,
    // compliance
    CMS_TYPE,
    CMS_ENDPOINT,
    AI_CAMERA_ENABLED,
    AI_CAMERA_ENDPOINT,
    OWNERSHIP_PROOF_UPLOADED,
    PERMISSION_DOCUMENT_UPLOADED,
    GST_NUMBER,
    CONTENT_POLICY_ACCEPTED,
];

/// Returns `true` if `key` is computed rather than entered.
pub fn is_derived(key: &str) -> bool {
    DERIVED_FIELDS.contains(&key)
}

/// Returns `true` if `key` is only written by a dedicated workflow event
/// (the duplicate-name flag) or by the workflow's own bookkeeping.
pub fn is_system_managed(key: &str) -> bool {
    LOCAL_ONLY_FIELDS.contains(&key) || WORKFLOW_FIELDS.contains(&key)
}

/// Returns `true` if `key` holds a document upload.
pub fn is_upload(key: &str) -> bool {
    UPLOAD_FIELDS.contains(&key)
}
