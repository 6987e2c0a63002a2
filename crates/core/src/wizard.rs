//! Screen onboarding wizard step table and navigation rules.
//!
//! Defines the seven wizard steps and the pure checks used by the workflow
//! controller to gate back/next/jump, draft saving and final submission.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Steps
// ---------------------------------------------------------------------------

/// The seven steps of the screen onboarding wizard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntakeStep {
    Location,
    DisplaySpecs,
    Visibility,
    PlaybackConnectivity,
    Commercials,
    Compliance,
    Review,
}

/// Minimum step number (1-based).
pub const MIN_STEP: u8 = 1;

/// Maximum step number (1-based). The review step.
pub const MAX_STEP: u8 = 7;

/// Last step with editable fields; drafts can only be saved up to here.
pub const LAST_INPUT_STEP: u8 = 6;

impl IntakeStep {
    /// Convert a 1-based step number to an `IntakeStep`.
    pub fn from_number(n: u8) -> Result<Self, CoreError> {
        match n {
            1 => Ok(Self::Location),
            2 => Ok(Self::DisplaySpecs),
            3 => Ok(Self::Visibility),
            4 => Ok(Self::PlaybackConnectivity),
            5 => Ok(Self::Commercials),
            6 => Ok(Self::Compliance),
            7 => Ok(Self::Review),
            _ => Err(CoreError::Validation(format!(
                "Invalid step number {n}. Must be between {MIN_STEP} and {MAX_STEP}"
            ))),
        }
    }

    /// Tab label for the step.
    pub fn label(self) -> &'static str {
        match self {
            Self::Location => "Location",
            Self::DisplaySpecs => "Display Specs",
            Self::Visibility => "Visibility",
            Self::PlaybackConnectivity => "Playback & Connectivity",
            Self::Commercials => "Commercials",
            Self::Compliance => "Compliance",
            Self::Review => "Review",
        }
    }
}

/// Tab label for a step number, `"Unknown"` outside the table.
pub fn step_label(step: u8) -> &'static str {
    IntakeStep::from_number(step).map_or("Unknown", IntakeStep::label)
}

// ---------------------------------------------------------------------------
// Navigation rules
// ---------------------------------------------------------------------------

/// Clamp a step number stored on the backend into the valid range.
///
/// Drafts record their step as a plain integer; anything missing, below 1 or
/// above 7 is pulled back into range instead of being trusted.
pub fn clamp_step(stored: Option<i64>) -> u8 {
    match stored {
        Some(n) if n > i64::from(MAX_STEP) => MAX_STEP,
        Some(n) if n >= i64::from(MIN_STEP) => n as u8,
        _ => MIN_STEP,
    }
}

/// Validate that a step number is within the valid range.
pub fn validate_step_number(step: u8) -> Result<(), CoreError> {
    if !(MIN_STEP..=MAX_STEP).contains(&step) {
        return Err(CoreError::Validation(format!(
            "Step {step} is out of range ({MIN_STEP}..{MAX_STEP})"
        )));
    }
    Ok(())
}

/// A jump is allowed to any valid step already unlocked.
pub fn can_jump(target: u8, max_step_reached: u8) -> bool {
    validate_step_number(target).is_ok() && target <= max_step_reached
}

/// Drafts can be saved from the input steps only, never from review.
pub fn can_save_draft(current_step: u8) -> Result<(), CoreError> {
    if !(MIN_STEP..=LAST_INPUT_STEP).contains(&current_step) {
        return Err(CoreError::Validation(format!(
            "Cannot save a draft from step {current_step}; drafts are saved from steps \
             {MIN_STEP}..{LAST_INPUT_STEP}"
        )));
    }
    Ok(())
}

/// Submission happens from the review step only.
pub fn can_submit(current_step: u8) -> Result<(), CoreError> {
    if current_step != MAX_STEP {
        return Err(CoreError::Validation(format!(
            "Cannot submit: must be on step {MAX_STEP} (Review), currently on step {current_step}"
        )));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
