//! Intake session state and its reducer.
//!
//! All mutation of a wizard session goes through [`IntakeState::reduce`] so
//! the step bookkeeping (`max_step_reached` only grows and never trails
//! `current_step`), the access policy and the derived-field cascade are
//! enforced in one place.

use serde_json::Value;

use super::access::{self, AccessMode};
use super::derived;
use super::fields;
use super::record::{Attachment, IntakeRecord};
use crate::wizard::{self, MAX_STEP, MIN_STEP};

/// A tagged edit applied to the session.
#[derive(Debug, Clone, PartialEq)]
pub enum IntakeEvent {
    /// A user edit to a single field.
    FieldChanged { key: String, value: Value },
    /// A document chosen for one of the upload fields.
    AttachmentChosen { key: String, attachment: Attachment },
    AttachmentCleared { key: String },
    /// Explicit acknowledgment of the content policy.
    ContentPolicyAccepted,
    /// Result of an external screen-name uniqueness check.
    NameCheckResolved { taken: bool },
    /// Move forward one step. The caller has already validated the step.
    StepAdvanced,
    StepRetreated,
    StepJumped(u8),
    /// Continue a draft at the step it was saved from.
    DraftResumed { step: u8 },
    /// Open an existing record for editing: every tab unlocked and the
    /// access mode fixed for the session.
    EditModeEntered { status: Option<String> },
}

impl IntakeEvent {
    /// Step and session-mode events, as opposed to field edits.
    pub fn is_navigation(&self) -> bool {
        matches!(
            self,
            Self::StepAdvanced
                | Self::StepRetreated
                | Self::StepJumped(_)
                | Self::DraftResumed { .. }
                | Self::EditModeEntered { .. }
        )
    }
}

/// What the reducer did with an event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditOutcome {
    Applied,
    /// The field is read-only under the session's access mode, or may only
    /// change through a dedicated action. The record is unchanged.
    AccessDenied { field: String },
    /// The event was a no-op (e.g. a jump to a locked step).
    Ignored,
}

/// One wizard session over one intake record.
#[derive(Debug, Clone, PartialEq)]
pub struct IntakeState {
    record: IntakeRecord,
    current_step: u8,
    max_step_reached: u8,
    access_mode: AccessMode,
}

impl IntakeState {
    pub fn new(record: IntakeRecord) -> Self {
        Self {
            record,
            current_step: MIN_STEP,
            max_step_reached: MIN_STEP,
            access_mode: AccessMode::Full,
        }
    }

    pub fn record(&self) -> &IntakeRecord {
        &self.record
    }

    pub fn current_step(&self) -> u8 {
        self.current_step
    }

    pub fn max_step_reached(&self) -> u8 {
        self.max_step_reached
    }

    pub fn access_mode(&self) -> AccessMode {
        self.access_mode
    }

    /// Apply one event.
    pub fn reduce(&mut self, event: IntakeEvent) -> EditOutcome {
        match event {
            IntakeEvent::FieldChanged { key, value } => self.change_field(key, value),
            IntakeEvent::AttachmentChosen { key, attachment } => {
                if !fields::is_upload(&key) {
                    return EditOutcome::Ignored;
                }
                if !self.access_mode.allows(&key) {
                    return EditOutcome::AccessDenied { field: key };
                }
                self.record.set_attachment(&key, attachment);
                EditOutcome::Applied
            }
            IntakeEvent::AttachmentCleared { key } => {
                if !self.access_mode.allows(&key) {
                    return EditOutcome::AccessDenied { field: key };
                }
                self.record.clear_attachment(&key);
                EditOutcome::Applied
            }
            IntakeEvent::ContentPolicyAccepted => {
                self.record
                    .set(fields::CONTENT_POLICY_ACCEPTED, Value::Bool(true));
                EditOutcome::Applied
            }
            IntakeEvent::NameCheckResolved { taken } => {
                self.record.set(fields::SCREEN_NAME_TAKEN, Value::Bool(taken));
                EditOutcome::Applied
            }
            IntakeEvent::StepAdvanced => {
                if self.current_step >= MAX_STEP {
                    return EditOutcome::Ignored;
                }
                self.move_to(self.current_step + 1);
                EditOutcome::Applied
            }
            IntakeEvent::StepRetreated => {
                if self.current_step <= MIN_STEP {
                    return EditOutcome::Ignored;
                }
                self.move_to(self.current_step - 1);
                EditOutcome::Applied
            }
            IntakeEvent::StepJumped(target) => {
                if !wizard::can_jump(target, self.max_step_reached) {
                    return EditOutcome::Ignored;
                }
                self.move_to(target);
                EditOutcome::Applied
            }
            IntakeEvent::DraftResumed { step } => {
                self.move_to(wizard::clamp_step(Some(i64::from(step))));
                EditOutcome::Applied
            }
            IntakeEvent::EditModeEntered { status } => {
                self.access_mode = access::resolve(status.as_deref());
                self.current_step = MIN_STEP;
                self.max_step_reached = MAX_STEP;
                EditOutcome::Applied
            }
        }
    }

    fn change_field(&mut self, key: String, value: Value) -> EditOutcome {
        // Uploads only change through attachment events.
        if fields::is_upload(&key) {
            return EditOutcome::Ignored;
        }
        if fields::is_system_managed(&key) || !self.access_mode.allows(&key) {
            return EditOutcome::AccessDenied { field: key };
        }
        if key == fields::CONTENT_POLICY_ACCEPTED && value != Value::Bool(false) {
            return EditOutcome::AccessDenied { field: key };
        }
        if key == fields::SCREEN_NAME && self.record.get(&key) != Some(&value) {
            self.record.set(fields::SCREEN_NAME_TAKEN, Value::Bool(false));
        }
        self.record.set(&key, value);
        derived::recompute(&mut self.record, &key);
        EditOutcome::Applied
    }

    fn move_to(&mut self, step: u8) {
        self.current_step = step;
        self.max_step_reached = self.max_step_reached.max(step);
    }
}
