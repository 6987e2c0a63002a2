//! Workflow controller for the screen onboarding wizard.
//!
//! Owns one wizard session: the intake state, the backend id once the record
//! exists, and the entry mode. Navigation is gated by the step validator,
//! edits go through the intake reducer, and drafts and submissions are sent
//! through [`IntakePersistence`].
//!
//! The controller is shared via `Arc` and is safe to call from several
//! tasks. At most one save or submit is outstanding at a time; a second one
//! is refused with [`ActionError::InFlight`] without reaching the backend.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use serde::Serialize;
use serde_json::{Map, Value};
use tokio::sync::RwLock;

use signage_core::error::CoreError;
use signage_core::intake::fields;
use signage_core::intake::payload::{self, IntakePayload};
use signage_core::intake::record::IntakeRecord;
use signage_core::intake::status::{self, LifecycleStatus};
use signage_core::intake::store::{EditOutcome, IntakeEvent, IntakeState};
use signage_core::types::DbId;
use signage_core::validation::evaluator;
use signage_core::validation::rules::{FieldViolation, StepViolation};
use signage_core::wizard::{self, LAST_INPUT_STEP, MAX_STEP};

use crate::loader;
use crate::persistence::{IntakePersistence, PersistenceError};
use crate::uniqueness::{NameCheckOutcome, NameCheckTracker};

// ---------------------------------------------------------------------------
// Inputs and outcomes
// ---------------------------------------------------------------------------

/// The logged-in operator, injected at construction and stamped on every
/// payload as `onboarded_by`.
#[derive(Debug, Clone)]
pub struct SessionContext {
    pub user_id: DbId,
    pub user_name: String,
}

/// Navigation event that opens the wizard.
#[derive(Debug, Clone, Default)]
pub struct EntryRequest {
    /// Draft or record to resume.
    pub draft_id: Option<DbId>,
    /// Record data handed over directly, skipping the fetch.
    pub inline_record: Option<Map<String, Value>>,
    /// Editing an existing record rather than onboarding a new screen.
    pub edit_mode: bool,
    /// Lifecycle status of the record being edited, as known by the caller.
    pub entity_lifecycle_status: Option<String>,
}

/// Where the caller should navigate after the wizard exits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "view", content = "id", rename_all = "snake_case")]
pub enum ExitTarget {
    ScreenList,
    ScreenDetail(DbId),
}

/// Result of a `Back` action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackOutcome {
    /// Moved to the given step.
    Moved(u8),
    /// Backed out of step 1; the wizard closes.
    Exit(ExitTarget),
}

/// Summary of a session start.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StartReport {
    pub current_step: u8,
    pub max_step_reached: u8,
    pub record_id: Option<DbId>,
    /// The record could not be fetched and the session started blank.
    pub degraded: bool,
}

/// A successful save or submit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Persisted {
    pub id: DbId,
    pub status: LifecycleStatus,
    pub exit: ExitTarget,
}

/// Why a forward navigation was refused.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum NavigationError {
    #[error(transparent)]
    Invalid(#[from] StepViolation),

    #[error("Already on the review step; use submit")]
    AtLastStep,
}

/// Why a save or submit did not go through.
#[derive(Debug, thiserror::Error)]
pub enum ActionError {
    /// A step failed validation.
    ///
    /// Returned by `submit` when re-validating steps 1–6. Unlike `next`,
    /// which leaves the session where it is, the session is moved to the
    /// failing step so the violation is shown next to its fields. No field
    /// value is changed.
    #[error(transparent)]
    Invalid(#[from] StepViolation),

    /// The action is not available from the current step or session state.
    #[error(transparent)]
    NotAllowed(#[from] CoreError),

    /// Another save or submit is still outstanding.
    #[error("A save or submit is already in progress")]
    InFlight,

    /// The backend call failed. Nothing was retried.
    #[error(transparent)]
    Persistence(#[from] PersistenceError),
}

// ---------------------------------------------------------------------------
// Controller
// ---------------------------------------------------------------------------

struct Session {
    state: IntakeState,
    record_id: Option<DbId>,
    edit_mode: bool,
    entity_status: Option<String>,
    submitted: bool,
    names: NameCheckTracker,
}

impl Session {
    fn blank() -> Self {
        Self {
            state: IntakeState::new(IntakeRecord::with_defaults()),
            record_id: None,
            edit_mode: false,
            entity_status: None,
            submitted: false,
            names: NameCheckTracker::new(),
        }
    }

    fn editing_verified(&self) -> bool {
        self.edit_mode
            && self
                .entity_status
                .as_deref()
                .and_then(|s| LifecycleStatus::from_str_db(s).ok())
                == Some(LifecycleStatus::Verified)
    }
}

/// Drives one onboarding session against a persistence backend.
pub struct WorkflowController<P: IntakePersistence + ?Sized> {
    persistence: Arc<P>,
    context: SessionContext,
    session: RwLock<Session>,
    in_flight: AtomicBool,
}

/// Clears the in-flight flag when a save or submit finishes, however it ends.
struct InFlightGuard<'a>(&'a AtomicBool);

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl<P: IntakePersistence + ?Sized> WorkflowController<P> {
    pub fn new(persistence: Arc<P>, context: SessionContext) -> Self {
        Self {
            persistence,
            context,
            session: RwLock::new(Session::blank()),
            in_flight: AtomicBool::new(false),
        }
    }

    /// Open the wizard for a navigation event.
    ///
    /// Edit mode unlocks every step, starts at step 1 and fixes the access
    /// mode from the record's lifecycle status for the whole session. A
    /// resumed draft continues at its stored step, clamped to the step table.
    ///
    /// When the record cannot be fetched the session starts as a plain new
    /// onboarding, even if edit mode was requested: full access, no record
    /// id, exit to the screen list.
    pub async fn start(&self, entry: EntryRequest) -> StartReport {
        let loaded = loader::load(
            self.persistence.as_ref(),
            entry.draft_id,
            entry.inline_record,
        )
        .await;

        let edit_mode = entry.edit_mode && !loaded.degraded;
        let entity_status = if edit_mode {
            entry
                .entity_lifecycle_status
                .or_else(|| loaded.status.clone())
        } else {
            None
        };
        let mut state = IntakeState::new(loaded.record);
        if edit_mode {
            state.reduce(IntakeEvent::EditModeEntered {
                status: entity_status.clone(),
            });
        } else if loaded.stored_step.is_some() {
            state.reduce(IntakeEvent::DraftResumed {
                step: wizard::clamp_step(loaded.stored_step),
            });
        }

        let report = StartReport {
            current_step: state.current_step(),
            max_step_reached: state.max_step_reached(),
            record_id: loaded.id,
            degraded: loaded.degraded,
        };

        tracing::info!(
            record_id = ?loaded.id,
            edit_mode,
            access_mode = ?state.access_mode(),
            current_step = report.current_step,
            degraded = loaded.degraded,
            "Onboarding session started"
        );

        *self.session.write().await = Session {
            state,
            record_id: loaded.id,
            edit_mode,
            entity_status,
            submitted: false,
            names: NameCheckTracker::new(),
        };
        report
    }

    /// A copy of the current session state.
    pub async fn snapshot(&self) -> IntakeState {
        self.session.read().await.state.clone()
    }

    pub async fn record_id(&self) -> Option<DbId> {
        self.session.read().await.record_id
    }

    /// Apply a field edit. Navigation events are ignored here; use
    /// [`next`](Self::next), [`back`](Self::back) and
    /// [`jump_to`](Self::jump_to).
    pub async fn apply(&self, event: IntakeEvent) -> EditOutcome {
        if event.is_navigation() {
            return EditOutcome::Ignored;
        }
        let outcome = self.session.write().await.state.reduce(event);
        if let EditOutcome::AccessDenied { field } = &outcome {
            tracing::debug!(field = %field, "Edit rejected by access policy");
        }
        outcome
    }

    /// Set a single field.
    pub async fn set_field(&self, key: &str, value: Value) -> EditOutcome {
        self.apply(IntakeEvent::FieldChanged {
            key: key.to_string(),
            value,
        })
        .await
    }

    /// Explicit acknowledgment of the content policy.
    pub async fn accept_content_policy(&self) -> EditOutcome {
        self.apply(IntakeEvent::ContentPolicyAccepted).await
    }

    /// Validate the current step and move forward one step.
    pub async fn next(&self) -> Result<u8, NavigationError> {
        let mut session = self.session.write().await;
        let current = session.state.current_step();
        if current >= MAX_STEP {
            return Err(NavigationError::AtLastStep);
        }
        evaluator::validate_step(current, session.state.record())?;
        session.state.reduce(IntakeEvent::StepAdvanced);
        let step = session.state.current_step();
        tracing::debug!(
            from_step = current,
            to_step = step,
            tab = wizard::step_label(step),
            "Wizard advanced"
        );
        Ok(step)
    }

    /// Non-blocking findings for the current step, such as a malformed GST
    /// number. These never gate `next`.
    pub async fn advisories(&self) -> Vec<FieldViolation> {
        let session = self.session.read().await;
        evaluator::advisories(session.state.current_step(), session.state.record())
    }

    /// Move back one step without validation, or exit from step 1.
    pub async fn back(&self) -> BackOutcome {
        let mut session = self.session.write().await;
        if session.state.reduce(IntakeEvent::StepRetreated) == EditOutcome::Applied {
            return BackOutcome::Moved(session.state.current_step());
        }
        let exit = match session.record_id {
            Some(id) if session.editing_verified() => ExitTarget::ScreenDetail(id),
            _ => ExitTarget::ScreenList,
        };
        tracing::debug!(?exit, "Wizard exited from first step");
        BackOutcome::Exit(exit)
    }

    /// Jump to an unlocked step. Returns `false` (and does nothing) for a
    /// step beyond the furthest one reached.
    pub async fn jump_to(&self, step: u8) -> bool {
        let mut session = self.session.write().await;
        session.state.reduce(IntakeEvent::StepJumped(step)) == EditOutcome::Applied
    }

    /// Persist the session as a draft.
    ///
    /// Available from steps 1–6. The first save creates the record; later
    /// saves partially update it. No validation runs.
    pub async fn save_draft(&self) -> Result<Persisted, ActionError> {
        let _guard = self.begin_action()?;

        let (payload, record_id, step) = {
            let session = self.session.read().await;
            ensure_not_submitted(&session)?;
            let step = session.state.current_step();
            wizard::can_save_draft(step)?;
            let payload = payload::draft_payload(
                session.state.record(),
                step,
                Some(&self.context.user_name),
            );
            (payload, session.record_id, step)
        };

        let id = self.persist(record_id, &payload, false).await?;
        self.session.write().await.record_id = Some(id);

        tracing::info!(
            record_id = id,
            step,
            user_id = self.context.user_id,
            "Intake draft saved"
        );
        Ok(Persisted {
            id,
            status: LifecycleStatus::Draft,
            exit: ExitTarget::ScreenList,
        })
    }

    /// Submit the finished record from the review step.
    ///
    /// Steps 1–6 are re-validated first; on failure the session moves to
    /// the first invalid step. Trusted roles land as `Verified`, everyone
    /// else as `Submitted`. New records are created, existing ones fully
    /// replaced.
    pub async fn submit(&self) -> Result<Persisted, ActionError> {
        let _guard = self.begin_action()?;

        let (payload, record_id, edit_mode, lifecycle) = {
            let mut session = self.session.write().await;
            ensure_not_submitted(&session)?;
            wizard::can_submit(session.state.current_step())?;
            if let Err(violation) = evaluator::validate_through(LAST_INPUT_STEP, session.state.record())
            {
                tracing::debug!(
                    step = violation.step,
                    tab = wizard::step_label(violation.step),
                    field = %violation.field,
                    "Submit blocked by re-validation"
                );
                session.state.reduce(IntakeEvent::StepJumped(violation.step));
                return Err(violation.into());
            }
            let record = session.state.record();
            let lifecycle = status::submission_status(record.str_value(fields::ROLE));
            let payload = payload::submission_payload(
                record,
                lifecycle,
                Some(&self.context.user_name),
                chrono::Utc::now(),
            );
            (payload, session.record_id, session.edit_mode, lifecycle)
        };

        let id = self.persist(record_id, &payload, true).await?;
        {
            let mut session = self.session.write().await;
            session.record_id = Some(id);
            session.submitted = true;
        }

        tracing::info!(
            record_id = id,
            status = lifecycle.as_str(),
            user_id = self.context.user_id,
            "Intake record submitted"
        );
        let exit = if edit_mode {
            ExitTarget::ScreenDetail(id)
        } else {
            ExitTarget::ScreenList
        };
        Ok(Persisted {
            id,
            status: lifecycle,
            exit,
        })
    }

    /// Ask the backend whether the current screen name is already taken and
    /// record the answer as an advisory flag.
    ///
    /// The record's own id is excluded from the conflict set whenever it is
    /// known. A response is dropped if the name changed or a newer check was
    /// issued meanwhile. Failures leave the flag untouched.
    pub async fn check_screen_name(&self) -> NameCheckOutcome {
        let (ticket, exclude_id) = {
            let mut session = self.session.write().await;
            let Some(name) = session
                .state
                .record()
                .str_value(fields::SCREEN_NAME)
                .map(str::to_string)
            else {
                return NameCheckOutcome::Skipped;
            };
            if !session.state.access_mode().allows(fields::SCREEN_NAME) {
                return NameCheckOutcome::Skipped;
            }
            (session.names.issue(&name), session.record_id)
        };

        let result = self.persistence.name_exists(&ticket.name, exclude_id).await;

        let mut session = self.session.write().await;
        let current_name = session.state.record().str_value(fields::SCREEN_NAME);
        if !session.names.is_current(&ticket, current_name) {
            tracing::debug!(name = %ticket.name, "Discarded stale screen-name check");
            return NameCheckOutcome::Superseded;
        }
        match result {
            Ok(taken) => {
                session.state.reduce(IntakeEvent::NameCheckResolved { taken });
                if taken {
                    NameCheckOutcome::Taken
                } else {
                    NameCheckOutcome::Available
                }
            }
            Err(e) => {
                tracing::warn!(name = %ticket.name, error = %e, "Screen-name check failed");
                NameCheckOutcome::Unknown
            }
        }
    }

    // ---- private helpers ----

    fn begin_action(&self) -> Result<InFlightGuard<'_>, ActionError> {
        self.in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map(|_| InFlightGuard(&self.in_flight))
            .map_err(|_| ActionError::InFlight)
    }

    async fn persist(
        &self,
        record_id: Option<DbId>,
        payload: &IntakePayload,
        replace: bool,
    ) -> Result<DbId, ActionError> {
        let result = match record_id {
            None => self.persistence.create(payload).await,
            Some(id) if replace => self.persistence.full_update(id, payload).await.map(|_| id),
            Some(id) => self.persistence.partial_update(id, payload).await.map(|_| id),
        };
        result.map_err(|e| {
            tracing::warn!(record_id = ?record_id, error = %e, "Intake persistence failed");
            ActionError::Persistence(e)
        })
    }
}

fn ensure_not_submitted(session: &Session) -> Result<(), CoreError> {
    if session.submitted {
        return Err(CoreError::Validation(
            "This record has already been submitted".to_string(),
        ));
    }
    Ok(())
}
