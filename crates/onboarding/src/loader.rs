//! Draft resume loader.
//!
//! Builds the starting record for a wizard session: inline data as given,
//! a persisted draft fetched by id, or a blank record.

use serde_json::{Map, Value};

use signage_core::intake::derived;
use signage_core::intake::fields;
use signage_core::intake::record::IntakeRecord;
use signage_core::types::DbId;

use crate::persistence::IntakePersistence;

/// The record a session starts from.
#[derive(Debug, Clone)]
pub struct LoadedDraft {
    pub record: IntakeRecord,
    /// Backend id, if the record already exists.
    pub id: Option<DbId>,
    /// Lifecycle status as stored on the backend.
    pub status: Option<String>,
    /// `current_step` as stored on the backend, unvalidated.
    pub stored_step: Option<i64>,
    /// The fetch failed and the session fell back to a blank record.
    pub degraded: bool,
}

impl LoadedDraft {
    fn blank() -> Self {
        Self {
            record: IntakeRecord::with_defaults(),
            id: None,
            status: None,
            stored_step: None,
            degraded: false,
        }
    }

    fn from_values(values: Map<String, Value>, id: Option<DbId>) -> Self {
        let status = values
            .get(fields::STATUS)
            .and_then(Value::as_str)
            .map(str::to_string);
        let stored_step = values.get(fields::CURRENT_STEP).and_then(|v| match v {
            Value::Number(n) => n.as_i64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        });
        let id = id.or_else(|| values.get(fields::ID).and_then(Value::as_i64));
        Self {
            record: IntakeRecord::from_values(values),
            id,
            status,
            stored_step,
            degraded: false,
        }
    }
}

/// Load the starting record.
///
/// * Inline data is used as-is; no fetch happens.
/// * An id alone fetches the record. Upload fields that come back as remote
///   references are unset locally (only a fresh upload can replace them) and
///   derived fields are recomputed.
/// * A failed fetch is logged and degrades to a blank, unsaved record.
pub async fn load<P>(
    persistence: &P,
    draft_id: Option<DbId>,
    inline: Option<Map<String, Value>>,
) -> LoadedDraft
where
    P: IntakePersistence + ?Sized,
{
    if let Some(values) = inline {
        return LoadedDraft::from_values(values, draft_id);
    }

    let Some(id) = draft_id else {
        return LoadedDraft::blank();
    };

    match persistence.get_by_id(id).await {
        Ok(values) => {
            let mut loaded = LoadedDraft::from_values(values, Some(id));
            let dropped = loaded.record.drop_remote_uploads();
            derived::recompute_all(&mut loaded.record);
            tracing::info!(
                record_id = id,
                stored_step = ?loaded.stored_step,
                dropped_uploads = dropped.len(),
                "Intake draft loaded"
            );
            loaded
        }
        Err(e) => {
            tracing::warn!(
                record_id = id,
                error = %e,
                "Failed to load intake draft, starting a blank record"
            );
            LoadedDraft {
                degraded: true,
                ..LoadedDraft::blank()
            }
        }
    }
}
