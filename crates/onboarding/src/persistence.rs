//! The backend persistence interface consumed by the workflow.
//!
//! The workflow never talks HTTP itself; it goes through
//! [`IntakePersistence`], implemented over REST by `signage-client` and by
//! in-memory fakes in tests.

use std::collections::BTreeMap;

use async_trait::async_trait;
use serde_json::{Map, Value};

use signage_core::intake::payload::IntakePayload;
use signage_core::types::DbId;

/// Errors from the persistence backend. Always surfaced verbatim to the
/// caller; the workflow never retries on its own.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PersistenceError {
    #[error("Screen {0} not found")]
    NotFound(DbId),

    /// The backend rejected the payload with per-field messages.
    #[error("{}", summarize(.field_errors))]
    Rejected {
        field_errors: BTreeMap<String, Vec<String>>,
        raw: String,
    },

    /// The backend rejected the request with a single message.
    #[error("{0}")]
    Message(String),

    /// The request never got a usable answer (network, TLS, decoding).
    #[error("Transport error: {0}")]
    Transport(String),
}

pub type PersistenceResult<T> = Result<T, PersistenceError>;

/// CRUD-style access to screen records.
#[async_trait]
pub trait IntakePersistence: Send + Sync {
    /// Create a draft or a full record. Returns the new record id.
    async fn create(&self, payload: &IntakePayload) -> PersistenceResult<DbId>;

    /// Fetch a record's fields.
    async fn get_by_id(&self, id: DbId) -> PersistenceResult<Map<String, Value>>;

    /// Merge the payload into an existing record.
    async fn partial_update(
        &self,
        id: DbId,
        payload: &IntakePayload,
    ) -> PersistenceResult<Map<String, Value>>;

    /// Replace an existing record with the payload.
    async fn full_update(
        &self,
        id: DbId,
        payload: &IntakePayload,
    ) -> PersistenceResult<Map<String, Value>>;

    /// Whether another record already uses `name`, ignoring `exclude_id`.
    async fn name_exists(&self, name: &str, exclude_id: Option<DbId>) -> PersistenceResult<bool>;
}

/// Interpret an error body from the backend.
///
/// `{"field": ["msg", ..], ..}` becomes [`PersistenceError::Rejected`];
/// `{"detail": ".."}`, `{"error": ".."}` or a plain-text body becomes
/// [`PersistenceError::Message`].
pub fn parse_error_body(body: &str) -> PersistenceError {
    let Ok(Value::Object(obj)) = serde_json::from_str::<Value>(body) else {
        let message = body.trim();
        return PersistenceError::Message(if message.is_empty() {
            "The server rejected the request".to_string()
        } else {
            message.to_string()
        });
    };

    for key in ["detail", "error", "message"] {
        if let Some(message) = obj.get(key).and_then(Value::as_str) {
            return PersistenceError::Message(message.to_string());
        }
    }

    let field_errors: BTreeMap<String, Vec<String>> = obj
        .iter()
        .map(|(field, value)| (field.clone(), messages(value)))
        .filter(|(_, msgs)| !msgs.is_empty())
        .collect();

    if field_errors.is_empty() {
        PersistenceError::Message(body.trim().to_string())
    } else {
        PersistenceError::Rejected {
            field_errors,
            raw: body.to_string(),
        }
    }
}

fn messages(value: &Value) -> Vec<String> {
    match value {
        Value::String(s) => vec![s.clone()],
        Value::Array(items) => items
            .iter()
            .filter_map(|item| item.as_str().map(str::to_string))
            .collect(),
        _ => Vec::new(),
    }
}

fn summarize(field_errors: &BTreeMap<String, Vec<String>>) -> String {
    field_errors
        .iter()
        .map(|(field, msgs)| format!("{field}: {}", msgs.join(" ")))
        .collect::<Vec<_>>()
        .join("; ")
}
