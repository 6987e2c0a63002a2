//! Persistence payloads for drafts and submissions, and their multipart
//! form encoding.

use std::collections::BTreeMap;

use serde_json::{Map, Value};

use super::derived;
use super::fields;
use super::record::{Attachment, IntakeRecord};
use super::status::LifecycleStatus;
use crate::types::Timestamp;

/// What gets sent to the backend on save or submit.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IntakePayload {
    /// Field values. Nulls and blanks are dropped during encoding.
    pub fields: Map<String, Value>,
    /// Fields that must be blanked on the backend even on a partial update.
    pub cleared: Vec<String>,
    /// Fresh document uploads.
    pub attachments: BTreeMap<String, Attachment>,
}

impl IntakePayload {
    pub fn status(&self) -> Option<&str> {
        self.fields.get(fields::STATUS).and_then(Value::as_str)
    }
}

/// One part of a multipart form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormPart {
    Text { name: String, value: String },
    File { name: String, attachment: Attachment },
}

/// Payload for saving a draft from `current_step`. Status is forced to
/// `DRAFT`; an empty screen name is left out so it cannot collide with
/// another blank-named draft.
pub fn draft_payload(
    record: &IntakeRecord,
    current_step: u8,
    onboarded_by: Option<&str>,
) -> IntakePayload {
    let mut payload = base_payload(record, onboarded_by);
    if record.str_value(fields::SCREEN_NAME).is_none() {
        payload.fields.remove(fields::SCREEN_NAME);
    }
    payload.fields.insert(
        fields::STATUS.to_string(),
        Value::from(LifecycleStatus::Draft.as_str()),
    );
    payload
        .fields
        .insert(fields::CURRENT_STEP.to_string(), Value::from(current_step));
    payload
}

/// Payload for the final submission.
pub fn submission_payload(
    record: &IntakeRecord,
    status: LifecycleStatus,
    onboarded_by: Option<&str>,
    submitted_at: Timestamp,
) -> IntakePayload {
    let mut payload = base_payload(record, onboarded_by);
    payload
        .fields
        .insert(fields::STATUS.to_string(), Value::from(status.as_str()));
    payload.fields.insert(
        fields::SUBMITTED_AT.to_string(),
        Value::from(submitted_at.to_rfc3339()),
    );
    payload
}

fn base_payload(record: &IntakeRecord, onboarded_by: Option<&str>) -> IntakePayload {
    let mut values: Map<String, Value> = record
        .values()
        .iter()
        .filter(|(key, _)| {
            !fields::LOCAL_ONLY_FIELDS.contains(&key.as_str())
                && !fields::is_upload(key)
                && key.as_str() != fields::ID
        })
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect();

    let mut cleared = Vec::new();
    if derived::is_indoor(record) {
        for key in fields::OUTDOOR_ONLY_FIELDS {
            values.insert(key.to_string(), Value::Null);
            cleared.push(key.to_string());
        }
    }

    if let Some(user) = onboarded_by {
        values.insert(fields::ONBOARDED_BY.to_string(), Value::from(user));
    }

    IntakePayload {
        fields: values,
        cleared,
        attachments: record.attachments().clone(),
    }
}

/// Flatten a payload into multipart parts.
///
/// Lists and objects are sent as JSON strings, booleans as `"true"` /
/// `"false"`, numbers as their decimal text. Nulls and blank strings are
/// omitted, except cleared fields, which go out as empty values. Files are
/// attached only when a new one was chosen.
pub fn encode_parts(payload: &IntakePayload) -> Vec<FormPart> {
    let mut parts: Vec<FormPart> = payload
        .fields
        .iter()
        .filter_map(|(name, value)| {
            encode_value(value).map(|value| FormPart::Text {
                name: name.clone(),
                value,
            })
        })
        .collect();

    parts.extend(payload.cleared.iter().map(|name| FormPart::Text {
        name: name.clone(),
        value: String::new(),
    }));

    parts.extend(
        payload
            .attachments
            .iter()
            .map(|(name, attachment)| FormPart::File {
                name: name.clone(),
                attachment: attachment.clone(),
            }),
    );
    parts
}

fn encode_value(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::String(s) if s.trim().is_empty() => None,
        Value::String(s) => Some(s.clone()),
        Value::Array(_) | Value::Object(_) => Some(value.to_string()),
    }
}
