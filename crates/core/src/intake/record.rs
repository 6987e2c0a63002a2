//! The intake record: a flat field map plus pending document uploads.

use std::collections::BTreeMap;

use serde_json::{Map, Value};

use super::fields;

/// A document chosen for upload in the current session.
///
/// Only fresh uploads live here. Documents already stored on the backend are
/// referenced server-side and never round-trip through the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// Every field across all wizard steps.
///
/// A pure container: merging never validates. Edits coming from the wizard
/// go through [`super::store::IntakeState::reduce`], which enforces the access
/// policy and runs the derived-field cascade.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IntakeRecord {
    values: Map<String, Value>,
    attachments: BTreeMap<String, Attachment>,
}

impl IntakeRecord {
    /// An empty record with no fields set.
    pub fn new() -> Self {
        Self::default()
    }

    /// A fresh record seeded with the form defaults: toggles off, tag sets
    /// empty, policy not accepted.
    pub fn with_defaults() -> Self {
        let mut record = Self::new();
        record.merge(default_values());
        record
    }

    /// Build a record from an existing field map, layered over the defaults.
    pub fn from_values(values: Map<String, Value>) -> Self {
        let mut record = Self::with_defaults();
        record.merge(values);
        record
    }

    /// Unset upload fields that hold a value instead of a fresh attachment,
    /// such as a remote URL returned by the backend. Returns the dropped keys.
    pub fn drop_remote_uploads(&mut self) -> Vec<&'static str> {
        fields::UPLOAD_FIELDS
            .iter()
            .copied()
            .filter(|key| self.values.remove(*key).is_some())
            .collect()
    }

    /// All field values.
    pub fn values(&self) -> &Map<String, Value> {
        &self.values
    }

    /// Raw value for `key`, if present.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    /// Shallow-merge `partial` into the record, returning the merged state.
    pub fn merge(&mut self, partial: Map<String, Value>) -> &Self {
        for (key, value) in partial {
            self.values.insert(key, value);
        }
        self
    }

    /// Set a single field.
    pub fn set(&mut self, key: &str, value: Value) {
        self.values.insert(key.to_string(), value);
    }

    /// Unset a field.
    pub fn clear(&mut self, key: &str) {
        self.values.remove(key);
    }

    /// `true` when the field holds something other than null, an empty
    /// string or an empty list.
    pub fn is_set(&self, key: &str) -> bool {
        match self.values.get(key) {
            None | Some(Value::Null) => false,
            Some(Value::String(s)) => !s.trim().is_empty(),
            Some(Value::Array(a)) => !a.is_empty(),
            Some(_) => true,
        }
    }

    /// Non-empty string value.
    pub fn str_value(&self, key: &str) -> Option<&str> {
        self.values
            .get(key)
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }

    /// Numeric value. Numbers typed into text inputs arrive as strings, so
    /// numeric strings are accepted too.
    pub fn f64_value(&self, key: &str) -> Option<f64> {
        match self.values.get(key)? {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    /// Toggle value. Missing or malformed toggles read as off.
    pub fn bool_value(&self, key: &str) -> bool {
        match self.values.get(key) {
            Some(Value::Bool(b)) => *b,
            Some(Value::String(s)) => s == "true",
            _ => false,
        }
    }

    /// List value, empty when unset or not a list.
    pub fn list_value(&self, key: &str) -> &[Value] {
        self.values
            .get(key)
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    // -- attachments --

    pub fn attachment(&self, key: &str) -> Option<&Attachment> {
        self.attachments.get(key)
    }

    pub fn has_attachment(&self, key: &str) -> bool {
        self.attachments.contains_key(key)
    }

    pub fn attachments(&self) -> &BTreeMap<String, Attachment> {
        &self.attachments
    }

    pub fn set_attachment(&mut self, key: &str, attachment: Attachment) {
        self.attachments.insert(key.to_string(), attachment);
    }

    pub fn clear_attachment(&mut self, key: &str) {
        self.attachments.remove(key);
    }
}

fn default_values() -> Map<String, Value> {
    let mut defaults = Map::new();
    for key in [
        fields::SUPPORTED_FORMATS,
        fields::SENSITIVE_ZONES,
        fields::RESTRICTED_CATEGORIES,
        fields::SEASONAL_PRICES,
    ] {
        defaults.insert(key.to_string(), Value::Array(Vec::new()));
    }
    for key in [
        fields::HAS_DOWNTIME,
        fields::SEASONAL_PRICING_ENABLED,
        fields::MINIMUM_BOOKING_ENABLED,
        fields::AI_CAMERA_ENABLED,
        fields::CONTENT_POLICY_ACCEPTED,
        fields::SCREEN_NAME_TAKEN,
    ] {
        defaults.insert(key.to_string(), Value::Bool(false));
    }
    defaults
}
