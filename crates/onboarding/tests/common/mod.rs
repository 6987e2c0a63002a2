//! Shared fixtures for the onboarding integration tests: an in-memory
//! persistence backend and helpers that fill the wizard with valid data.

#![allow(dead_code)]

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Map, Value};
use tokio::sync::{Mutex, Notify};

use signage_core::intake::fields;
use signage_core::intake::payload::IntakePayload;
use signage_core::intake::record::Attachment;
use signage_core::intake::store::{EditOutcome, IntakeEvent};
use signage_core::types::DbId;
use signage_onboarding::controller::{SessionContext, WorkflowController};
use signage_onboarding::persistence::{IntakePersistence, PersistenceError, PersistenceResult};

// ---------------------------------------------------------------------------
// In-memory backend
// ---------------------------------------------------------------------------

/// One call received by [`MemoryBackend`].
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Create(IntakePayload),
    Get(DbId),
    PartialUpdate(DbId, IntakePayload),
    FullUpdate(DbId, IntakePayload),
    NameExists {
        name: String,
        exclude_id: Option<DbId>,
    },
}

/// Stores records the way the REST backend does: null values are never
/// sent, cleared fields are blanked, uploads come back as remote URLs.
#[derive(Default)]
pub struct MemoryBackend {
    records: Mutex<BTreeMap<DbId, Map<String, Value>>>,
    next_id: Mutex<DbId>,
    calls: Mutex<Vec<Call>>,
    fail_writes: Mutex<Option<PersistenceError>>,
    fail_reads: Mutex<Option<PersistenceError>>,
    fail_names: Mutex<Option<PersistenceError>>,
    gate: Mutex<Option<Arc<Notify>>>,
    /// Signalled whenever a call reaches the backend.
    pub entered: Notify,
}

impl MemoryBackend {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Seed a stored record and return its id.
    pub async fn insert(&self, mut values: Map<String, Value>) -> DbId {
        let id = self.allocate_id().await;
        values.insert(fields::ID.to_string(), json!(id));
        self.records.lock().await.insert(id, values);
        id
    }

    pub async fn stored(&self, id: DbId) -> Option<Map<String, Value>> {
        self.records.lock().await.get(&id).cloned()
    }

    pub async fn calls(&self) -> Vec<Call> {
        self.calls.lock().await.clone()
    }

    pub async fn write_count(&self) -> usize {
        self.calls
            .lock()
            .await
            .iter()
            .filter(|c| {
                matches!(
                    c,
                    Call::Create(_) | Call::PartialUpdate(..) | Call::FullUpdate(..)
                )
            })
            .count()
    }

    /// Fail the next create/update with `err`.
    pub async fn fail_next_write(&self, err: PersistenceError) {
        *self.fail_writes.lock().await = Some(err);
    }

    pub async fn fail_next_read(&self, err: PersistenceError) {
        *self.fail_reads.lock().await = Some(err);
    }

    pub async fn fail_next_name_check(&self, err: PersistenceError) {
        *self.fail_names.lock().await = Some(err);
    }

    /// Hold every following call until the returned handle is notified.
    pub async fn hold(&self) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        *self.gate.lock().await = Some(gate.clone());
        gate
    }

    pub async fn release(&self) {
        if let Some(gate) = self.gate.lock().await.take() {
            gate.notify_waiters();
            gate.notify_one();
        }
    }

    async fn checkpoint(&self, call: Call) {
        self.calls.lock().await.push(call);
        self.entered.notify_one();
        let gate = self.gate.lock().await.clone();
        if let Some(gate) = gate {
            gate.notified().await;
        }
    }

    async fn allocate_id(&self) -> DbId {
        let mut next = self.next_id.lock().await;
        *next += 1;
        *next
    }

    fn apply_payload(target: &mut Map<String, Value>, payload: &IntakePayload) {
        for (key, value) in &payload.fields {
            match value {
                Value::Null => {}
                Value::String(s) if s.trim().is_empty() => {}
                other => {
                    target.insert(key.clone(), other.clone());
                }
            }
        }
        for key in &payload.cleared {
            target.insert(key.clone(), Value::Null);
        }
        for (key, attachment) in &payload.attachments {
            target.insert(
                key.clone(),
                json!(format!("https://files.example.com/{}", attachment.file_name)),
            );
        }
    }
}

#[async_trait]
impl IntakePersistence for MemoryBackend {
    async fn create(&self, payload: &IntakePayload) -> PersistenceResult<DbId> {
        self.checkpoint(Call::Create(payload.clone())).await;
        if let Some(err) = self.fail_writes.lock().await.take() {
            return Err(err);
        }
        let id = self.allocate_id().await;
        let mut values = Map::new();
        Self::apply_payload(&mut values, payload);
        values.insert(fields::ID.to_string(), json!(id));
        self.records.lock().await.insert(id, values);
        Ok(id)
    }

    async fn get_by_id(&self, id: DbId) -> PersistenceResult<Map<String, Value>> {
        self.checkpoint(Call::Get(id)).await;
        if let Some(err) = self.fail_reads.lock().await.take() {
            return Err(err);
        }
        self.records
            .lock()
            .await
            .get(&id)
            .cloned()
            .ok_or(PersistenceError::NotFound(id))
    }

    async fn partial_update(
        &self,
        id: DbId,
        payload: &IntakePayload,
    ) -> PersistenceResult<Map<String, Value>> {
        self.checkpoint(Call::PartialUpdate(id, payload.clone())).await;
        if let Some(err) = self.fail_writes.lock().await.take() {
            return Err(err);
        }
        let mut records = self.records.lock().await;
        let record = records.get_mut(&id).ok_or(PersistenceError::NotFound(id))?;
        Self::apply_payload(record, payload);
        Ok(record.clone())
    }

    async fn full_update(
        &self,
        id: DbId,
        payload: &IntakePayload,
    ) -> PersistenceResult<Map<String, Value>> {
        self.checkpoint(Call::FullUpdate(id, payload.clone())).await;
        if let Some(err) = self.fail_writes.lock().await.take() {
            return Err(err);
        }
        let mut records = self.records.lock().await;
        if !records.contains_key(&id) {
            return Err(PersistenceError::NotFound(id));
        }
        let mut values = Map::new();
        Self::apply_payload(&mut values, payload);
        values.insert(fields::ID.to_string(), json!(id));
        records.insert(id, values.clone());
        Ok(values)
    }

    async fn name_exists(&self, name: &str, exclude_id: Option<DbId>) -> PersistenceResult<bool> {
        self.checkpoint(Call::NameExists {
            name: name.to_string(),
            exclude_id,
        })
        .await;
        if let Some(err) = self.fail_names.lock().await.take() {
            return Err(err);
        }
        Ok(self.records.lock().await.iter().any(|(id, record)| {
            Some(*id) != exclude_id
                && record.get(fields::SCREEN_NAME).and_then(Value::as_str) == Some(name)
        }))
    }
}

// ---------------------------------------------------------------------------
// Wizard helpers
// ---------------------------------------------------------------------------

pub fn context() -> SessionContext {
    SessionContext {
        user_id: 7,
        user_name: "ops@example.com".to_string(),
    }
}

pub fn controller(backend: &Arc<MemoryBackend>) -> Arc<WorkflowController<MemoryBackend>> {
    Arc::new(WorkflowController::new(backend.clone(), context()))
}

pub fn pdf(name: &str) -> Attachment {
    Attachment {
        file_name: name.to_string(),
        content_type: "application/pdf".to_string(),
        bytes: b"%PDF-1.4".to_vec(),
    }
}

/// Valid minimal values for one input step, for an outdoor screen.
pub fn step_values(step: u8, role: &str) -> Vec<(&'static str, Value)> {
    match step {
        1 => vec![
            (fields::SCREEN_NAME, json!("Phoenix Marketcity Atrium")),
            (fields::ROLE, json!(role)),
            (fields::ADDRESS_STREET, json!("LBS Marg, Kurla West")),
            (fields::CITY, json!("Mumbai")),
            (fields::STATE, json!("Maharashtra")),
            (fields::PINCODE, json!("400070")),
            (fields::LATITUDE, json!(19.0866)),
            (fields::LONGITUDE, json!(72.889)),
        ],
        2 => vec![
            (fields::TECHNOLOGY, json!("LED")),
            (fields::ENVIRONMENT, json!("Outdoor")),
            (fields::SCREEN_TYPE, json!("Billboard")),
            (fields::SCREEN_WIDTH, json!(40)),
            (fields::SCREEN_HEIGHT, json!(20)),
            (fields::RESOLUTION_WIDTH, json!(1920)),
            (fields::RESOLUTION_HEIGHT, json!(1080)),
        ],
        3 => vec![
            (fields::MOUNT_TYPE, json!("Pole")),
            (fields::INSTALLATION_HEIGHT, json!(6)),
            (fields::FACING_DIRECTION, json!("North")),
            (fields::ROAD_TYPE, json!("Highway")),
            (fields::TRAFFIC_DIRECTION, json!("Both")),
        ],
        4 => vec![
            (fields::STANDARD_AD_DURATION_SEC, json!(10)),
            (fields::TOTAL_SLOTS_PER_LOOP, json!(12)),
            (fields::RESERVED_SLOTS, json!(2)),
            (fields::SUPPORTED_FORMATS, json!(["MP4", "JPG"])),
            (fields::CONNECTIVITY_TYPE, json!("4G")),
            (fields::POWER_BACKUP, json!("UPS")),
        ],
        5 => vec![
            (fields::BASE_PRICE_PER_SLOT_INR, json!(500)),
            (fields::SENSITIVE_ZONES, json!(["School"])),
            (fields::RESTRICTED_CATEGORIES, json!(["Alcohol"])),
        ],
        6 => vec![
            (fields::CMS_TYPE, json!("Xibo")),
            (fields::GST_NUMBER, json!("27AAPFU0939F1ZV")),
        ],
        _ => Vec::new(),
    }
}

/// Fill one input step with valid data.
pub async fn fill_step(controller: &WorkflowController<MemoryBackend>, step: u8, role: &str) {
    for (key, value) in step_values(step, role) {
        assert_eq!(controller.set_field(key, value).await, EditOutcome::Applied);
    }
    if step == 6 {
        for (key, file) in [
            (fields::OWNERSHIP_PROOF_UPLOADED, "ownership.pdf"),
            (fields::PERMISSION_DOCUMENT_UPLOADED, "municipal-noc.pdf"),
        ] {
            let outcome = controller
                .apply(IntakeEvent::AttachmentChosen {
                    key: key.to_string(),
                    attachment: pdf(file),
                })
                .await;
            assert_eq!(outcome, EditOutcome::Applied);
        }
        assert_eq!(controller.accept_content_policy().await, EditOutcome::Applied);
    }
}

/// Fill steps 1–6 and advance to the review step.
pub async fn fill_to_review(controller: &WorkflowController<MemoryBackend>, role: &str) {
    for step in 1..=6 {
        fill_step(controller, step, role).await;
        assert_eq!(controller.next().await, Ok(step + 1));
    }
}
