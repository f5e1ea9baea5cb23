//! In-memory entity store: named collections of positionally addressed records.
//!
//! Slot `id - 1` always holds the record for `id`. Deleting a record leaves a
//! tombstone (`None`) in its slot, so ids are never reused and never shift.

use crate::error::AppError;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// A stored entity: any JSON object. The store owns `id`, `created` and `modified`.
pub type Record = Map<String, Value>;

/// Source of epoch-millisecond timestamps for `created` / `modified`.
pub type Clock = Arc<dyn Fn() -> i64 + Send + Sync>;

pub const ID_FIELD: &str = "id";
pub const CREATED_FIELD: &str = "created";
pub const MODIFIED_FIELD: &str = "modified";

pub struct EntityStore {
    collections: HashMap<String, Vec<Option<Record>>>,
    clock: Clock,
}

impl Default for EntityStore {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for EntityStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EntityStore")
            .field("collections", &self.collections.keys().collect::<Vec<_>>())
            .finish_non_exhaustive()
    }
}

impl EntityStore {
    pub fn new() -> Self {
        Self::with_clock(Arc::new(|| chrono::Utc::now().timestamp_millis()))
    }

    pub fn with_clock(clock: Clock) -> Self {
        EntityStore {
            collections: HashMap::new(),
            clock,
        }
    }

    /// All live records of a collection, in id order.
    pub fn list(&self, collection: &str) -> Result<Vec<Record>, AppError> {
        let slots = self.slots(collection)?;
        Ok(slots.iter().flatten().cloned().collect())
    }

    pub fn get(&self, collection: &str, id: u64) -> Result<Record, AppError> {
        self.live_slot(collection, id).cloned()
    }

    /// Append a record, creating the collection on first use. Assigns `id`, `created`, `modified`.
    pub fn create(&mut self, collection: &str, mut record: Record) -> Record {
        let now = (self.clock)();
        let slots = self.collections.entry(collection.to_string()).or_default();
        let id = slots.len() as u64 + 1;
        record.insert(CREATED_FIELD.into(), Value::from(now));
        record.insert(MODIFIED_FIELD.into(), Value::from(now));
        record.insert(ID_FIELD.into(), Value::from(id));
        slots.push(Some(record.clone()));
        tracing::debug!(collection, id, "created record");
        record
    }

    /// Overwrite the record named by `record.id` wholesale.
    ///
    /// `created` is always taken from the stored record; a client value is ignored.
    pub fn replace(&mut self, collection: &str, mut record: Record) -> Result<Record, AppError> {
        let id = record_id(&record)?;
        let now = (self.clock)();
        let created = self
            .live_slot(collection, id)?
            .get(CREATED_FIELD)
            .cloned()
            .unwrap_or(Value::Null);
        record.insert(ID_FIELD.into(), Value::from(id));
        record.insert(CREATED_FIELD.into(), created);
        record.insert(MODIFIED_FIELD.into(), Value::from(now));
        let slot = self
            .collections
            .get_mut(collection)
            .and_then(|slots| slots.get_mut(slot_index(id)?))
            .ok_or_else(|| not_found(collection, id))?;
        *slot = Some(record.clone());
        tracing::debug!(collection, id, "replaced record");
        Ok(record)
    }

    /// Tombstone the slot for `id`. Deleting an already deleted id succeeds.
    pub fn delete(&mut self, collection: &str, id: u64) -> Result<(), AppError> {
        let slot = self
            .collections
            .get_mut(collection)
            .ok_or_else(|| AppError::NotFound(format!("collection {}", collection)))?
            .get_mut(slot_index(id).unwrap_or(usize::MAX))
            .ok_or_else(|| not_found(collection, id))?;
        *slot = None;
        tracing::debug!(collection, id, "deleted record");
        Ok(())
    }

    /// Slot count including tombstones; `None` for an unknown collection.
    pub fn slot_count(&self, collection: &str) -> Option<usize> {
        self.collections.get(collection).map(Vec::len)
    }

    fn slots(&self, collection: &str) -> Result<&[Option<Record>], AppError> {
        self.collections
            .get(collection)
            .map(Vec::as_slice)
            .ok_or_else(|| AppError::NotFound(format!("collection {}", collection)))
    }

    fn live_slot(&self, collection: &str, id: u64) -> Result<&Record, AppError> {
        self.slots(collection)?
            .get(slot_index(id).unwrap_or(usize::MAX))
            .and_then(Option::as_ref)
            .ok_or_else(|| not_found(collection, id))
    }
}

/// Zero-based slot for a 1-based id; `None` for id 0.
fn slot_index(id: u64) -> Option<usize> {
    usize::try_from(id).ok()?.checked_sub(1)
}

fn record_id(record: &Record) -> Result<u64, AppError> {
    record
        .get(ID_FIELD)
        .and_then(Value::as_u64)
        .ok_or_else(|| AppError::BadRequest("record id must be a positive integer".into()))
}

fn not_found(collection: &str, id: u64) -> AppError {
    AppError::NotFound(format!("{}/{}", collection, id))
}
