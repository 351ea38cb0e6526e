use serde_json::Value;
use std::collections::HashSet;
use std::sync::Mutex;
use tracing::debug;

use crate::error::{CatalogError, Result};
use crate::pipeline::processing::normalize::record_identity;

/// Repository over raw product records.
///
/// Soft deletion lives here: trashed records are held back by `list` and
/// `get`, so the listing pipeline never sees a "deleted" concept. Implemented
/// as an explicit injected seam instead of ambient global state, so tests can
/// swap in their own instance.
pub trait ProductRepository: Send + Sync {
    /// Inserts the record, or replaces the stored record with the same id
    /// in place (position preserved).
    fn save(&self, record: Value) -> Result<()>;
    fn get(&self, id: &str) -> Result<Option<Value>>;
    /// All non-trashed records in insertion order.
    fn list(&self) -> Result<Vec<Value>>;
    /// Moves the record to the trash. Unknown ids are a no-op.
    fn delete(&self, id: &str) -> Result<()>;
    /// Brings a trashed record back.
    fn restore(&self, id: &str) -> Result<()>;
}

/// In-memory repository for demo and test use.
pub struct InMemoryRepository {
    records: Mutex<Vec<Value>>,
    trashed: Mutex<HashSet<String>>,
}

impl Default for InMemoryRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryRepository {
    pub fn new() -> Self {
        Self {
            records: Mutex::new(Vec::new()),
            trashed: Mutex::new(HashSet::new()),
        }
    }

    /// Builds a repository preloaded with `records`; entries without a
    /// resolvable id are dropped.
    pub fn with_records(records: Vec<Value>) -> Self {
        let repo = Self::new();
        for record in records {
            if record_identity(&record).is_some() {
                let _ = repo.save(record);
            }
        }
        repo
    }
}

impl ProductRepository for InMemoryRepository {
    fn save(&self, record: Value) -> Result<()> {
        let id = record_identity(&record)
            .ok_or_else(|| CatalogError::MissingField("id".to_string()))?;

        let mut records = self.records.lock().unwrap();
        let slot = records
            .iter()
            .position(|existing| record_identity(existing).as_deref() == Some(id.as_str()));
        match slot {
            Some(index) => records[index] = record,
            None => records.push(record),
        }

        debug!("Saved product record {}", id);
        Ok(())
    }

    fn get(&self, id: &str) -> Result<Option<Value>> {
        if self.trashed.lock().unwrap().contains(id) {
            return Ok(None);
        }

        let records = self.records.lock().unwrap();
        Ok(records
            .iter()
            .find(|record| record_identity(record).as_deref() == Some(id))
            .cloned())
    }

    fn list(&self) -> Result<Vec<Value>> {
        let trashed = self.trashed.lock().unwrap();
        let records = self.records.lock().unwrap();
        Ok(records
            .iter()
            .filter(|record| match record_identity(record) {
                Some(id) => !trashed.contains(&id),
                None => true,
            })
            .cloned()
            .collect())
    }

    fn delete(&self, id: &str) -> Result<()> {
        self.trashed.lock().unwrap().insert(id.to_string());
        debug!("Trashed product record {}", id);
        Ok(())
    }

    fn restore(&self, id: &str) -> Result<()> {
        self.trashed.lock().unwrap().remove(id);
        debug!("Restored product record {}", id);
        Ok(())
    }
}

/// Merges locally cached raw records over fetched ones: a local record
/// replaces the fetched record with the same id in place, and unmatched
/// local records append in their own order.
pub fn merge_by_id(fetched: Vec<Value>, local: Vec<Value>) -> Vec<Value> {
    let mut merged = fetched;

    for record in local {
        let id = record_identity(&record);
        let slot = id.as_deref().and_then(|id| {
            merged
                .iter()
                .position(|existing| record_identity(existing).as_deref() == Some(id))
        });

        match slot {
            Some(index) => merged[index] = record,
            None => merged.push(record),
        }
    }

    merged
}

/// Reads a raw-record dataset from a JSON file, accepting either upstream
/// response shape.
pub fn load_raw_records(path: &str) -> Result<Vec<Value>> {
    let content = std::fs::read_to_string(path)?;
    let value: Value = serde_json::from_str(&content)?;
    Ok(raw_records_from_value(value))
}

/// Accepts either upstream response shape: a bare array of records or an
/// object wrapping them under "products".
pub fn raw_records_from_value(value: Value) -> Vec<Value> {
    match value {
        Value::Array(records) => records,
        Value::Object(mut obj) => match obj.remove("products") {
            Some(Value::Array(records)) => records,
            _ => Vec::new(),
        },
        _ => Vec::new(),
    }
}
