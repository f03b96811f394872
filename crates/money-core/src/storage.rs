//! Persistence seam for the JSON-array stores.
//!
//! A store is one ordered list of JSON records (balances, deposits, transfers or the
//! read-only transaction source). Services only see [`RecordStore`], so tests can swap
//! the filesystem backend for [`MemoryRecordStore`].

use std::sync::Mutex;

use serde_json::Value;
use thiserror::Error;

/// Failure to read or write a store, before it is mapped to an operation-level error.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("store `{0}` does not exist")]
    Missing(String),
    #[error("store `{store}` is corrupt: {reason}")]
    Corrupt { store: String, reason: String },
    #[error("I/O error on store `{store}`: {reason}")]
    Io { store: String, reason: String },
}

/// Abstraction over a single append-only list of JSON records.
///
/// Implementations do not coordinate writers: a load followed by a persist is a plain
/// read-modify-write, so two processes appending at once can lose one of the records.
pub trait RecordStore: Send + Sync {
    /// Short label used in messages and logs, usually the backing file name.
    fn describe(&self) -> String;

    /// Reads every record. Fails with `Missing` or `Corrupt` instead of guessing.
    fn load(&self) -> Result<Vec<Value>, StoreError>;

    /// Replaces the whole store with `records`, creating it when absent.
    fn persist(&self, records: &[Value]) -> Result<(), StoreError>;

    /// Lenient read: a missing or corrupt store counts as empty.
    fn load_or_empty(&self) -> Result<Vec<Value>, StoreError> {
        match self.load() {
            Ok(records) => Ok(records),
            Err(StoreError::Missing(_)) => Ok(Vec::new()),
            Err(StoreError::Corrupt { store, reason }) => {
                tracing::warn!(%store, %reason, "resetting corrupt store to an empty list");
                Ok(Vec::new())
            }
            Err(err) => Err(err),
        }
    }

    /// Appends to an existing, well-formed store.
    fn append(&self, record: Value) -> Result<(), StoreError> {
        let mut records = self.load()?;
        records.push(record);
        self.persist(&records)
    }

    /// Appends unless a record already carries the same value under `key`.
    ///
    /// Uses the lenient read, so the store is created (or repaired) on first write.
    /// Returns `false` without writing when a duplicate exists.
    fn append_if_absent(&self, record: Value, key: &str) -> Result<bool, StoreError> {
        let mut records = self.load_or_empty()?;
        let candidate = record.get(key);
        if candidate.is_some() && records.iter().any(|existing| existing.get(key) == candidate) {
            return Ok(false);
        }
        records.push(record);
        self.persist(&records)?;
        Ok(true)
    }
}

#[derive(Debug, Clone)]
enum MemoryState {
    Missing,
    Corrupt(String),
    Records(Vec<Value>),
}

/// In-process store used by tests and dry runs.
#[derive(Debug)]
pub struct MemoryRecordStore {
    name: String,
    state: Mutex<MemoryState>,
}

impl MemoryRecordStore {
    /// A store that does not exist yet.
    pub fn missing(name: impl Into<String>) -> Self {
        Self::with_state(name, MemoryState::Missing)
    }

    pub fn empty(name: impl Into<String>) -> Self {
        Self::with_records(name, Vec::new())
    }

    pub fn with_records(name: impl Into<String>, records: Vec<Value>) -> Self {
        Self::with_state(name, MemoryState::Records(records))
    }

    /// A store whose contents cannot be read as a JSON array.
    pub fn corrupt(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::with_state(name, MemoryState::Corrupt(reason.into()))
    }

    fn with_state(name: impl Into<String>, state: MemoryState) -> Self {
        Self {
            name: name.into(),
            state: Mutex::new(state),
        }
    }

    /// Current records, or `None` when the store is missing or corrupt.
    pub fn snapshot(&self) -> Option<Vec<Value>> {
        match &*self.lock() {
            MemoryState::Records(records) => Some(records.clone()),
            _ => None,
        }
    }

    pub fn len(&self) -> usize {
        self.snapshot().map(|records| records.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MemoryState> {
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl RecordStore for MemoryRecordStore {
    fn describe(&self) -> String {
        self.name.clone()
    }

    fn load(&self) -> Result<Vec<Value>, StoreError> {
        match &*self.lock() {
            MemoryState::Missing => Err(StoreError::Missing(self.name.clone())),
            MemoryState::Corrupt(reason) => Err(StoreError::Corrupt {
                store: self.name.clone(),
                reason: reason.clone(),
            }),
            MemoryState::Records(records) => Ok(records.clone()),
        }
    }

    fn persist(&self, records: &[Value]) -> Result<(), StoreError> {
        *self.lock() = MemoryState::Records(records.to_vec());
        Ok(())
    }
}
