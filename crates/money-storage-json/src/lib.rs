//! money-storage-json
//!
//! Filesystem-backed [`RecordStore`]: each store is one pretty-printed JSON array file.

use std::{
    fs::{self, File},
    io::{ErrorKind, Write},
    path::{Path, PathBuf},
};

use money_core::storage::{RecordStore, StoreError};
use serde_json::Value;

const TMP_SUFFIX: &str = "tmp";

/// A JSON array file acting as an append-only list of records.
///
/// Writes go to a `.tmp` sibling that is then renamed over the target, so a crash
/// never leaves a half-written array behind. There is no locking: concurrent
/// processes doing read-modify-write on the same file race, and the last writer wins.
#[derive(Debug, Clone)]
pub struct JsonRecordStore {
    path: PathBuf,
}

impl JsonRecordStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store named `file_name` inside `dir`.
    pub fn in_dir(dir: &Path, file_name: &str) -> Self {
        Self::new(dir.join(file_name))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, err: std::io::Error) -> StoreError {
        StoreError::Io {
            store: self.describe(),
            reason: err.to_string(),
        }
    }

    fn corrupt(&self, reason: impl Into<String>) -> StoreError {
        StoreError::Corrupt {
            store: self.describe(),
            reason: reason.into(),
        }
    }
}

impl RecordStore for JsonRecordStore {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    fn load(&self) -> Result<Vec<Value>, StoreError> {
        let data = match fs::read_to_string(&self.path) {
            Ok(data) => data,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                return Err(StoreError::Missing(self.describe()))
            }
            Err(err) if err.kind() == ErrorKind::InvalidData => {
                return Err(self.corrupt(format!("not UTF-8: {}", err)))
            }
            Err(err) => return Err(self.io_error(err)),
        };
        let value: Value =
            serde_json::from_str(&data).map_err(|err| self.corrupt(err.to_string()))?;
        match value {
            Value::Array(records) => {
                tracing::debug!(store = %self.describe(), records = records.len(), "store loaded");
                Ok(records)
            }
            _ => Err(self.corrupt("top-level value is not an array")),
        }
    }

    fn persist(&self, records: &[Value]) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(records)
            .map_err(|err| self.corrupt(err.to_string()))?;
        let tmp = tmp_path(&self.path);
        write_file(&tmp, &json).map_err(|err| self.io_error(err))?;
        fs::rename(&tmp, &self.path).map_err(|err| self.io_error(err))?;
        tracing::debug!(store = %self.describe(), records = records.len(), "store persisted");
        Ok(())
    }
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.{}", existing, TMP_SUFFIX),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

fn write_file(path: &Path, data: &str) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut file = File::create(path)?;
    file.write_all(data.as_bytes())?;
    file.flush()?;
    Ok(())
}
