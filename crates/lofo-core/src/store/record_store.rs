//! Durable single-slot persistence for ordered record sequences.
//!
//! Each store owns one named slot: a JSON array in one file under the data
//! dir. Every write serializes the full sequence and replaces the slot via a
//! temp-file rename, so a reader never observes a partial write. Corruption
//! is a cache miss, not a fault: an unparseable slot loads as a tagged error
//! the caches map to an empty snapshot, and a single bad element is skipped
//! without poisoning the rest of the array.
//!
//! The whole-sequence read-modify-write model is fine at this scale (a few
//! hundred records at most) but is a known scaling limit.

use std::fs;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;

/// Failure classes at the storage boundary.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Slot exists but could not be read
    #[error("failed to read slot: {0}")]
    Read(String),
    /// Slot contents are not a JSON array
    #[error("failed to parse slot: {0}")]
    Parse(String),
    /// Slot could not be written or removed
    #[error("failed to write slot: {0}")]
    Write(String),
}

/// Persistence for one named slot holding an ordered record sequence.
pub struct RecordStore {
    slot: String,
    path: PathBuf,
}

impl RecordStore {
    pub fn new<P: AsRef<Path>>(data_dir: P, slot: &str) -> Self {
        Self {
            slot: slot.to_string(),
            path: data_dir.as_ref().join(format!("{slot}.json")),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the full sequence from the slot.
    ///
    /// A missing slot is an empty sequence, not an error. Elements that fail
    /// to deserialize individually are dropped with a warning; the rest of
    /// the sequence loads normally.
    pub fn load<T: DeserializeOwned>(&self) -> Result<Vec<T>, StoreError> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(StoreError::Read(e.to_string())),
        };

        let values: Vec<serde_json::Value> =
            serde_json::from_str(&contents).map_err(|e| StoreError::Parse(e.to_string()))?;

        let mut records = Vec::with_capacity(values.len());
        for value in values {
            match serde_json::from_value(value) {
                Ok(record) => records.push(record),
                Err(e) => {
                    tracing::warn!(slot = %self.slot, "dropping malformed record: {e}");
                }
            }
        }
        Ok(records)
    }

    /// Serialize the full sequence and replace the slot.
    ///
    /// Writes to a temp file and renames over the slot so a crash mid-write
    /// never leaves a truncated array behind.
    pub fn save<T: Serialize>(&self, records: &[T]) -> Result<(), StoreError> {
        let json =
            serde_json::to_string(records).map_err(|e| StoreError::Write(e.to_string()))?;

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| StoreError::Write(e.to_string()))?;
        }

        let temp = self.path.with_extension("json.tmp");
        fs::write(&temp, json).map_err(|e| StoreError::Write(e.to_string()))?;
        fs::rename(&temp, &self.path).map_err(|e| StoreError::Write(e.to_string()))?;
        Ok(())
    }

    /// Delete the slot file entirely. An already-absent slot is success.
    pub fn remove(&self) -> Result<(), StoreError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StoreError::Write(e.to_string())),
        }
    }
}
