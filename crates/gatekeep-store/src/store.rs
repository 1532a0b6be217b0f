//! Policy persistence backed by a single JSON file.

use crate::error::StoreError;
use gatekeep_types::PolicyState;
use std::path::{Path, PathBuf};

/// Storage keys that must exist in a well-formed policy file. A load that
/// finds any of them missing is backfilled and written back once.
const SCHEMA_KEYS: [&str; 4] = ["focusMode", "categories", "blockedSites", "temporaryAllows"];

/// File-based policy store. The whole policy is one JSON document; reads
/// and writes are wholesale, so every load sees a consistent snapshot.
pub struct PolicyStore {
    path: PathBuf,
}

impl PolicyStore {
    /// Create a store at `path`, ensuring the parent directory exists.
    pub async fn new(path: PathBuf) -> Result<Self, StoreError> {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the current policy.
    ///
    /// A missing file initializes defaults on disk. A file missing schema
    /// keys is backfilled with defaults — existing keys untouched — and
    /// written back once, so older state files migrate non-destructively.
    pub async fn load(&self) -> Result<PolicyState, StoreError> {
        let data = match tokio::fs::read_to_string(&self.path).await {
            Ok(data) => data,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let state = PolicyState::default();
                self.save(&state).await?;
                tracing::info!(path = %self.path.display(), "initialized policy storage");
                return Ok(state);
            }
            Err(e) => return Err(e.into()),
        };

        let value: serde_json::Value = serde_json::from_str(&data)?;
        let missing_keys = match value.as_object() {
            Some(map) => SCHEMA_KEYS.iter().any(|k| !map.contains_key(*k)),
            None => true,
        };

        let state: PolicyState = serde_json::from_value(value)?;
        if missing_keys {
            self.save(&state).await?;
            tracing::info!(path = %self.path.display(), "backfilled missing policy keys");
        }
        Ok(state)
    }

    /// Save the policy to disk (atomic write: .tmp → rename).
    pub async fn save(&self, state: &PolicyState) -> Result<(), StoreError> {
        let tmp_path = self.path.with_extension("tmp");
        let json = serde_json::to_string_pretty(state)?;
        tokio::fs::write(&tmp_path, json).await?;
        tokio::fs::rename(&tmp_path, &self.path).await?;
        Ok(())
    }
}
