//! Implements RecordSource over a directory of JSON files.
//!
//! One array per collection: accounts.json, reps.json, deals.json, activities.json, targets.json.

use crate::domain::{DomainError, RecordSet};
use crate::ports::RecordSource;
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info};

pub const ACCOUNTS_FILE: &str = "accounts.json";
pub const REPS_FILE: &str = "reps.json";
pub const DEALS_FILE: &str = "deals.json";
pub const ACTIVITIES_FILE: &str = "activities.json";
pub const TARGETS_FILE: &str = "targets.json";

/// JSON fixture directory.
pub struct JsonFixtureSource {
    dir: PathBuf,
}

impl JsonFixtureSource {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    /// Read and decode one collection file.
    async fn read_collection<T: DeserializeOwned>(&self, file: &str) -> Result<Vec<T>, DomainError> {
        let path = self.dir.join(file);
        let raw = fs::read_to_string(&path).await.map_err(|e| DomainError::Io {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        let items: Vec<T> = serde_json::from_str(&raw).map_err(|e| DomainError::Parse {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        debug!(path = %path.display(), count = items.len(), "loaded collection");
        Ok(items)
    }
}

#[async_trait::async_trait]
impl RecordSource for JsonFixtureSource {
    async fn load(&self) -> Result<RecordSet, DomainError> {
        let set = RecordSet {
            accounts: self.read_collection(ACCOUNTS_FILE).await?,
            reps: self.read_collection(REPS_FILE).await?,
            deals: self.read_collection(DEALS_FILE).await?,
            activities: self.read_collection(ACTIVITIES_FILE).await?,
            targets: self.read_collection(TARGETS_FILE).await?,
        };
        let abs_dir = self.dir.canonicalize().unwrap_or_else(|_| self.dir.clone());
        info!(
            path = %abs_dir.display(),
            accounts = set.accounts.len(),
            reps = set.reps.len(),
            deals = set.deals.len(),
            activities = set.activities.len(),
            targets = set.targets.len(),
            "record snapshot loaded"
        );
        Ok(set)
    }
}
