//! Persisted copy of the last computed sync plan.
//!
//! The file is a JSON object `{"updated_at": ..., "shows": {show: [paths]}}`
//! and is always rewritten as a whole. A bare `{show: [paths]}` map is also
//! accepted when reading.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::core::planner::SyncPlan;
use crate::error::{Result, SyncError};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheRecord {
    pub updated_at: DateTime<Utc>,
    pub shows: BTreeMap<String, Vec<String>>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum CacheFile {
    Record(CacheRecord),
    Bare(BTreeMap<String, Vec<String>>),
}

/// Sole reader and writer of the cache file
pub struct CacheStore {
    path: PathBuf,
}

impl CacheStore {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Overwrite the cache with `plan`
    pub fn save(&self, plan: &SyncPlan) -> Result<CacheRecord> {
        let record = CacheRecord {
            updated_at: Utc::now(),
            shows: plan.shows.clone(),
        };

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let data = serde_json::to_vec_pretty(&record)
            .map_err(|e| SyncError::other(format!("Failed to serialize cache: {}", e)))?;

        // Write beside the target and rename so a crash never leaves half a file
        let tmp_path = self.path.with_extension("json.tmp");
        fs::write(&tmp_path, data)?;
        fs::rename(&tmp_path, &self.path)?;

        log::debug!("Wrote {} show(s) to cache {:?}", record.shows.len(), self.path);
        Ok(record)
    }

    /// Read the cache back; any read or parse failure is `CacheCorrupt`
    pub fn load(&self) -> Result<CacheRecord> {
        let data = fs::read(&self.path)
            .map_err(|e| SyncError::cache_corrupt(&self.path, e.to_string()))?;

        let file: CacheFile = serde_json::from_slice(&data)
            .map_err(|e| SyncError::cache_corrupt(&self.path, e.to_string()))?;

        Ok(match file {
            CacheFile::Record(record) => record,
            CacheFile::Bare(shows) => {
                let updated_at = fs::metadata(&self.path)
                    .and_then(|meta| meta.modified())
                    .map(DateTime::<Utc>::from)
                    .unwrap_or_else(|_| Utc::now());
                CacheRecord { updated_at, shows }
            }
        })
    }

    /// Replayable plan from the cache
    pub fn load_plan(&self) -> Result<SyncPlan> {
        Ok(SyncPlan {
            shows: self.load()?.shows,
        })
    }
}
