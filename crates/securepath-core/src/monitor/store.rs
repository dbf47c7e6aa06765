//! Append-only per-day snapshot log.
//!
//! Layout: `<dir>/metrics-YYYY-MM-DD.json`, each file a pretty-printed JSON
//! array. Appending reads the whole array, pushes, and rewrites the file.
//! Existing entries are kept as raw JSON values so older snapshot shapes
//! survive a rewrite untouched.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde_json::Value;

use crate::error::{Result, SecurePathError};

use super::snapshot::MetricsSnapshot;

#[derive(Debug, Clone)]
pub struct MetricsStore {
    dir: PathBuf,
}

impl MetricsStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, day: NaiveDate) -> PathBuf {
        self.dir.join(format!("metrics-{}.json", day.format("%Y-%m-%d")))
    }

    /// Entries stored for `day`. A missing, unreadable, or malformed file
    /// reads as an empty sequence.
    pub fn load(&self, day: NaiveDate) -> Vec<Value> {
        let path = self.path_for(day);
        let raw = match fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Vec::new(),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "metrics file unreadable; starting a new sequence");
                return Vec::new();
            }
        };

        match serde_json::from_str::<Vec<Value>>(&raw) {
            Ok(entries) => entries,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "metrics file malformed; starting a new sequence");
                Vec::new()
            }
        }
    }

    /// Append `snapshot` to the file for `day`, creating the directory on demand.
    /// Returns the number of entries now in the file.
    pub fn append(&self, day: NaiveDate, snapshot: &MetricsSnapshot) -> Result<usize> {
        fs::create_dir_all(&self.dir).map_err(|e| SecurePathError::io(&self.dir, e))?;

        let mut entries = self.load(day);
        entries.push(serde_json::to_value(snapshot)?);

        let body = serde_json::to_string_pretty(&entries)?;
        let path = self.path_for(day);
        fs::write(&path, body).map_err(|e| SecurePathError::io(&path, e))?;

        Ok(entries.len())
    }
}
