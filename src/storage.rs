//! Storage adapter for tickit
//!
//! The task list is mirrored as a single JSON array stored under one key in a
//! key-value backend. Two backends are provided:
//!
//! ```text
//! FileKv     <store dir>/<key>.json        # durable, atomic replace + fs2 lock
//!            <store dir>/<key>.json.lock
//! MemoryKv   in-process map                # tests; optional quota / outage
//! ```
//!
//! Loading is forgiving: a missing key, unreadable value or malformed payload
//! yields an empty list, and individual malformed entries are dropped. The
//! in-memory store stays authoritative whatever happens here.

use std::collections::HashMap;
use std::path::PathBuf;

use chrono::{DateTime, NaiveDate, Utc};
use serde_json::Value;

use crate::error::{Error, Result};
use crate::lock::{self, DEFAULT_LOCK_TIMEOUT_MS};
use crate::task::{parse_due_time, TaskRecord, DATE_FORMAT};

/// Key the task list is stored under
pub const DEFAULT_STORAGE_KEY: &str = "todoTasks";

/// Minimal key-value backend
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
    fn remove(&mut self, key: &str) -> Result<()>;
}

// =========================================================================
// File backend
// =========================================================================

/// One `<key>.json` file per key inside a directory
#[derive(Debug, Clone)]
pub struct FileKv {
    dir: PathBuf,
    lock_timeout_ms: u64,
}

impl FileKv {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            lock_timeout_ms: DEFAULT_LOCK_TIMEOUT_MS,
        }
    }

    pub fn with_lock_timeout(mut self, timeout_ms: u64) -> Self {
        self.lock_timeout_ms = timeout_ms;
        self
    }

    /// Path of the file backing `key`
    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl KeyValueStore for FileKv {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key);
        match lock::read_locked(&path, self.lock_timeout_ms)? {
            Some(bytes) => String::from_utf8(bytes).map(Some).map_err(|err| {
                Error::OperationFailed(format!("invalid UTF-8 in {}: {err}", path.display()))
            }),
            None => Ok(None),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        lock::write_atomic_locked(self.path_for(key), value.as_bytes(), self.lock_timeout_ms)
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        lock::remove_locked(self.path_for(key), self.lock_timeout_ms)
    }
}

// =========================================================================
// Memory backend
// =========================================================================

/// In-memory backend with an optional byte quota
#[derive(Debug, Clone, Default)]
pub struct MemoryKv {
    entries: HashMap<String, String>,
    quota: Option<usize>,
    unavailable: bool,
}

impl MemoryKv {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject writes that would push the total stored bytes past `limit`
    pub fn with_quota(limit: usize) -> Self {
        Self {
            quota: Some(limit),
            ..Self::default()
        }
    }

    /// Backend whose every access fails, like storage disabled by the host
    pub fn unavailable() -> Self {
        Self {
            unavailable: true,
            ..Self::default()
        }
    }

    pub fn set_unavailable(&mut self, unavailable: bool) {
        self.unavailable = unavailable;
    }

    pub fn raw(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    fn check_available(&self) -> Result<()> {
        if self.unavailable {
            return Err(Error::StorageUnavailable("memory store disabled".to_string()));
        }
        Ok(())
    }

    fn used_bytes_excluding(&self, key: &str) -> usize {
        self.entries
            .iter()
            .filter(|(existing, _)| existing.as_str() != key)
            .map(|(existing, value)| existing.len() + value.len())
            .sum()
    }
}

impl KeyValueStore for MemoryKv {
    fn get(&self, key: &str) -> Result<Option<String>> {
        self.check_available()?;
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.check_available()?;
        if let Some(limit) = self.quota {
            let size = self.used_bytes_excluding(key) + key.len() + value.len();
            if size > limit {
                return Err(Error::QuotaExceeded {
                    key: key.to_string(),
                    size,
                    limit,
                });
            }
        }
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.check_available()?;
        self.entries.remove(key);
        Ok(())
    }
}

// =========================================================================
// Task list adapter
// =========================================================================

/// Outcome of loading the task list, with what had to be thrown away
#[derive(Debug, Clone, Default, serde::Serialize)]
pub struct LoadReport {
    pub tasks: Vec<TaskRecord>,
    /// Entries dropped for lacking a valid id, text or completed flag
    pub discarded: usize,
    /// Set when the stored value was unusable and the list was reset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reset_reason: Option<String>,
}

impl LoadReport {
    fn reset(reason: String) -> Self {
        tracing::warn!(%reason, "stored task list unusable, starting empty");
        Self {
            tasks: Vec::new(),
            discarded: 0,
            reset_reason: Some(reason),
        }
    }

    /// Human-readable warnings for anything lost while loading
    pub fn warnings(&self) -> Vec<String> {
        let mut warnings = Vec::new();
        if let Some(reason) = &self.reset_reason {
            warnings.push(format!("stored tasks were reset: {reason}"));
        }
        if self.discarded > 0 {
            warnings.push(format!(
                "discarded {} malformed task entr{}",
                self.discarded,
                if self.discarded == 1 { "y" } else { "ies" }
            ));
        }
        warnings
    }
}

/// Serializes the task list to and from a key-value backend
#[derive(Debug, Clone)]
pub struct TaskStorage<K> {
    backend: K,
    key: String,
}

impl<K: KeyValueStore> TaskStorage<K> {
    pub fn new(backend: K) -> Self {
        Self::with_key(backend, DEFAULT_STORAGE_KEY)
    }

    pub fn with_key(backend: K, key: impl Into<String>) -> Self {
        Self {
            backend,
            key: key.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn backend(&self) -> &K {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut K {
        &mut self.backend
    }

    /// Write the full list under the storage key
    pub fn save(&mut self, tasks: &[TaskRecord]) -> Result<()> {
        let json = serde_json::to_string(tasks)?;
        self.backend.set(&self.key, &json)?;
        tracing::debug!(key = %self.key, count = tasks.len(), "saved tasks");
        Ok(())
    }

    /// Load the list, never failing
    pub fn load(&self) -> Vec<TaskRecord> {
        self.load_report().tasks
    }

    pub fn load_report(&self) -> LoadReport {
        let raw = match self.backend.get(&self.key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return LoadReport::default(),
            Err(err) => return LoadReport::reset(format!("read failed: {err}")),
        };
        let report = parse_task_list(&raw, Utc::now());
        tracing::debug!(
            key = %self.key,
            count = report.tasks.len(),
            discarded = report.discarded,
            "loaded tasks"
        );
        report
    }
}

/// Parse a stored payload, migrating entries written by older versions.
///
/// `now` back-fills a missing `createdAt`.
pub fn parse_task_list(raw: &str, now: DateTime<Utc>) -> LoadReport {
    let value: Value = match serde_json::from_str(raw) {
        Ok(value) => value,
        Err(err) => return LoadReport::reset(format!("malformed JSON: {err}")),
    };
    let Value::Array(entries) = value else {
        return LoadReport::reset("payload is not an array".to_string());
    };

    let mut report = LoadReport::default();
    for entry in &entries {
        match parse_entry(entry, now) {
            Some(task) => report.tasks.push(task),
            None => report.discarded += 1,
        }
    }
    if report.discarded > 0 {
        tracing::warn!(discarded = report.discarded, "dropped malformed task entries");
    }
    report
}

fn parse_entry(entry: &Value, now: DateTime<Utc>) -> Option<TaskRecord> {
    let object = entry.as_object()?;
    let id = object.get("id")?.as_str()?;
    let text = object.get("text")?.as_str()?;
    let completed = object.get("completed")?.as_bool()?;

    let created_at = object
        .get("createdAt")
        .and_then(Value::as_str)
        .and_then(|raw| DateTime::parse_from_rfc3339(raw).ok())
        .map(|parsed| parsed.with_timezone(&Utc))
        .unwrap_or(now);
    let due_date = non_empty_str(object.get("dueDate"))
        .and_then(|raw| NaiveDate::parse_from_str(raw, DATE_FORMAT).ok());
    let due_time = non_empty_str(object.get("dueTime")).and_then(|raw| parse_due_time(raw).ok());

    Some(TaskRecord {
        id: id.to_string(),
        text: text.to_string(),
        completed,
        created_at,
        due_date,
        due_time,
    })
}

fn non_empty_str(value: Option<&Value>) -> Option<&str> {
    value
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|raw| !raw.is_empty())
}
