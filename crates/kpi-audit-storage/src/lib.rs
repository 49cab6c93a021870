use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use kpi_audit_core::AuditRow;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// A persisted audit row with its storage id.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StoredMetric {
    pub id: String,
    #[serde(flatten)]
    pub row: AuditRow,
}

pub trait AuditBackend: Send {
    /// Clears everything stored and writes `rows` as the new audit.
    fn replace_all(&mut self, rows: &[AuditRow]) -> Result<usize, StorageError>;
    /// `None` when no audit has been stored.
    fn load_all(&self) -> Result<Option<Vec<AuditRow>>, StorageError>;
    fn stats(&self) -> serde_json::Value;
}

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("serde error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct Persisted {
    #[serde(default)]
    saved_at_ms: u64,
    metrics: Vec<StoredMetric>,
}

pub struct JsonAuditStore {
    path: PathBuf,
    persisted: Persisted,
}

impl JsonAuditStore {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StorageError> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        if !path.exists() {
            let bytes = serde_json::to_vec_pretty(&Persisted::default())?;
            fs::write(&path, bytes)?;
        }

        let bytes = fs::read(&path)?;
        let persisted: Persisted = serde_json::from_slice(&bytes)?;
        debug!(path = %path.display(), metrics = persisted.metrics.len(), "audit store opened");
        Ok(Self { path, persisted })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn stored(&self) -> &[StoredMetric] {
        &self.persisted.metrics
    }

    fn persist(&self) -> Result<(), StorageError> {
        let bytes = serde_json::to_vec_pretty(&self.persisted)?;
        fs::write(&self.path, bytes)?;
        Ok(())
    }
}

impl AuditBackend for JsonAuditStore {
    fn replace_all(&mut self, rows: &[AuditRow]) -> Result<usize, StorageError> {
        let metrics = assign_ids(rows)?;
        let previous = std::mem::replace(
            &mut self.persisted,
            Persisted {
                saved_at_ms: now_ms(),
                metrics,
            },
        );
        if let Err(err) = self.persist() {
            self.persisted = previous;
            return Err(err);
        }
        debug!(count = rows.len(), "audit persisted");
        Ok(rows.len())
    }

    fn load_all(&self) -> Result<Option<Vec<AuditRow>>, StorageError> {
        Ok(rows_of(&self.persisted.metrics))
    }

    fn stats(&self) -> serde_json::Value {
        serde_json::json!({
            "backend": "json",
            "path": self.path,
            "count": self.persisted.metrics.len(),
            "saved_at_ms": self.persisted.saved_at_ms,
        })
    }
}

#[derive(Debug, Default)]
pub struct MemoryAuditStore {
    metrics: Vec<StoredMetric>,
}

impl MemoryAuditStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl AuditBackend for MemoryAuditStore {
    fn replace_all(&mut self, rows: &[AuditRow]) -> Result<usize, StorageError> {
        self.metrics = assign_ids(rows)?;
        Ok(rows.len())
    }

    fn load_all(&self) -> Result<Option<Vec<AuditRow>>, StorageError> {
        Ok(rows_of(&self.metrics))
    }

    fn stats(&self) -> serde_json::Value {
        serde_json::json!({
            "backend": "memory",
            "count": self.metrics.len(),
        })
    }
}

fn assign_ids(rows: &[AuditRow]) -> Result<Vec<StoredMetric>, StorageError> {
    rows.iter()
        .enumerate()
        .map(|(i, row)| {
            if row.record.department.trim().is_empty() || row.record.metric_name.trim().is_empty() {
                return Err(StorageError::InvalidInput(format!(
                    "row {i}: department and metric name cannot be empty"
                )));
            }
            Ok(StoredMetric {
                id: format!("kpi-{}", i + 1),
                row: row.clone(),
            })
        })
        .collect()
}

fn rows_of(metrics: &[StoredMetric]) -> Option<Vec<AuditRow>> {
    if metrics.is_empty() {
        None
    } else {
        Some(metrics.iter().map(|m| m.row.clone()).collect())
    }
}

fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| u64::try_from(d.as_millis()).unwrap_or(u64::MAX))
        .unwrap_or(0)
}
