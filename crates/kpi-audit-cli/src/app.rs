use std::io::{self, Write};

use kpi_audit_core::{filter_departments, AuditReport, AuditRow, AuditRunner};
use kpi_audit_ingest::{load_csv, IngestError};
use kpi_audit_storage::{AuditBackend, JsonAuditStore, MemoryAuditStore, StorageError};
use thiserror::Error;
use tracing::{info, warn};

use crate::config::{Backend, CliConfig, OutputFormat};
use crate::render::render_text;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("ingest failed: {0}")]
    Ingest(#[from] IngestError),

    #[error("storage failed: {0}")]
    Storage(#[from] StorageError),

    #[error("stored audit holds {loaded} rows after saving {saved}")]
    StoreMismatch { saved: usize, loaded: usize },

    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

#[derive(Debug)]
pub struct RunOutcome {
    pub report: AuditReport,
    /// Rows read back from the backend after saving; `None` without a backend.
    pub persisted: Option<usize>,
}

/// Ingests, classifies, optionally persists, and writes the report to `out`.
///
/// The backend always receives the whole classified inventory. The
/// department filter only narrows the report.
pub fn run<W: Write>(config: &CliConfig, out: &mut W) -> Result<RunOutcome, CliError> {
    let records = load_csv(&config.input)?;
    info!(input = %config.input.display(), rows = records.len(), "inventory loaded");

    let runner = AuditRunner::new(config.audit.clone());
    let classified = runner.classify(&records);

    let persisted = match open_backend(config)? {
        Some(mut backend) => {
            let rows: Vec<AuditRow> = classified.iter().map(AuditRow::from).collect();
            Some(persist(backend.as_mut(), &rows)?)
        }
        None => None,
    };

    let report = if config.departments.is_empty() {
        runner.report(&classified)
    } else {
        let selected = filter_departments(&classified, &config.departments);
        if selected.is_empty() {
            warn!(departments = ?config.departments, "department filter matched no metrics");
        }
        runner.report(&selected)
    };

    match config.format {
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut *out, &report)?;
            writeln!(out)?;
        }
        OutputFormat::Text => out.write_all(render_text(&report).as_bytes())?,
    }
    out.flush()?;
    Ok(RunOutcome { report, persisted })
}

/// Replaces the stored audit with `rows` and reads it back.
pub fn persist(backend: &mut dyn AuditBackend, rows: &[AuditRow]) -> Result<usize, CliError> {
    let saved = backend.replace_all(rows)?;
    let loaded = backend.load_all()?.map_or(0, |stored| stored.len());
    if loaded != saved {
        return Err(CliError::StoreMismatch { saved, loaded });
    }
    info!(saved, stats = %backend.stats(), "audit persisted");
    Ok(loaded)
}

fn open_backend(config: &CliConfig) -> Result<Option<Box<dyn AuditBackend>>, CliError> {
    let backend: Option<Box<dyn AuditBackend>> = match config.backend {
        Backend::None => None,
        Backend::Memory => Some(Box::new(MemoryAuditStore::new())),
        Backend::Json => Some(Box::new(JsonAuditStore::open(&config.db_path)?)),
    };
    Ok(backend)
}
