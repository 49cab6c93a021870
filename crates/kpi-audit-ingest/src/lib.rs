use std::fs::File;
use std::io::Read;
use std::path::Path;

use kpi_audit_core::{AuditError, ColumnIndex, MetricRecord};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Audit(#[from] AuditError),
}

/// Reads a KPI inventory. Headers and cells are trimmed and blank cells
/// become `"Unknown"`; a missing required column fails the whole read.
pub fn read_csv<R: Read>(reader: R) -> Result<Vec<MetricRecord>, IngestError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
    let index = ColumnIndex::resolve(&headers)?;

    let mut records = Vec::new();
    for row in reader.records() {
        let row = row?;
        let cells: Vec<&str> = row.iter().collect();
        records.push(index.record_from_cells(&cells));
    }
    debug!(rows = records.len(), "csv ingested");
    Ok(records)
}

pub fn load_csv(path: impl AsRef<Path>) -> Result<Vec<MetricRecord>, IngestError> {
    let file = File::open(path.as_ref())?;
    read_csv(file)
}
