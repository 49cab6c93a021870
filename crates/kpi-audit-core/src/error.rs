use thiserror::Error;

/// Batch-level failures. Any of these aborts the whole audit run.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuditError {
    #[error("input table is missing required column `{column}`")]
    MissingColumn { column: String },

    #[error("column `{column}` in row {row} is not string-coercible: {detail}")]
    TypeMismatch {
        column: String,
        row: usize,
        detail: String,
    },
}
