use std::path::PathBuf;

use kpi_audit_core::{AuditConfig, DEFAULT_TOP_N};

use crate::app::CliError;

pub const DEFAULT_DB_PATH: &str = "./data/kpi-audit.json";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Json,
    Text,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    None,
    Json,
    Memory,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CliConfig {
    pub input: PathBuf,
    pub audit: AuditConfig,
    pub departments: Vec<String>,
    pub format: OutputFormat,
    pub backend: Backend,
    pub db_path: PathBuf,
}

impl CliConfig {
    /// Reads `KPI_AUDIT_*` variables; the first positional argument overrides
    /// `KPI_AUDIT_INPUT`.
    pub fn from_env() -> Result<Self, CliError> {
        let arg = std::env::args().nth(1);
        Self::from_vars(|name| std::env::var(name).ok(), arg)
    }

    pub fn from_vars<F>(var: F, input_arg: Option<String>) -> Result<Self, CliError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let input = input_arg
            .or_else(|| var("KPI_AUDIT_INPUT"))
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from)
            .ok_or_else(|| {
                CliError::Config("input CSV required: pass a path or set KPI_AUDIT_INPUT".into())
            })?;

        let top_n = match var("KPI_AUDIT_TOP_N") {
            Some(raw) => raw.trim().parse::<usize>().map_err(|_| {
                CliError::Config(format!("KPI_AUDIT_TOP_N must be a non-negative integer, got {raw:?}"))
            })?,
            None => DEFAULT_TOP_N,
        };

        let departments = var("KPI_AUDIT_DEPARTMENT")
            .map(|raw| {
                raw.split(',')
                    .map(str::trim)
                    .filter(|d| !d.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        let format = match var("KPI_AUDIT_FORMAT")
            .map(|v| v.trim().to_ascii_lowercase())
            .as_deref()
        {
            None | Some("json") => OutputFormat::Json,
            Some("text") => OutputFormat::Text,
            Some(other) => {
                return Err(CliError::Config(format!(
                    "KPI_AUDIT_FORMAT must be json or text, got {other:?}"
                )))
            }
        };

        let backend = match var("KPI_AUDIT_BACKEND")
            .map(|v| v.trim().to_ascii_lowercase())
            .as_deref()
        {
            None | Some("none") => Backend::None,
            Some("json") => Backend::Json,
            Some("memory") => Backend::Memory,
            Some(other) => {
                return Err(CliError::Config(format!(
                    "KPI_AUDIT_BACKEND must be none, json or memory, got {other:?}"
                )))
            }
        };

        let db_path = var("KPI_AUDIT_DB")
            .filter(|v| !v.trim().is_empty())
            .map_or_else(|| PathBuf::from(DEFAULT_DB_PATH), PathBuf::from);

        Ok(Self {
            input,
            audit: AuditConfig {
                top_n,
                ..AuditConfig::default()
            },
            departments,
            format,
            backend,
            db_path,
        })
    }
}
