//! Validation of the tabular input handed over by ingestion.
//!
//! Column checks happen before any record is built: one bad column or cell
//! rejects the whole batch.

use serde_json::Value;

use crate::error::AuditError;
use crate::model::{MetricRecord, UNKNOWN};

pub const REQUIRED_COLUMNS: [&str; 8] = [
    "Department",
    "Metric_Name",
    "Visible_in_Dashboard",
    "Used_in_Decision_Making",
    "Executive_Requested",
    "Last_Reviewed",
    "Metric_Last_Used_For_Decision",
    "Interpretation_Notes",
];

/// Position of each required column within a header row,
/// in `REQUIRED_COLUMNS` order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnIndex([usize; 8]);

impl ColumnIndex {
    pub fn resolve<S: AsRef<str>>(headers: &[S]) -> Result<Self, AuditError> {
        let mut positions = [0usize; 8];
        for (slot, column) in positions.iter_mut().zip(REQUIRED_COLUMNS) {
            *slot = headers
                .iter()
                .position(|h| h.as_ref().trim() == column)
                .ok_or_else(|| AuditError::MissingColumn {
                    column: column.to_string(),
                })?;
        }
        Ok(Self(positions))
    }

    pub fn record_from_cells<S: AsRef<str>>(&self, cells: &[S]) -> MetricRecord {
        let [department, metric_name, visible, used, executive, reviewed, last_used, notes] =
            self.0.map(|pos| normalize_cell(cells.get(pos).map(|c| c.as_ref())));
        MetricRecord {
            department,
            metric_name,
            visible_in_dashboard: visible,
            used_in_decision_making: used,
            executive_requested: executive,
            last_reviewed: reviewed,
            metric_last_used_for_decision: last_used,
            interpretation_notes: notes,
        }
    }
}

/// Trims a cell; absent or blank cells become `"Unknown"`.
pub fn normalize_cell(cell: Option<&str>) -> String {
    match cell.map(str::trim) {
        Some(text) if !text.is_empty() => text.to_string(),
        _ => UNKNOWN.to_string(),
    }
}

/// Builds records from a header row and string rows (CSV shape).
pub fn records_from_rows<H, R, S>(headers: &[H], rows: R) -> Result<Vec<MetricRecord>, AuditError>
where
    H: AsRef<str>,
    R: IntoIterator,
    R::Item: AsRef<[S]>,
    S: AsRef<str>,
{
    let index = ColumnIndex::resolve(headers)?;
    Ok(rows
        .into_iter()
        .map(|row| index.record_from_cells(row.as_ref()))
        .collect())
}

/// Builds records from a JSON array of row objects keyed by column name.
pub fn records_from_json(table: &Value) -> Result<Vec<MetricRecord>, AuditError> {
    let rows = table.as_array().ok_or_else(|| AuditError::TypeMismatch {
        column: "*".to_string(),
        row: 0,
        detail: format!("expected an array of rows, got {}", kind(table)),
    })?;

    rows.iter()
        .enumerate()
        .map(|(i, row)| record_from_object(i, row))
        .collect()
}

fn record_from_object(row: usize, value: &Value) -> Result<MetricRecord, AuditError> {
    let object = value.as_object().ok_or_else(|| AuditError::TypeMismatch {
        column: "*".to_string(),
        row,
        detail: format!("expected an object, got {}", kind(value)),
    })?;

    let mut cells = Vec::with_capacity(REQUIRED_COLUMNS.len());
    for column in REQUIRED_COLUMNS {
        let cell = object
            .get(column)
            .ok_or_else(|| AuditError::MissingColumn {
                column: column.to_string(),
            })?;
        cells.push(coerce_cell(column, row, cell)?);
    }
    Ok(ColumnIndex([0, 1, 2, 3, 4, 5, 6, 7]).record_from_cells(&cells))
}

fn coerce_cell(column: &str, row: usize, cell: &Value) -> Result<String, AuditError> {
    let text = match cell {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::Array(_) | Value::Object(_) => {
            return Err(AuditError::TypeMismatch {
                column: column.to_string(),
                row,
                detail: format!("{} is not string-coercible", kind(cell)),
            })
        }
    };
    Ok(normalize_cell(Some(&text)))
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn resolves_shuffled_and_padded_headers() {
        let mut headers: Vec<String> = REQUIRED_COLUMNS
            .iter()
            .rev()
            .map(|c| format!(" {c} "))
            .collect();
        headers.push("Owner".to_string());
        let index = ColumnIndex::resolve(&headers).expect("resolve");
        let cells = vec![
            "notes", "never", "this week", "no", "yes", "Yes", "Name", "Dept", "owner",
        ];
        let r = index.record_from_cells(&cells);
        assert_eq!(r.department, "Dept");
        assert_eq!(r.metric_name, "Name");
        assert_eq!(r.visible_in_dashboard, "Yes");
        assert_eq!(r.interpretation_notes, "notes");
    }

    #[test]
    fn missing_column_rejects_batch() {
        let headers = &REQUIRED_COLUMNS[..7];
        let rows: Vec<Vec<String>> = Vec::new();
        let err = records_from_rows::<_, _, String>(headers, rows).expect_err("missing column");
        assert_eq!(
            err,
            AuditError::MissingColumn {
                column: "Interpretation_Notes".to_string()
            }
        );
    }

    #[test]
    fn blank_and_short_rows_become_unknown() {
        let rows = vec![vec!["Sales", "Leads", "Yes", "No", "No", "  ", "Never"]];
        let records = records_from_rows(&REQUIRED_COLUMNS[..], rows).expect("records");
        assert_eq!(records[0].last_reviewed, UNKNOWN);
        assert_eq!(records[0].interpretation_notes, UNKNOWN);
        assert_eq!(records[0].metric_last_used_for_decision, "Never");
    }

    #[test]
    fn json_rows_are_coerced() {
        let table = json!([{
            "Department": " Ops ",
            "Metric_Name": 42,
            "Visible_in_Dashboard": "Yes",
            "Used_in_Decision_Making": "No",
            "Executive_Requested": true,
            "Last_Reviewed": null,
            "Metric_Last_Used_For_Decision": "Never",
            "Interpretation_Notes": ""
        }]);
        let records = records_from_json(&table).expect("records");
        assert_eq!(records[0].department, "Ops");
        assert_eq!(records[0].metric_name, "42");
        assert_eq!(records[0].executive_requested, "true");
        assert_eq!(records[0].last_reviewed, UNKNOWN);
        assert_eq!(records[0].interpretation_notes, UNKNOWN);
    }

    #[test]
    fn json_container_cell_is_type_mismatch() {
        let table = json!([{
            "Department": "Ops",
            "Metric_Name": "Uptime",
            "Visible_in_Dashboard": ["Yes"],
            "Used_in_Decision_Making": "No",
            "Executive_Requested": "No",
            "Last_Reviewed": "This week",
            "Metric_Last_Used_For_Decision": "Never",
            "Interpretation_Notes": ""
        }]);
        let err = records_from_json(&table).expect_err("mismatch");
        assert!(matches!(
            err,
            AuditError::TypeMismatch { ref column, row: 0, .. } if column == "Visible_in_Dashboard"
        ));
    }

    #[test]
    fn json_missing_key_and_bad_shape() {
        let missing = json!([{ "Department": "Ops" }]);
        assert!(matches!(
            records_from_json(&missing),
            Err(AuditError::MissingColumn { ref column }) if column == "Metric_Name"
        ));
        assert!(matches!(
            records_from_json(&json!({"rows": []})),
            Err(AuditError::TypeMismatch { .. })
        ));
        assert!(records_from_json(&json!([])).expect("empty").is_empty());
    }
}
