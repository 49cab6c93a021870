use serde::{Deserialize, Serialize};

use crate::rules::Assessment;

/// Literal used by the ingestion layer for missing or empty cells.
pub const UNKNOWN: &str = "Unknown";

/// Separator between department and metric name in impact-score keys.
pub const IDENTITY_SEPARATOR: char = '_';

/// One row of the KPI inventory, exactly as supplied by the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricRecord {
    #[serde(rename = "Department")]
    pub department: String,
    #[serde(rename = "Metric_Name")]
    pub metric_name: String,
    #[serde(rename = "Visible_in_Dashboard")]
    pub visible_in_dashboard: String,
    #[serde(rename = "Used_in_Decision_Making")]
    pub used_in_decision_making: String,
    #[serde(rename = "Executive_Requested")]
    pub executive_requested: String,
    #[serde(rename = "Last_Reviewed")]
    pub last_reviewed: String,
    #[serde(rename = "Metric_Last_Used_For_Decision")]
    pub metric_last_used_for_decision: String,
    #[serde(rename = "Interpretation_Notes")]
    pub interpretation_notes: String,
}

impl MetricRecord {
    pub fn identity_key(&self) -> String {
        format!(
            "{}{IDENTITY_SEPARATOR}{}",
            self.department, self.metric_name
        )
    }

    pub fn is_visible(&self) -> bool {
        self.visible_in_dashboard == "Yes"
    }

    pub fn is_used_in_decisions(&self) -> bool {
        self.used_in_decision_making == "Yes"
    }

    pub fn is_executive_requested(&self) -> bool {
        self.executive_requested == "Yes"
    }
}

/// A record together with both classifier outcomes.
///
/// Classifiers never mutate an `AuditedMetric` they were handed; they clone it
/// and replace their own assessment wholesale, so running a stage twice yields
/// the same scores as running it once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditedMetric {
    pub record: MetricRecord,
    pub vanity: Assessment,
    pub value: Assessment,
}

impl AuditedMetric {
    pub fn unclassified(record: MetricRecord) -> Self {
        Self {
            record,
            vanity: Assessment::default(),
            value: Assessment::default(),
        }
    }

    pub fn is_vanity(&self) -> bool {
        self.vanity.flagged
    }

    pub fn is_high_value(&self) -> bool {
        self.value.flagged
    }
}

impl From<MetricRecord> for AuditedMetric {
    fn from(record: MetricRecord) -> Self {
        Self::unclassified(record)
    }
}

/// Wraps raw records so they can enter the classifier chain.
pub fn unclassified(records: impl IntoIterator<Item = MetricRecord>) -> Vec<AuditedMetric> {
    records.into_iter().map(AuditedMetric::unclassified).collect()
}

/// Flat output row: the eight input columns plus the six derived ones.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditRow {
    #[serde(flatten)]
    pub record: MetricRecord,
    pub vanity_score: u32,
    pub vanity_reasons: String,
    pub is_vanity: bool,
    pub value_score: u32,
    pub value_reasons: String,
    pub is_high_value: bool,
}

impl From<&AuditedMetric> for AuditRow {
    fn from(metric: &AuditedMetric) -> Self {
        Self {
            record: metric.record.clone(),
            vanity_score: metric.vanity.score,
            vanity_reasons: metric.vanity.reasons_text(),
            is_vanity: metric.vanity.flagged,
            value_score: metric.value.score,
            value_reasons: metric.value.reasons_text(),
            is_high_value: metric.value.flagged,
        }
    }
}

impl From<AuditRow> for AuditedMetric {
    fn from(row: AuditRow) -> Self {
        Self {
            record: row.record,
            vanity: Assessment::from_parts(row.vanity_score, &row.vanity_reasons, row.is_vanity),
            value: Assessment::from_parts(row.value_score, &row.value_reasons, row.is_high_value),
        }
    }
}

#[cfg(test)]
#[allow(clippy::too_many_arguments)]
pub(crate) fn record(
    department: &str,
    metric_name: &str,
    visible: &str,
    used: &str,
    executive: &str,
    last_reviewed: &str,
    last_used: &str,
    notes: &str,
) -> MetricRecord {
    MetricRecord {
        department: department.to_string(),
        metric_name: metric_name.to_string(),
        visible_in_dashboard: visible.to_string(),
        used_in_decision_making: used.to_string(),
        executive_requested: executive.to_string(),
        last_reviewed: last_reviewed.to_string(),
        metric_last_used_for_decision: last_used.to_string(),
        interpretation_notes: notes.to_string(),
    }
}
