use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use crate::model::AuditedMetric;
use crate::recommend::is_removal_candidate;
use crate::rules::Field;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DepartmentBreakdown {
    pub metrics: usize,
    pub visible_in_dashboard: usize,
    pub vanity: usize,
    pub high_value: usize,
    pub removal_candidates: usize,
    pub dashboard_reduction_pct: f64,
}

impl DepartmentBreakdown {
    fn add(&mut self, metric: &AuditedMetric) {
        self.metrics += 1;
        self.visible_in_dashboard += usize::from(metric.record.is_visible());
        self.vanity += usize::from(metric.is_vanity());
        self.high_value += usize::from(metric.is_high_value());
        self.removal_candidates += usize::from(is_removal_candidate(metric));
        self.dashboard_reduction_pct =
            100.0 * ratio(self.removal_candidates, self.visible_in_dashboard);
    }
}

/// Counts of one attribute against another, with row and column totals.
///
/// Labels are sorted; `counts[r][c]` belongs to `rows[r]` and `columns[c]`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Crosstab {
    pub rows: Vec<String>,
    pub columns: Vec<String>,
    pub counts: Vec<Vec<usize>>,
    pub row_totals: Vec<usize>,
    pub column_totals: Vec<usize>,
    pub total: usize,
}

impl Crosstab {
    pub fn tabulate(metrics: &[AuditedMetric], row: Field, column: Field) -> Self {
        let mut cells: BTreeMap<(&str, &str), usize> = BTreeMap::new();
        let mut rows = BTreeSet::new();
        let mut columns = BTreeSet::new();
        for metric in metrics {
            let r = row.read(&metric.record);
            let c = column.read(&metric.record);
            rows.insert(r);
            columns.insert(c);
            *cells.entry((r, c)).or_default() += 1;
        }

        let counts: Vec<Vec<usize>> = rows
            .iter()
            .map(|r| {
                columns
                    .iter()
                    .map(|c| cells.get(&(*r, *c)).copied().unwrap_or(0))
                    .collect()
            })
            .collect();
        let row_totals = counts.iter().map(|line| line.iter().sum()).collect();
        let column_totals = (0..columns.len())
            .map(|i| counts.iter().filter_map(|line| line.get(i)).sum())
            .collect();

        Self {
            rows: rows.into_iter().map(str::to_string).collect(),
            columns: columns.into_iter().map(str::to_string).collect(),
            counts,
            row_totals,
            column_totals,
            total: metrics.len(),
        }
    }

    /// Count for one cell; zero for labels that never occurred.
    pub fn count(&self, row: &str, column: &str) -> usize {
        let r = self.rows.iter().position(|l| l == row);
        let c = self.columns.iter().position(|l| l == column);
        r.zip(c)
            .and_then(|(r, c)| self.counts.get(r)?.get(c).copied())
            .unwrap_or(0)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AuditSummary {
    pub total_metrics: usize,
    pub departments: usize,
    pub visible_in_dashboard: usize,
    pub used_in_decisions: usize,
    pub vanity: usize,
    pub vanity_share: f64,
    pub high_value: usize,
    pub high_value_share: f64,
    pub removal_candidates: usize,
    /// Percentage of dashboard metrics recommended for removal.
    pub dashboard_reduction_pct: f64,
    pub by_department: BTreeMap<String, DepartmentBreakdown>,
    pub visibility_vs_decisions: Crosstab,
    pub executive_vs_decisions: Crosstab,
}

pub fn summarize(metrics: &[AuditedMetric]) -> AuditSummary {
    let mut by_department: BTreeMap<String, DepartmentBreakdown> = BTreeMap::new();
    let mut totals = DepartmentBreakdown::default();
    let mut used_in_decisions = 0;

    for metric in metrics {
        totals.add(metric);
        used_in_decisions += usize::from(metric.record.is_used_in_decisions());
        by_department
            .entry(metric.record.department.clone())
            .or_default()
            .add(metric);
    }

    AuditSummary {
        total_metrics: totals.metrics,
        departments: by_department.len(),
        visible_in_dashboard: totals.visible_in_dashboard,
        used_in_decisions,
        vanity: totals.vanity,
        vanity_share: ratio(totals.vanity, totals.metrics),
        high_value: totals.high_value,
        high_value_share: ratio(totals.high_value, totals.metrics),
        removal_candidates: totals.removal_candidates,
        dashboard_reduction_pct: totals.dashboard_reduction_pct,
        by_department,
        visibility_vs_decisions: Crosstab::tabulate(
            metrics,
            Field::VisibleInDashboard,
            Field::UsedInDecisionMaking,
        ),
        executive_vs_decisions: Crosstab::tabulate(
            metrics,
            Field::ExecutiveRequested,
            Field::UsedInDecisionMaking,
        ),
    }
}

/// Keeps metrics whose department is in `selected`, preserving input order.
pub fn filter_departments(metrics: &[AuditedMetric], selected: &[String]) -> Vec<AuditedMetric> {
    let selected: BTreeSet<&str> = selected.iter().map(String::as_str).collect();
    metrics
        .iter()
        .filter(|m| selected.contains(m.record.department.as_str()))
        .cloned()
        .collect()
}

#[allow(clippy::cast_precision_loss)]
fn ratio(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64
    }
}
