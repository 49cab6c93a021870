use std::collections::BTreeMap;

use crate::model::AuditedMetric;

pub const DEFAULT_TOP_N: usize = 3;

/// Top `n` metrics per department by value score, highest first.
///
/// Ties keep their input order. Only departments that occur in `metrics`
/// appear as keys.
pub fn top_metrics_by_department(
    metrics: &[AuditedMetric],
    n: usize,
) -> BTreeMap<&str, Vec<&AuditedMetric>> {
    let mut by_department: BTreeMap<&str, Vec<&AuditedMetric>> = BTreeMap::new();
    for metric in metrics {
        by_department
            .entry(metric.record.department.as_str())
            .or_default()
            .push(metric);
    }

    for group in by_department.values_mut() {
        group.sort_by(|a, b| b.value.score.cmp(&a.value.score));
        group.truncate(n);
    }
    by_department
}

/// Dashboard-visible vanity metrics that are not also high-value,
/// highest vanity score first (stable).
pub fn metrics_to_remove(metrics: &[AuditedMetric]) -> Vec<&AuditedMetric> {
    let mut out: Vec<&AuditedMetric> = metrics
        .iter()
        .filter(|m| is_removal_candidate(m))
        .collect();
    out.sort_by(|a, b| b.vanity.score.cmp(&a.vanity.score));
    out
}

pub fn is_removal_candidate(metric: &AuditedMetric) -> bool {
    metric.is_vanity() && metric.record.is_visible() && !metric.is_high_value()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::record;
    use crate::rules::Assessment;

    fn scored(department: &str, name: &str, value: u32) -> AuditedMetric {
        let mut m = AuditedMetric::unclassified(record(
            department, name, "Yes", "Yes", "No", "", "", "",
        ));
        m.value = Assessment {
            score: value,
            reasons: Vec::new(),
            flagged: value >= 4,
        };
        m
    }

    fn vanity(name: &str, visible: &str, score: u32, high_value: bool) -> AuditedMetric {
        let mut m = AuditedMetric::unclassified(record(
            "Marketing", name, visible, "No", "No", "", "", "",
        ));
        m.vanity = Assessment {
            score,
            reasons: Vec::new(),
            flagged: score >= 3,
        };
        m.value.flagged = high_value;
        m
    }

    fn names<'a>(metrics: &[&'a AuditedMetric]) -> Vec<&'a str> {
        metrics.iter().map(|m| m.record.metric_name.as_str()).collect()
    }

    #[test]
    fn top_n_keeps_input_order_on_ties() {
        let metrics = vec![
            scored("Sales", "low", 3),
            scored("Sales", "seven_a", 7),
            scored("Sales", "bottom", 1),
            scored("Sales", "nine", 9),
            scored("Sales", "seven_b", 7),
        ];
        let top = top_metrics_by_department(&metrics, 3);
        assert_eq!(names(&top["Sales"]), vec!["nine", "seven_a", "seven_b"]);
    }

    #[test]
    fn top_n_partitions_by_department() {
        let metrics = vec![
            scored("Sales", "a", 2),
            scored("Ops", "b", 5),
            scored("Sales", "c", 4),
        ];
        let top = top_metrics_by_department(&metrics, DEFAULT_TOP_N);
        assert_eq!(top.len(), 2);
        assert_eq!(names(&top["Sales"]), vec!["c", "a"]);
        assert_eq!(names(&top["Ops"]), vec!["b"]);
        assert!(top_metrics_by_department(&[], 3).is_empty());
    }

    #[test]
    fn top_zero_keeps_departments_with_empty_lists() {
        let metrics = vec![scored("Sales", "a", 2), scored("Ops", "b", 5)];
        let top = top_metrics_by_department(&metrics, 0);
        assert_eq!(top.keys().copied().collect::<Vec<_>>(), vec!["Ops", "Sales"]);
        assert!(top.values().all(Vec::is_empty));
    }

    #[test]
    fn removal_excludes_high_value_and_hidden_metrics() {
        let metrics = vec![
            vanity("shown", "Yes", 5, false),
            vanity("rescued", "Yes", 9, true),
            vanity("hidden", "No", 8, false),
            vanity("mild", "Yes", 2, false),
            vanity("worst", "Yes", 10, false),
            vanity("tied", "Yes", 5, false),
        ];
        let out = metrics_to_remove(&metrics);
        assert_eq!(names(&out), vec!["worst", "shown", "tied"]);
        assert!(out.iter().all(|m| !m.is_high_value()));
    }
}
