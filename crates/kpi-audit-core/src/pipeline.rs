use std::collections::BTreeMap;

use serde::Serialize;
use tracing::{debug, info};

use crate::impact::{ImpactScorer, ImpactWeights};
use crate::model::{unclassified, AuditRow, AuditedMetric, MetricRecord};
use crate::recommend::{metrics_to_remove, top_metrics_by_department, DEFAULT_TOP_N};
use crate::summary::{summarize, AuditSummary};
use crate::value::identify_valuable_metrics;
use crate::vanity::identify_vanity_metrics;

#[derive(Debug, Clone, PartialEq)]
pub struct AuditConfig {
    pub top_n: usize,
    pub weights: ImpactWeights,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            top_n: DEFAULT_TOP_N,
            weights: ImpactWeights::default(),
        }
    }
}

/// Everything one batch run produces.
#[derive(Debug, Clone, Serialize)]
pub struct AuditReport {
    pub metrics: Vec<AuditRow>,
    pub impact_scores: BTreeMap<String, f64>,
    pub top_metrics: BTreeMap<String, Vec<AuditRow>>,
    pub removal_candidates: Vec<AuditRow>,
    pub summary: AuditSummary,
}

pub struct AuditRunner {
    config: AuditConfig,
}

impl AuditRunner {
    pub fn new(config: AuditConfig) -> Self {
        Self { config }
    }

    /// Classifies raw records from scratch.
    pub fn classify(&self, records: &[MetricRecord]) -> Vec<AuditedMetric> {
        let raw = unclassified(records.iter().cloned());
        identify_valuable_metrics(&identify_vanity_metrics(&raw))
    }

    pub fn run(&self, records: &[MetricRecord]) -> AuditReport {
        let classified = self.classify(records);
        self.report(&classified)
    }

    /// Derives the read-only views over an already classified set.
    pub fn report(&self, classified: &[AuditedMetric]) -> AuditReport {
        let scorer = ImpactScorer::new(self.config.weights);
        let impact_scores = scorer.score_by_identity(classified.iter().map(|m| &m.record));

        let top_metrics: BTreeMap<String, Vec<AuditRow>> =
            top_metrics_by_department(classified, self.config.top_n)
                .into_iter()
                .map(|(department, metrics)| {
                    (
                        department.to_string(),
                        metrics.into_iter().map(AuditRow::from).collect(),
                    )
                })
                .collect();
        debug!(
            departments = top_metrics.len(),
            top_n = self.config.top_n,
            "top metrics selected"
        );

        let removal_candidates: Vec<AuditRow> = metrics_to_remove(classified)
            .into_iter()
            .map(AuditRow::from)
            .collect();

        let summary = summarize(classified);
        info!(
            metrics = summary.total_metrics,
            vanity = summary.vanity,
            high_value = summary.high_value,
            removal_candidates = summary.removal_candidates,
            "audit complete"
        );

        AuditReport {
            metrics: classified.iter().map(AuditRow::from).collect(),
            impact_scores,
            top_metrics,
            removal_candidates,
            summary,
        }
    }
}

pub fn run_audit(records: &[MetricRecord], config: &AuditConfig) -> AuditReport {
    AuditRunner::new(config.clone()).run(records)
}
