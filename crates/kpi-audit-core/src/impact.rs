use std::collections::BTreeMap;

use serde::Serialize;
use tracing::warn;

use crate::model::MetricRecord;

/// Recency of last decision use, matched by substring in this order.
pub const RECENCY_TABLE: &[(&str, f64)] = &[
    ("This week", 1.0),
    ("Recently", 0.9),
    ("2 weeks ago", 0.8),
    ("Last month", 0.6),
    ("Last quarter", 0.3),
    ("Never", 0.0),
    ("Unknown", 0.0),
    ("Don't know", 0.0),
];

/// Sub-score for a dashboard-visible metric, before weighting.
pub const VISIBILITY_SUBSCORE: f64 = 0.5;
/// Sub-score for an executive-requested metric, before weighting.
pub const EXECUTIVE_SUBSCORE: f64 = 0.8;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ImpactWeights {
    pub decision_making: f64,
    pub recency: f64,
    pub visibility: f64,
    pub executive_interest: f64,
}

impl Default for ImpactWeights {
    fn default() -> Self {
        Self {
            decision_making: 0.4,
            recency: 0.3,
            visibility: 0.1,
            executive_interest: 0.2,
        }
    }
}

/// Weighted components of a single impact score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ImpactBreakdown {
    pub decision_making: f64,
    pub recency: f64,
    pub visibility: f64,
    pub executive_interest: f64,
    pub total: f64,
}

#[derive(Debug, Clone, Default)]
pub struct ImpactScorer {
    weights: ImpactWeights,
}

impl ImpactScorer {
    pub fn new(weights: ImpactWeights) -> Self {
        Self { weights }
    }

    pub fn breakdown(&self, record: &MetricRecord) -> ImpactBreakdown {
        let w = &self.weights;
        let decision_making = w.decision_making * flag(record.is_used_in_decisions(), 1.0);
        let recency = w.recency * recency_subscore(&record.metric_last_used_for_decision);
        let visibility = w.visibility * flag(record.is_visible(), VISIBILITY_SUBSCORE);
        let executive_interest =
            w.executive_interest * flag(record.is_executive_requested(), EXECUTIVE_SUBSCORE);

        ImpactBreakdown {
            decision_making,
            recency,
            visibility,
            executive_interest,
            total: decision_making + recency + visibility + executive_interest,
        }
    }

    pub fn score(&self, record: &MetricRecord) -> f64 {
        self.breakdown(record).total
    }

    /// Scores in input order; unaffected by duplicate identity keys.
    pub fn score_in_order<'a, I>(&self, records: I) -> Vec<f64>
    where
        I: IntoIterator<Item = &'a MetricRecord>,
    {
        records.into_iter().map(|r| self.score(r)).collect()
    }

    /// Scores keyed by `department_metric`. A repeated key keeps the last record's score.
    pub fn score_by_identity<'a, I>(&self, records: I) -> BTreeMap<String, f64>
    where
        I: IntoIterator<Item = &'a MetricRecord>,
    {
        let mut scores = BTreeMap::new();
        for record in records {
            let key = record.identity_key();
            if scores.insert(key.clone(), self.score(record)).is_some() {
                warn!(key = %key, "duplicate metric identity, earlier impact score overwritten");
            }
        }
        scores
    }
}

fn flag(on: bool, subscore: f64) -> f64 {
    if on {
        subscore
    } else {
        0.0
    }
}

/// First table entry whose label occurs in `last_used`; 0.0 when none does.
pub fn recency_subscore(last_used: &str) -> f64 {
    RECENCY_TABLE
        .iter()
        .find(|(label, _)| last_used.contains(*label))
        .map_or(0.0, |(_, score)| *score)
}

/// Impact scores with default weights, keyed by identity.
pub fn calculate_metric_impact_scores<'a, I>(records: I) -> BTreeMap<String, f64>
where
    I: IntoIterator<Item = &'a MetricRecord>,
{
    ImpactScorer::default().score_by_identity(records)
}
