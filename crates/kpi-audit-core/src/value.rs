use tracing::debug;

use crate::model::AuditedMetric;
use crate::rules::{Field, Matcher, Reason, Rule, Scorecard};

/// Minimum value score for a metric to be flagged as high-value.
pub const HIGH_VALUE_THRESHOLD: u32 = 4;

pub const RECENT_DECISION_TERMS: &[&str] = &["recently", "this week", "2 weeks ago", "last month"];
pub const RECENT_REVIEW_TERMS: &[&str] = &["this week", "last month"];
pub const VALUE_KEYWORDS: &[&str] = &[
    "tied to real goals",
    "drives",
    "customer impact",
    "strategic",
    "revenue",
];

// Recency rules stop at the first matching term while the notes rule counts
// every keyword. Keep both behaviours; scores in the wild depend on them.
pub const VALUE_RULES: &[Rule] = &[
    Rule {
        name: "used_in_decisions",
        matcher: Matcher::Equals(Field::UsedInDecisionMaking, "Yes"),
        points: 3,
        reason: Reason::Fixed("Used in decisions"),
    },
    Rule {
        name: "recent_decision",
        matcher: Matcher::FirstKeyword(Field::MetricLastUsedForDecision, RECENT_DECISION_TERMS),
        points: 2,
        reason: Reason::Fixed("Recently used for decisions"),
    },
    Rule {
        name: "recent_review",
        matcher: Matcher::FirstKeyword(Field::LastReviewed, RECENT_REVIEW_TERMS),
        points: 1,
        reason: Reason::Fixed("Recently reviewed"),
    },
    Rule {
        name: "value_notes",
        matcher: Matcher::EachKeyword(Field::InterpretationNotes, VALUE_KEYWORDS),
        points: 2,
        reason: Reason::Keyword("Notes indicate value"),
    },
];

pub const VALUE_SCORECARD: Scorecard = Scorecard::new(VALUE_RULES, HIGH_VALUE_THRESHOLD);

/// Re-derives the value assessment of every metric, leaving vanity untouched.
pub fn identify_valuable_metrics(metrics: &[AuditedMetric]) -> Vec<AuditedMetric> {
    let out: Vec<AuditedMetric> = metrics
        .iter()
        .map(|metric| AuditedMetric {
            value: VALUE_SCORECARD.assess(&metric.record),
            ..metric.clone()
        })
        .collect();
    debug!(
        total = out.len(),
        flagged = out.iter().filter(|m| m.is_high_value()).count(),
        "value classification complete"
    );
    out
}
