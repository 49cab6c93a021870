use tracing::debug;

use crate::model::AuditedMetric;
use crate::rules::{Field, Matcher, Reason, Rule, Scorecard};

/// Minimum vanity score for a metric to be flagged as vanity.
pub const VANITY_THRESHOLD: u32 = 3;

pub const STALE_REVIEW_LABELS: &[&str] = &["Unknown", "Last quarter", "Last year"];
pub const NEVER_USED_LABELS: &[&str] = &["Never", "Unknown", "Don't know"];
pub const VANITY_KEYWORDS: &[&str] = &["vanity", "optics", "unclear ownership", "misinterpreted"];

pub const VANITY_RULES: &[Rule] = &[
    Rule {
        name: "visible_not_used",
        matcher: Matcher::Both(
            &Matcher::Equals(Field::VisibleInDashboard, "Yes"),
            &Matcher::Equals(Field::UsedInDecisionMaking, "No"),
        ),
        points: 3,
        reason: Reason::Fixed("Visible but not used in decisions"),
    },
    Rule {
        name: "executive_not_used",
        matcher: Matcher::Both(
            &Matcher::Equals(Field::ExecutiveRequested, "Yes"),
            &Matcher::Equals(Field::UsedInDecisionMaking, "No"),
        ),
        points: 2,
        reason: Reason::Fixed("Executive requested but not used"),
    },
    Rule {
        name: "stale_review",
        matcher: Matcher::OneOf(Field::LastReviewed, STALE_REVIEW_LABELS),
        points: 1,
        reason: Reason::Fixed("Not recently reviewed"),
    },
    Rule {
        name: "never_used",
        matcher: Matcher::OneOf(Field::MetricLastUsedForDecision, NEVER_USED_LABELS),
        points: 2,
        reason: Reason::Fixed("Never or rarely used for decisions"),
    },
    Rule {
        name: "vanity_notes",
        matcher: Matcher::EachKeyword(Field::InterpretationNotes, VANITY_KEYWORDS),
        points: 2,
        reason: Reason::Keyword("Notes indicate vanity"),
    },
];

pub const VANITY_SCORECARD: Scorecard = Scorecard::new(VANITY_RULES, VANITY_THRESHOLD);

/// Re-derives the vanity assessment of every metric, leaving value untouched.
pub fn identify_vanity_metrics(metrics: &[AuditedMetric]) -> Vec<AuditedMetric> {
    let out: Vec<AuditedMetric> = metrics
        .iter()
        .map(|metric| AuditedMetric {
            vanity: VANITY_SCORECARD.assess(&metric.record),
            ..metric.clone()
        })
        .collect();
    debug!(
        total = out.len(),
        flagged = out.iter().filter(|m| m.is_vanity()).count(),
        "vanity classification complete"
    );
    out
}
