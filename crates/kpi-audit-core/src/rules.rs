//! Data-driven scoring rules shared by the vanity and value classifiers.
//!
//! A [`Scorecard`] is an ordered list of [`Rule`]s plus a flag threshold.
//! Every rule is evaluated independently against a record and its hits are
//! summed; reasons are emitted in rule order.

use tracing::trace;

use crate::model::MetricRecord;

/// Separator used when rendering reason fragments as a single string.
pub const REASON_SEPARATOR: &str = "; ";

/// Record attribute a rule inspects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    VisibleInDashboard,
    UsedInDecisionMaking,
    ExecutiveRequested,
    LastReviewed,
    MetricLastUsedForDecision,
    InterpretationNotes,
}

impl Field {
    pub fn read(self, record: &MetricRecord) -> &str {
        match self {
            Self::VisibleInDashboard => &record.visible_in_dashboard,
            Self::UsedInDecisionMaking => &record.used_in_decision_making,
            Self::ExecutiveRequested => &record.executive_requested,
            Self::LastReviewed => &record.last_reviewed,
            Self::MetricLastUsedForDecision => &record.metric_last_used_for_decision,
            Self::InterpretationNotes => &record.interpretation_notes,
        }
    }
}

/// How a rule decides whether, and how often, it fires.
#[derive(Debug, Clone, Copy)]
pub enum Matcher {
    /// Exact, case-sensitive equality.
    Equals(Field, &'static str),
    /// Exact membership in a fixed label set.
    OneOf(Field, &'static [&'static str]),
    /// Both matchers must fire.
    Both(&'static Matcher, &'static Matcher),
    /// Case-insensitive substring; at most one hit, on the first keyword found.
    FirstKeyword(Field, &'static [&'static str]),
    /// Case-insensitive substring; one hit per keyword found.
    EachKeyword(Field, &'static [&'static str]),
}

impl Matcher {
    /// Returns the keyword (if any) behind each hit, in keyword-list order.
    fn hits(&self, record: &MetricRecord) -> Vec<Option<&'static str>> {
        match self {
            Self::Equals(field, literal) => single(field.read(record) == *literal),
            Self::OneOf(field, literals) => {
                let value = field.read(record);
                single(literals.iter().any(|l| *l == value))
            }
            Self::Both(left, right) => single(left.fires(record) && right.fires(record)),
            Self::FirstKeyword(field, keywords) => {
                let haystack = field.read(record).to_lowercase();
                keywords
                    .iter()
                    .find(|k| haystack.contains(&k.to_lowercase()))
                    .map(|k| vec![Some(*k)])
                    .unwrap_or_default()
            }
            Self::EachKeyword(field, keywords) => {
                let haystack = field.read(record).to_lowercase();
                keywords
                    .iter()
                    .filter(|k| haystack.contains(&k.to_lowercase()))
                    .map(|k| Some(*k))
                    .collect()
            }
        }
    }

    pub fn fires(&self, record: &MetricRecord) -> bool {
        !self.hits(record).is_empty()
    }
}

fn single(matched: bool) -> Vec<Option<&'static str>> {
    if matched {
        vec![None]
    } else {
        Vec::new()
    }
}

/// Reason template attached to a rule.
#[derive(Debug, Clone, Copy)]
pub enum Reason {
    Fixed(&'static str),
    /// Rendered as `"<prefix> (<keyword>)"`.
    Keyword(&'static str),
}

impl Reason {
    fn render(self, keyword: Option<&str>) -> String {
        match (self, keyword) {
            (Self::Keyword(prefix), Some(k)) => format!("{prefix} ({k})"),
            (Self::Keyword(prefix) | Self::Fixed(prefix), _) => prefix.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Rule {
    /// Stable identifier, used in logs and for lookup.
    pub name: &'static str,
    pub matcher: Matcher,
    pub points: u32,
    pub reason: Reason,
}

impl Rule {
    /// Rendered reason fragments, one per hit. Each hit is worth `points`.
    pub fn evaluate(&self, record: &MetricRecord) -> Vec<String> {
        self.matcher
            .hits(record)
            .into_iter()
            .map(|keyword| self.reason.render(keyword))
            .collect()
    }
}

/// Outcome of running a scorecard over one record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Assessment {
    pub score: u32,
    pub reasons: Vec<String>,
    pub flagged: bool,
}

impl Assessment {
    pub fn reasons_text(&self) -> String {
        self.reasons.join(REASON_SEPARATOR)
    }

    /// Rebuilds an assessment from its flat column form.
    pub fn from_parts(score: u32, reasons: &str, flagged: bool) -> Self {
        let reasons = reasons
            .split(REASON_SEPARATOR)
            .map(str::trim)
            .filter(|r| !r.is_empty())
            .map(str::to_string)
            .collect();
        Self {
            score,
            reasons,
            flagged,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Scorecard {
    pub rules: &'static [Rule],
    pub threshold: u32,
}

impl Scorecard {
    pub const fn new(rules: &'static [Rule], threshold: u32) -> Self {
        Self { rules, threshold }
    }

    pub fn rule(&self, name: &str) -> Option<&'static Rule> {
        self.rules.iter().find(|rule| rule.name == name)
    }

    /// Scores `record` from zero. Calling this repeatedly never compounds.
    pub fn assess(&self, record: &MetricRecord) -> Assessment {
        let mut out = Assessment::default();
        for rule in self.rules {
            for reason in rule.evaluate(record) {
                trace!(
                    rule = rule.name,
                    points = rule.points,
                    metric = %record.metric_name,
                    "rule fired"
                );
                out.score += rule.points;
                out.reasons.push(reason);
            }
        }
        out.flagged = out.score >= self.threshold;
        out
    }
}
