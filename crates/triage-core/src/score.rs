use crate::issue::Issue;
use crate::types::Effort;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Weights
// ---------------------------------------------------------------------------

/// Additive point values for each priority signal. All fields are
/// serde-defaulted so a config file can override a single weight.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Weights {
    pub p0: u32,
    pub p1: u32,
    pub p2: u32,
    pub bug: u32,
    pub security: u32,
    pub performance: u32,
    pub tech_debt: u32,
    /// Per issue this one is holding up.
    pub per_blocked: u32,
    pub revenue_keyword: u32,
    pub existing_branch: u32,
    /// Tie-break bonus for small-effort issues scoring below the cutoff.
    pub small_effort_bonus: u32,
    pub small_effort_cutoff: u32,
}

impl Default for Weights {
    fn default() -> Self {
        Self {
            p0: 100,
            p1: 50,
            p2: 25,
            bug: 30,
            security: 50,
            performance: 20,
            tech_debt: 15,
            per_blocked: 10,
            revenue_keyword: 25,
            existing_branch: 10,
            small_effort_bonus: 5,
            small_effort_cutoff: 50,
        }
    }
}

// ---------------------------------------------------------------------------
// ScoringRules
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringRules {
    pub weights: Weights,
    /// Body substrings (case-insensitive) that mark business-impact work.
    pub revenue_keywords: Vec<String>,
}

impl Default for ScoringRules {
    fn default() -> Self {
        Self {
            weights: Weights::default(),
            revenue_keywords: vec!["revenue".to_string(), "conversion".to_string()],
        }
    }
}

// ---------------------------------------------------------------------------
// ScoreBreakdown
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signal {
    pub name: String,
    pub points: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub total: u32,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub signals: Vec<Signal>,
}

impl ScoreBreakdown {
    fn add(&mut self, name: impl Into<String>, points: u32) {
        self.signals.push(Signal {
            name: name.into(),
            points,
        });
        self.total += points;
    }
}

// ---------------------------------------------------------------------------
// score
// ---------------------------------------------------------------------------

/// Deterministic weighted sum over an issue's labels, body keywords, and
/// graph position. Pure: identical inputs always produce an identical
/// breakdown. `blocking_count` is the size of the issue's "blocks" list,
/// computed by the caller from the dependency graph.
pub fn score(issue: &Issue, blocking_count: usize, rules: &ScoringRules) -> ScoreBreakdown {
    let w = &rules.weights;
    let mut breakdown = ScoreBreakdown {
        total: 0,
        signals: Vec::new(),
    };

    // Highest priority label wins; P0/P1/P2 are mutually exclusive by
    // convention but duplicates must not double-count.
    if issue.has_label("P0") {
        breakdown.add("P0", w.p0);
    } else if issue.has_label("P1") {
        breakdown.add("P1", w.p1);
    } else if issue.has_label("P2") {
        breakdown.add("P2", w.p2);
    }

    for (label, points) in [
        ("bug", w.bug),
        ("security", w.security),
        ("performance", w.performance),
        ("tech-debt", w.tech_debt),
    ] {
        if issue.has_label(label) {
            breakdown.add(label, points);
        }
    }

    if blocking_count > 0 {
        let count = u32::try_from(blocking_count).unwrap_or(u32::MAX);
        breakdown.add(
            format!("blocks {blocking_count} issue(s)"),
            w.per_blocked.saturating_mul(count),
        );
    }

    let body = issue.body.to_lowercase();
    if rules
        .revenue_keywords
        .iter()
        .any(|k| body.contains(&k.to_lowercase()))
    {
        breakdown.add("revenue keyword", w.revenue_keyword);
    }

    if issue.has_branch {
        breakdown.add("branch exists", w.existing_branch);
    }

    // Quick-win nudge: applies only when the pre-bonus score is already low.
    if breakdown.total < w.small_effort_cutoff && issue.effort() == Some(Effort::Small) {
        breakdown.add("small effort", w.small_effort_bonus);
    }

    breakdown
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
