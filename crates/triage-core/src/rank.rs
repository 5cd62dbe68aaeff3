use crate::graph::{DepGraph, UnknownRef};
use crate::issue::Issue;
use crate::score::{score, ScoreBreakdown, ScoringRules};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// RankedIssue / Ranking
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedIssue {
    #[serde(flatten)]
    pub issue: Issue,
    pub breakdown: ScoreBreakdown,
    pub can_start: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub blocked_by: Vec<u64>,
}

impl RankedIssue {
    pub fn total(&self) -> u32 {
        self.breakdown.total
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Ranking {
    pub entries: Vec<RankedIssue>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub unknown_refs: Vec<UnknownRef>,
}

impl Ranking {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn startable(&self) -> impl Iterator<Item = &RankedIssue> {
        self.entries.iter().filter(|e| e.can_start)
    }
}

// ---------------------------------------------------------------------------
// rank
// ---------------------------------------------------------------------------

/// Score and order an issue set. Every input issue appears exactly once in
/// the result, sorted descending by score; the sort is stable so equal
/// scores keep their input order.
pub fn rank(issues: &[Issue], rules: &ScoringRules) -> Ranking {
    let graph = DepGraph::build(issues);

    let mut entries: Vec<RankedIssue> = issues
        .iter()
        .map(|issue| RankedIssue {
            breakdown: score(issue, graph.blocking_count(issue.id), rules),
            can_start: graph.startable(issue.id),
            blocked_by: graph.blockers(issue.id),
            issue: issue.clone(),
        })
        .collect();

    entries.sort_by(|a, b| b.total().cmp(&a.total()));

    Ranking {
        entries,
        unknown_refs: graph.unknown_refs().to_vec(),
    }
}

// ---------------------------------------------------------------------------
// recommend_next
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Recommendation {
    /// Highest-scored issue whose blockers are all closed.
    Start {
        #[serde(flatten)]
        entry: Box<RankedIssue>,
    },
    /// Issues exist but none can start — a dependency cycle or a fully
    /// blocked backlog. Distinct from an empty backlog on purpose.
    AllBlocked { open_issues: usize },
    Empty,
}

pub fn recommend_next(issues: &[Issue], rules: &ScoringRules) -> Recommendation {
    let ranking = rank(issues, rules);
    recommend_from(&ranking)
}

/// Same as [`recommend_next`] but reuses a ranking the caller already built.
pub fn recommend_from(ranking: &Ranking) -> Recommendation {
    if ranking.is_empty() {
        return Recommendation::Empty;
    }
    match ranking.startable().next() {
        Some(entry) => Recommendation::Start {
            entry: Box::new(entry.clone()),
        },
        None => Recommendation::AllBlocked {
            open_issues: ranking
                .entries
                .iter()
                .filter(|e| e.issue.is_open())
                .count(),
        },
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
