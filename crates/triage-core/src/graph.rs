use crate::issue::Issue;
use crate::types::IssueState;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::OnceLock;

// ---------------------------------------------------------------------------
// Reference extraction
// ---------------------------------------------------------------------------

/// Which way a textual reference points, relative to the issue whose body
/// contains it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RefKind {
    /// "blocked by #N" / "depends on #N" / "requires #N" — this issue
    /// cannot start until N is closed.
    BlockedBy,
    /// "blocks #N" — N cannot start until this issue is closed.
    Blocks,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepRef {
    pub kind: RefKind,
    pub target: u64,
}

fn dep_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        // "blocked by" must precede "blocks" in the alternation or the
        // shorter keyword wins and inverts the edge.
        Regex::new(r"(?i)\b(blocked\s+by|blocks|depends\s+on|requires)\s+#(\d+)")
            .expect("dependency pattern is valid")
    })
}

/// Pull every dependency reference out of a free-text issue body.
/// Pure parse: no validation against the issue set happens here.
pub fn extract_refs(body: &str) -> Vec<DepRef> {
    dep_pattern()
        .captures_iter(body)
        .filter_map(|cap| {
            let target: u64 = cap[2].parse().ok()?;
            let kind = if cap[1].eq_ignore_ascii_case("blocks") {
                RefKind::Blocks
            } else {
                RefKind::BlockedBy
            };
            Some(DepRef { kind, target })
        })
        .collect()
}

// ---------------------------------------------------------------------------
// DepGraph
// ---------------------------------------------------------------------------

/// A reference whose target id is absent from the input set. Kept as a
/// flag rather than an error: per policy the referencing issue is still
/// treated as blocked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnknownRef {
    pub from: u64,
    pub target: u64,
}

/// Directed dependency graph derived from issue bodies. `blocked_by` and
/// `blocks` are kept symmetric; ordering is deterministic (BTree maps).
#[derive(Debug, Clone, Default)]
pub struct DepGraph {
    blocked_by: BTreeMap<u64, BTreeSet<u64>>,
    blocks: BTreeMap<u64, BTreeSet<u64>>,
    unknown_refs: Vec<UnknownRef>,
    states: BTreeMap<u64, IssueState>,
}

impl DepGraph {
    pub fn build(issues: &[Issue]) -> Self {
        let mut graph = DepGraph {
            states: issues.iter().map(|i| (i.id, i.state)).collect(),
            ..DepGraph::default()
        };

        for issue in issues {
            for dep in extract_refs(&issue.body) {
                if dep.target == issue.id {
                    tracing::warn!(issue = issue.id, "issue references itself, ignoring");
                    continue;
                }
                let (blocked, blocker) = match dep.kind {
                    RefKind::BlockedBy => (issue.id, dep.target),
                    RefKind::Blocks => (dep.target, issue.id),
                };
                if !graph.states.contains_key(&dep.target) {
                    tracing::warn!(
                        issue = issue.id,
                        target = dep.target,
                        "dependency reference points to an unknown issue"
                    );
                    graph.unknown_refs.push(UnknownRef {
                        from: issue.id,
                        target: dep.target,
                    });
                    // An unknown blocker still gates the known issue; an
                    // unknown *blocked* issue gates nothing we rank.
                    if dep.kind == RefKind::Blocks {
                        continue;
                    }
                }
                graph.blocked_by.entry(blocked).or_default().insert(blocker);
                graph.blocks.entry(blocker).or_default().insert(blocked);
            }
        }
        graph
    }

    /// Ids that must be closed before `id` can start.
    pub fn blockers(&self, id: u64) -> Vec<u64> {
        self.blocked_by
            .get(&id)
            .map(|s| s.iter().copied().collect())
            .unwrap_or_default()
    }

    /// Ids that cannot start until `id` is closed.
    pub fn blocked(&self, id: u64) -> Vec<u64> {
        self.blocks
            .get(&id)
            .map(|s| s.iter().copied().collect())
            .unwrap_or_default()
    }

    /// How many issues `id` is holding up — feeds the scoring formula.
    pub fn blocking_count(&self, id: u64) -> usize {
        self.blocks.get(&id).map_or(0, BTreeSet::len)
    }

    /// True iff every blocker of `id` is a known, closed issue. Unknown
    /// blockers count as unresolved. No caching: always answers against
    /// the states captured at build time.
    pub fn can_start(&self, id: u64) -> bool {
        self.blockers(id)
            .iter()
            .all(|b| self.states.get(b) == Some(&IssueState::Closed))
    }

    /// The recommendation-level gate: the issue itself is still open AND
    /// every blocker is closed. A closed issue resolves other issues'
    /// blockers but is never itself startable.
    pub fn startable(&self, id: u64) -> bool {
        self.states.get(&id) == Some(&IssueState::Open) && self.can_start(id)
    }

    pub fn unknown_refs(&self) -> &[UnknownRef] {
        &self.unknown_refs
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn issue(id: u64, body: &str, state: IssueState) -> Issue {
        Issue {
            body: body.to_string(),
            state,
            ..Issue::new(id, format!("Issue {id}"))
        }
    }

    #[test]
    fn extracts_all_keyword_forms() {
        let refs = extract_refs("Depends on #4, blocked by #5. Also Requires #6 and blocks #7.");
        assert_eq!(
            refs,
            vec![
                DepRef { kind: RefKind::BlockedBy, target: 4 },
                DepRef { kind: RefKind::BlockedBy, target: 5 },
                DepRef { kind: RefKind::BlockedBy, target: 6 },
                DepRef { kind: RefKind::Blocks, target: 7 },
            ]
        );
    }

    #[test]
    fn blocked_by_is_not_parsed_as_blocks() {
        let refs = extract_refs("blocked by #9");
        assert_eq!(refs, vec![DepRef { kind: RefKind::BlockedBy, target: 9 }]);
    }

    #[test]
    fn no_refs_in_plain_text() {
        assert!(extract_refs("Fix the login page. See PR #12 discussion.").is_empty());
    }

    #[test]
    fn blocks_edge_is_symmetric() {
        // A says "blocks #2": B is blocked by A, A blocks B.
        let issues = vec![
            issue(1, "blocks #2", IssueState::Open),
            issue(2, "", IssueState::Open),
        ];
        let graph = DepGraph::build(&issues);
        assert_eq!(graph.blockers(2), vec![1]);
        assert_eq!(graph.blocked(1), vec![2]);
        assert_eq!(graph.blocking_count(1), 1);
        assert_eq!(graph.blocking_count(2), 0);
    }

    #[test]
    fn can_start_requires_closed_blockers() {
        let issues = vec![
            issue(3, "depends on #4", IssueState::Open),
            issue(4, "", IssueState::Open),
        ];
        let graph = DepGraph::build(&issues);
        assert!(!graph.can_start(3));
        assert!(graph.can_start(4));

        let issues = vec![
            issue(3, "depends on #4", IssueState::Open),
            issue(4, "", IssueState::Closed),
        ];
        let graph = DepGraph::build(&issues);
        assert!(graph.can_start(3));
    }

    #[test]
    fn unknown_blocker_gates_the_issue() {
        let issues = vec![issue(1, "requires #99", IssueState::Open)];
        let graph = DepGraph::build(&issues);
        assert!(!graph.can_start(1));
        assert_eq!(graph.unknown_refs(), &[UnknownRef { from: 1, target: 99 }]);
    }

    #[test]
    fn unknown_blocked_issue_is_flagged_but_gates_nothing() {
        let issues = vec![issue(1, "blocks #99", IssueState::Open)];
        let graph = DepGraph::build(&issues);
        assert!(graph.can_start(1));
        assert_eq!(graph.blocking_count(1), 0);
        assert_eq!(graph.unknown_refs(), &[UnknownRef { from: 1, target: 99 }]);
    }

    #[test]
    fn self_reference_is_ignored() {
        let issues = vec![issue(1, "blocks #1", IssueState::Open)];
        let graph = DepGraph::build(&issues);
        assert!(graph.can_start(1));
        assert_eq!(graph.blocking_count(1), 0);
    }

    #[test]
    fn closed_issue_is_not_startable() {
        let issues = vec![issue(1, "", IssueState::Closed)];
        let graph = DepGraph::build(&issues);
        // Blocker resolution alone says yes; the startability gate says no.
        assert!(graph.can_start(1));
        assert!(!graph.startable(1));
    }

    #[test]
    fn open_unblocked_issue_is_startable() {
        let issues = vec![issue(1, "", IssueState::Open)];
        let graph = DepGraph::build(&issues);
        assert!(graph.startable(1));
    }

    #[test]
    fn cycle_members_never_start() {
        let issues = vec![
            issue(1, "blocked by #2", IssueState::Open),
            issue(2, "blocked by #1", IssueState::Open),
        ];
        let graph = DepGraph::build(&issues);
        assert!(!graph.can_start(1));
        assert!(!graph.can_start(2));
    }

    #[test]
    fn duplicate_references_collapse() {
        let issues = vec![
            issue(1, "depends on #2 and also depends on #2", IssueState::Open),
            issue(2, "", IssueState::Closed),
        ];
        let graph = DepGraph::build(&issues);
        assert_eq!(graph.blockers(1), vec![2]);
        assert_eq!(graph.blocking_count(2), 1);
    }
}
