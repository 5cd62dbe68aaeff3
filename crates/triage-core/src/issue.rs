use crate::types::{Effort, IssueState};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Issue
// ---------------------------------------------------------------------------

/// One issue record as supplied by the caller (issue tracker snapshot,
/// `gh` output, or hand-written fixture). `id`, `title`, and `state` are
/// required; everything else defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Issue {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub labels: Vec<String>,
    #[serde(default)]
    pub body: String,
    pub state: IssueState,
    #[serde(default, alias = "hasBranch")]
    pub has_branch: bool,
}

impl Issue {
    pub fn new(id: u64, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            labels: Vec::new(),
            body: String::new(),
            state: IssueState::Open,
            has_branch: false,
        }
    }

    /// Case-insensitive label membership.
    pub fn has_label(&self, name: &str) -> bool {
        self.labels.iter().any(|l| l.eq_ignore_ascii_case(name))
    }

    pub fn effort(&self) -> Option<Effort> {
        Effort::from_labels(&self.labels)
    }

    pub fn is_open(&self) -> bool {
        self.state == IssueState::Open
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
