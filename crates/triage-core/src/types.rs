use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// IssueState
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueState {
    #[serde(alias = "OPEN")]
    Open,
    #[serde(alias = "CLOSED")]
    Closed,
}

impl IssueState {
    pub fn as_str(self) -> &'static str {
        match self {
            IssueState::Open => "open",
            IssueState::Closed => "closed",
        }
    }
}

impl fmt::Display for IssueState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for IssueState {
    type Err = crate::error::TriageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "open" => Ok(IssueState::Open),
            "closed" => Ok(IssueState::Closed),
            _ => Err(crate::error::TriageError::InvalidState(s.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// Effort
// ---------------------------------------------------------------------------

/// Rough implementation-size estimate, derived from labels such as
/// `effort:small`, `size:M`, or `size/L`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Effort {
    Small,
    Medium,
    Large,
}

impl Effort {
    pub fn as_str(self) -> &'static str {
        match self {
            Effort::Small => "small",
            Effort::Medium => "medium",
            Effort::Large => "large",
        }
    }

    /// Scan a label set for an effort marker. First match wins; labels
    /// without a recognized `effort:`/`size:` prefix are ignored.
    pub fn from_labels<S: AsRef<str>>(labels: &[S]) -> Option<Effort> {
        labels.iter().find_map(|label| {
            let label = label.as_ref().to_ascii_lowercase();
            let value = label
                .strip_prefix("effort:")
                .or_else(|| label.strip_prefix("effort/"))
                .or_else(|| label.strip_prefix("size:"))
                .or_else(|| label.strip_prefix("size/"))?;
            value.trim().parse().ok()
        })
    }
}

impl fmt::Display for Effort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Effort {
    type Err = crate::error::TriageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "small" | "s" | "xs" => Ok(Effort::Small),
            "medium" | "m" => Ok(Effort::Medium),
            "large" | "l" | "xl" => Ok(Effort::Large),
            _ => Err(crate::error::TriageError::InvalidEffort(s.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
