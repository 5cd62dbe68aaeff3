use crate::error::{Result, TriageError};
use crate::issue::Issue;
use serde::Serialize;
use std::collections::HashSet;
use std::path::Path;

// ---------------------------------------------------------------------------
// SnapshotFormat
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapshotFormat {
    Json,
    Yaml,
}

impl SnapshotFormat {
    pub fn from_path(path: &Path) -> Result<Self> {
        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Ok(SnapshotFormat::Json),
            Some("yaml") | Some("yml") => Ok(SnapshotFormat::Yaml),
            _ => Err(TriageError::UnknownFormat(path.display().to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// Snapshot
// ---------------------------------------------------------------------------

/// A malformed element of an otherwise well-formed snapshot. The element
/// is dropped from ranking; the rest of the set proceeds.
#[derive(Debug, Clone, Serialize)]
pub struct Rejected {
    pub index: usize,
    pub reason: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct Snapshot {
    pub issues: Vec<Issue>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub rejected: Vec<Rejected>,
}

// ---------------------------------------------------------------------------
// Parsing
// ---------------------------------------------------------------------------

/// Parse an issue snapshot. The top level must be a sequence — anything
/// else fails loudly. Individual elements that don't deserialize into an
/// [`Issue`], and elements reusing an earlier id, are rejected one by one
/// without aborting the rest.
pub fn parse_snapshot(data: &str, format: SnapshotFormat) -> Result<Snapshot> {
    let elements: Vec<serde_json::Value> = match format {
        SnapshotFormat::Json => {
            let value: serde_json::Value = serde_json::from_str(data)?;
            match value {
                serde_json::Value::Array(items) => items,
                other => return Err(TriageError::NotASequence(type_name(&other))),
            }
        }
        SnapshotFormat::Yaml => {
            // Normalize through JSON so both formats share one element path.
            let value: serde_json::Value = serde_yaml::from_str(data)?;
            match value {
                serde_json::Value::Array(items) => items,
                other => return Err(TriageError::NotASequence(type_name(&other))),
            }
        }
    };

    let mut snapshot = Snapshot::default();
    let mut seen: HashSet<u64> = HashSet::new();

    for (index, element) in elements.into_iter().enumerate() {
        match serde_json::from_value::<Issue>(element) {
            Ok(issue) if seen.contains(&issue.id) => {
                reject(&mut snapshot, index, format!("duplicate issue id {}", issue.id));
            }
            Ok(issue) => {
                seen.insert(issue.id);
                snapshot.issues.push(issue);
            }
            Err(e) => reject(&mut snapshot, index, e.to_string()),
        }
    }
    Ok(snapshot)
}

pub fn load_snapshot(path: &Path) -> Result<Snapshot> {
    let format = SnapshotFormat::from_path(path)?;
    let data = std::fs::read_to_string(path)?;
    parse_snapshot(&data, format)
}

fn reject(snapshot: &mut Snapshot, index: usize, reason: String) {
    tracing::warn!(index, %reason, "rejecting snapshot element");
    snapshot.rejected.push(Rejected { index, reason });
}

fn type_name(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
    .to_string()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
