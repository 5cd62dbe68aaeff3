use crate::output::{print_json, print_table};
use crate::source::IssueSource;
use std::path::Path;
use triage_core::graph::DepGraph;

pub fn run(_root: &Path, source: &IssueSource, json: bool) -> anyhow::Result<()> {
    let snapshot = source.load()?;
    let graph = DepGraph::build(&snapshot.issues);

    if json {
        let per_issue: Vec<serde_json::Value> = snapshot
            .issues
            .iter()
            .map(|issue| {
                serde_json::json!({
                    "id": issue.id,
                    "state": issue.state,
                    "blocked_by": graph.blockers(issue.id),
                    "blocks": graph.blocked(issue.id),
                    "can_start": graph.startable(issue.id),
                })
            })
            .collect();
        let report = serde_json::json!({
            "issues": per_issue,
            "unknown_refs": graph.unknown_refs(),
        });
        return print_json(&report);
    }

    if snapshot.issues.is_empty() {
        println!("No issues in the backlog.");
        return Ok(());
    }

    let fmt_ids = |ids: Vec<u64>| -> String {
        ids.iter()
            .map(|id| format!("#{id}"))
            .collect::<Vec<_>>()
            .join(", ")
    };

    let rows: Vec<Vec<String>> = snapshot
        .issues
        .iter()
        .map(|issue| {
            vec![
                format!("#{}", issue.id),
                issue.state.to_string(),
                fmt_ids(graph.blockers(issue.id)),
                fmt_ids(graph.blocked(issue.id)),
                if graph.startable(issue.id) { "yes" } else { "no" }.to_string(),
            ]
        })
        .collect();
    print_table(&["ISSUE", "STATE", "BLOCKED BY", "BLOCKS", "START"], &rows);

    for unknown in graph.unknown_refs() {
        println!(
            "warning: #{} references unknown issue #{}",
            unknown.from, unknown.target
        );
    }

    Ok(())
}
