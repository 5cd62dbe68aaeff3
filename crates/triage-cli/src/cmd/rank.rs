use crate::output::{print_json, print_table};
use crate::source::IssueSource;
use anyhow::Context;
use std::path::Path;
use triage_core::config::TriageConfig;
use triage_core::rank::rank;

pub fn run(root: &Path, source: &IssueSource, json: bool) -> anyhow::Result<()> {
    let config = TriageConfig::load(root).context("failed to load config")?;
    let snapshot = source.load()?;
    let ranking = rank(&snapshot.issues, &config.scoring);

    if json {
        let report = serde_json::json!({
            "generated_at": chrono::Utc::now().to_rfc3339(),
            "entries": ranking.entries,
            "unknown_refs": ranking.unknown_refs,
            "rejected": snapshot.rejected,
        });
        return print_json(&report);
    }

    if ranking.is_empty() {
        println!("No issues in the backlog.");
        return Ok(());
    }

    let rows: Vec<Vec<String>> = ranking
        .entries
        .iter()
        .map(|e| {
            vec![
                format!("#{}", e.issue.id),
                e.total().to_string(),
                if e.can_start { "yes" } else { "no" }.to_string(),
                e.issue.state.to_string(),
                e.issue.title.clone(),
                e.blocked_by
                    .iter()
                    .map(|id| format!("#{id}"))
                    .collect::<Vec<_>>()
                    .join(", "),
            ]
        })
        .collect();
    print_table(
        &["ISSUE", "SCORE", "START", "STATE", "TITLE", "BLOCKED BY"],
        &rows,
    );

    for unknown in &ranking.unknown_refs {
        println!(
            "warning: #{} references unknown issue #{} (treated as blocking)",
            unknown.from, unknown.target
        );
    }
    if !snapshot.rejected.is_empty() {
        println!(
            "warning: {} malformed record(s) skipped",
            snapshot.rejected.len()
        );
    }

    Ok(())
}
