use crate::output::{print_json, print_table};
use crate::source::IssueSource;
use anyhow::Context;
use std::path::Path;
use triage_core::config::TriageConfig;
use triage_core::rank::rank;

pub fn run(root: &Path, source: &IssueSource, id: u64, json: bool) -> anyhow::Result<()> {
    let config = TriageConfig::load(root).context("failed to load config")?;
    let snapshot = source.load()?;
    let ranking = rank(&snapshot.issues, &config.scoring);

    let entry = ranking
        .entries
        .iter()
        .find(|e| e.issue.id == id)
        .with_context(|| format!("issue #{id} not in the loaded set"))?;

    if json {
        return print_json(entry);
    }

    println!("#{} {} [{}]", entry.issue.id, entry.issue.title, entry.issue.state);
    if !entry.issue.labels.is_empty() {
        println!("Labels:    {}", entry.issue.labels.join(", "));
    }
    println!("Startable: {}", if entry.can_start { "yes" } else { "no" });
    if !entry.blocked_by.is_empty() {
        let blockers: Vec<String> = entry.blocked_by.iter().map(|b| format!("#{b}")).collect();
        println!("Blocked by: {}", blockers.join(", "));
    }
    println!();

    let mut rows: Vec<Vec<String>> = entry
        .breakdown
        .signals
        .iter()
        .map(|s| vec![s.name.clone(), format!("+{}", s.points)])
        .collect();
    rows.push(vec!["total".to_string(), entry.total().to_string()]);
    print_table(&["SIGNAL", "POINTS"], &rows);

    Ok(())
}
