use crate::output::print_json;
use crate::source::IssueSource;
use anyhow::Context;
use std::path::Path;
use triage_core::config::TriageConfig;
use triage_core::rank::{recommend_next, Recommendation};

pub fn run(root: &Path, source: &IssueSource, json: bool) -> anyhow::Result<()> {
    let config = TriageConfig::load(root).context("failed to load config")?;
    let snapshot = source.load()?;
    let recommendation = recommend_next(&snapshot.issues, &config.scoring);

    if json {
        return print_json(&recommendation);
    }

    match recommendation {
        Recommendation::Start { entry } => {
            println!(
                "Next: #{} {} (score {})",
                entry.issue.id,
                entry.issue.title,
                entry.total()
            );
            for signal in &entry.breakdown.signals {
                println!("  +{:<4} {}", signal.points, signal.name);
            }
        }
        Recommendation::AllBlocked { open_issues: 0 } => {
            println!("No open issues in the backlog.");
        }
        Recommendation::AllBlocked { open_issues } => {
            // Deliberately not an error: an unstartable backlog is a state,
            // and usually means a dependency cycle or missing blockers.
            println!(
                "{open_issues} open issue(s), none startable. Check for dependency cycles or close a blocker."
            );
        }
        Recommendation::Empty => {
            println!("Backlog is empty.");
        }
    }

    Ok(())
}
