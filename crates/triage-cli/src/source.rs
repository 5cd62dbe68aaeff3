use anyhow::Context;
use serde::Deserialize;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::Command;
use triage_core::ingest::{self, Snapshot, SnapshotFormat};
use triage_core::issue::Issue;
use triage_core::types::IssueState;

// ---------------------------------------------------------------------------
// IssueSource
// ---------------------------------------------------------------------------

/// Where the issue set comes from. The core never fetches anything; all
/// I/O and process spawning stays here.
pub enum IssueSource {
    File(PathBuf),
    Stdin,
    Gh,
    Unset,
}

impl IssueSource {
    pub fn from_args(input: Option<&Path>, gh: bool) -> Self {
        match (input, gh) {
            (_, true) => IssueSource::Gh,
            (Some(p), _) if p.as_os_str() == "-" => IssueSource::Stdin,
            (Some(p), _) => IssueSource::File(p.to_path_buf()),
            (None, false) => IssueSource::Unset,
        }
    }

    pub fn load(&self) -> anyhow::Result<Snapshot> {
        match self {
            IssueSource::File(path) => ingest::load_snapshot(path)
                .with_context(|| format!("failed to load snapshot '{}'", path.display())),
            IssueSource::Stdin => {
                let mut data = String::new();
                std::io::stdin()
                    .read_to_string(&mut data)
                    .context("failed to read stdin")?;
                ingest::parse_snapshot(&data, SnapshotFormat::Json)
                    .context("failed to parse stdin as a JSON issue array")
            }
            IssueSource::Gh => fetch_from_gh(),
            IssueSource::Unset => {
                anyhow::bail!("no issue source: pass --input <file> or --gh")
            }
        }
    }
}

// ---------------------------------------------------------------------------
// gh fetch
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
struct GhIssue {
    number: u64,
    title: String,
    #[serde(default)]
    labels: Vec<GhLabel>,
    #[serde(default)]
    body: String,
    state: IssueState,
}

#[derive(Deserialize)]
struct GhLabel {
    name: String,
}

fn fetch_from_gh() -> anyhow::Result<Snapshot> {
    which::which("gh").context("gh not found on PATH (https://cli.github.com)")?;

    let started = chrono::Utc::now();
    let output = Command::new("gh")
        .args([
            "issue",
            "list",
            "--state",
            "all",
            "--limit",
            "500",
            "--json",
            "number,title,labels,body,state",
        ])
        .output()
        .context("failed to run gh")?;

    if !output.status.success() {
        anyhow::bail!(
            "gh issue list failed: {}",
            String::from_utf8_lossy(&output.stderr).trim()
        );
    }

    let fetched: Vec<GhIssue> =
        serde_json::from_slice(&output.stdout).context("failed to parse gh output")?;
    tracing::debug!(
        count = fetched.len(),
        elapsed_ms = (chrono::Utc::now() - started).num_milliseconds(),
        "fetched issues from gh"
    );

    let branches = local_branches();
    let issues = fetched
        .into_iter()
        .map(|gh| Issue {
            id: gh.number,
            title: gh.title,
            labels: gh.labels.into_iter().map(|l| l.name).collect(),
            body: gh.body,
            state: gh.state,
            has_branch: branch_exists(&branches, gh.number),
        })
        .collect();

    Ok(Snapshot {
        issues,
        rejected: Vec::new(),
    })
}

// ---------------------------------------------------------------------------
// Branch lookup
// ---------------------------------------------------------------------------

fn local_branches() -> Vec<String> {
    let output = Command::new("git")
        .args(["branch", "--list", "--all", "--format=%(refname:short)"])
        .output();
    match output {
        Ok(out) if out.status.success() => String::from_utf8_lossy(&out.stdout)
            .lines()
            .map(|l| l.trim().to_string())
            .filter(|l| !l.is_empty())
            .collect(),
        _ => {
            tracing::warn!("git branch listing unavailable, assuming no branches exist");
            Vec::new()
        }
    }
}

/// Branch naming conventions that tie a branch to an issue: `123-slug`,
/// `feature/123-slug`, or anything containing `issue-123`.
fn branch_exists(branches: &[String], id: u64) -> bool {
    let dash = format!("{id}-");
    let slash_dash = format!("/{id}-");
    let issue_ref = format!("issue-{id}");
    branches.iter().any(|b| {
        b.starts_with(&dash) || b.contains(&slash_dash) || b.contains(&issue_ref)
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
