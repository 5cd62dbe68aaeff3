use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn triage(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("triage").unwrap();
    cmd.current_dir(dir.path()).env("TRIAGE_ROOT", dir.path());
    cmd
}

fn write_snapshot(dir: &TempDir, name: &str, content: &str) -> String {
    let path = dir.path().join(name);
    std::fs::write(&path, content).unwrap();
    path.display().to_string()
}

// ---------------------------------------------------------------------------
// triage rank
// ---------------------------------------------------------------------------

#[test]
fn rank_orders_by_score() {
    let dir = TempDir::new().unwrap();
    let input = write_snapshot(
        &dir,
        "issues.json",
        r#"[
            {"id": 2, "title": "Tidy config", "labels": ["P2"], "state": "open", "has_branch": true},
            {"id": 1, "title": "Auth bypass", "labels": ["P0", "security"], "state": "open"}
        ]"#,
    );

    let output = triage(&dir)
        .args(["rank", "--input", &input])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let stdout = String::from_utf8(output).unwrap();
    let pos_1 = stdout.find("#1").expect("issue 1 in output");
    let pos_2 = stdout.find("#2").expect("issue 2 in output");
    assert!(pos_1 < pos_2, "150-point issue should rank above 35");
    assert!(stdout.contains("150"));
    assert!(stdout.contains("35"));
}

#[test]
fn rank_json_has_entries_and_timestamps() {
    let dir = TempDir::new().unwrap();
    let input = write_snapshot(
        &dir,
        "issues.json",
        r#"[{"id": 1, "title": "A", "labels": ["bug"], "state": "open"}]"#,
    );

    let output = triage(&dir)
        .args(["rank", "--input", &input, "--json"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let report: serde_json::Value = serde_json::from_slice(&output).unwrap();
    assert!(report["generated_at"].is_string());
    assert_eq!(report["entries"][0]["id"], 1);
    assert_eq!(report["entries"][0]["breakdown"]["total"], 30);
    assert_eq!(report["entries"][0]["can_start"], true);
}

#[test]
fn rank_empty_backlog() {
    let dir = TempDir::new().unwrap();
    let input = write_snapshot(&dir, "issues.json", "[]");

    triage(&dir)
        .args(["rank", "--input", &input])
        .assert()
        .success()
        .stdout(predicate::str::contains("No issues"));
}

#[test]
fn rank_skips_malformed_records() {
    let dir = TempDir::new().unwrap();
    let input = write_snapshot(
        &dir,
        "issues.json",
        r#"[
            {"id": 1, "title": "A", "state": "open"},
            {"title": "no id", "state": "open"}
        ]"#,
    );

    triage(&dir)
        .args(["rank", "--input", &input])
        .assert()
        .success()
        .stdout(predicate::str::contains("1 malformed record(s) skipped"));
}

#[test]
fn rank_flags_unknown_references() {
    let dir = TempDir::new().unwrap();
    let input = write_snapshot(
        &dir,
        "issues.json",
        r#"[{"id": 1, "title": "A", "body": "requires #99", "state": "open"}]"#,
    );

    triage(&dir)
        .args(["rank", "--input", &input])
        .assert()
        .success()
        .stdout(predicate::str::contains("unknown issue #99"));
}

#[test]
fn rank_rejects_non_array_input() {
    let dir = TempDir::new().unwrap();
    let input = write_snapshot(&dir, "issues.json", r#"{"id": 1}"#);

    triage(&dir)
        .args(["rank", "--input", &input])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not a sequence"));
}

#[test]
fn rank_reads_yaml_snapshots() {
    let dir = TempDir::new().unwrap();
    let input = write_snapshot(
        &dir,
        "issues.yaml",
        "- id: 1\n  title: A\n  state: open\n  labels: [P1]\n",
    );

    triage(&dir)
        .args(["rank", "--input", &input])
        .assert()
        .success()
        .stdout(predicate::str::contains("50"));
}

#[test]
fn rank_reads_stdin() {
    let dir = TempDir::new().unwrap();

    triage(&dir)
        .args(["rank", "--input", "-"])
        .write_stdin(r#"[{"id": 8, "title": "From stdin", "state": "open"}]"#)
        .assert()
        .success()
        .stdout(predicate::str::contains("From stdin"));
}

#[test]
fn missing_source_is_an_error() {
    let dir = TempDir::new().unwrap();

    triage(&dir)
        .arg("rank")
        .assert()
        .failure()
        .stderr(predicate::str::contains("no issue source"));
}

// ---------------------------------------------------------------------------
// triage next
// ---------------------------------------------------------------------------

#[test]
fn next_skips_blocked_issue() {
    let dir = TempDir::new().unwrap();
    let input = write_snapshot(
        &dir,
        "issues.json",
        r#"[
            {"id": 3, "title": "Blocked work", "labels": ["P1"], "body": "depends on #4", "state": "open"},
            {"id": 4, "title": "Foundation", "labels": ["P0"], "state": "open"}
        ]"#,
    );

    triage(&dir)
        .args(["next", "--input", &input])
        .assert()
        .success()
        .stdout(predicate::str::contains("Next: #4 Foundation (score 110)"));
}

#[test]
fn next_reports_cycle_as_all_blocked() {
    let dir = TempDir::new().unwrap();
    let input = write_snapshot(
        &dir,
        "issues.json",
        r#"[
            {"id": 1, "title": "A", "body": "blocked by #2", "state": "open"},
            {"id": 2, "title": "B", "body": "blocked by #1", "state": "open"}
        ]"#,
    );

    triage(&dir)
        .args(["next", "--input", &input])
        .assert()
        .success()
        .stdout(predicate::str::contains("2 open issue(s), none startable"));
}

#[test]
fn next_never_recommends_closed_work() {
    let dir = TempDir::new().unwrap();
    let input = write_snapshot(
        &dir,
        "issues.json",
        r#"[
            {"id": 10, "title": "Already shipped", "labels": ["P0", "security"], "state": "closed"},
            {"id": 11, "title": "Still open", "state": "open"}
        ]"#,
    );

    triage(&dir)
        .args(["next", "--input", &input])
        .assert()
        .success()
        .stdout(predicate::str::contains("Next: #11 Still open"));
}

#[test]
fn next_on_fully_closed_backlog() {
    let dir = TempDir::new().unwrap();
    let input = write_snapshot(
        &dir,
        "issues.json",
        r#"[{"id": 1, "title": "Done", "labels": ["P0"], "state": "closed"}]"#,
    );

    triage(&dir)
        .args(["next", "--input", &input])
        .assert()
        .success()
        .stdout(predicate::str::contains("No open issues in the backlog."));
}

#[test]
fn rank_marks_closed_issues_unstartable() {
    let dir = TempDir::new().unwrap();
    let input = write_snapshot(
        &dir,
        "issues.json",
        r#"[{"id": 1, "title": "Done", "labels": ["P0"], "state": "closed"}]"#,
    );

    let out = triage(&dir)
        .args(["rank", "--input", &input, "--json"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let report: serde_json::Value = serde_json::from_slice(&out).unwrap();
    assert_eq!(report["entries"][0]["can_start"], false);
}

#[test]
fn next_distinguishes_empty_backlog() {
    let dir = TempDir::new().unwrap();
    let input = write_snapshot(&dir, "issues.json", "[]");

    triage(&dir)
        .args(["next", "--input", &input])
        .assert()
        .success()
        .stdout(predicate::str::contains("Backlog is empty."));
}

#[test]
fn next_json_statuses() {
    let dir = TempDir::new().unwrap();
    let empty = write_snapshot(&dir, "empty.json", "[]");
    let cycle = write_snapshot(
        &dir,
        "cycle.json",
        r#"[
            {"id": 1, "title": "A", "body": "blocked by #2", "state": "open"},
            {"id": 2, "title": "B", "body": "blocked by #1", "state": "open"}
        ]"#,
    );

    let out = triage(&dir)
        .args(["next", "--input", &empty, "--json"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
    assert_eq!(value["status"], "empty");

    let out = triage(&dir)
        .args(["next", "--input", &cycle, "--json"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
    assert_eq!(value["status"], "all_blocked");
    assert_eq!(value["open_issues"], 2);
}

// ---------------------------------------------------------------------------
// triage explain
// ---------------------------------------------------------------------------

#[test]
fn explain_breaks_down_signals() {
    let dir = TempDir::new().unwrap();
    let input = write_snapshot(
        &dir,
        "issues.json",
        r#"[
            {"id": 1, "title": "Checkout bug", "labels": ["P0", "security"],
             "body": "Hurts conversion badly", "state": "open"}
        ]"#,
    );

    triage(&dir)
        .args(["explain", "1", "--input", &input])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("P0")
                .and(predicate::str::contains("security"))
                .and(predicate::str::contains("revenue keyword"))
                .and(predicate::str::contains("175")),
        );
}

#[test]
fn explain_unknown_id_fails() {
    let dir = TempDir::new().unwrap();
    let input = write_snapshot(
        &dir,
        "issues.json",
        r#"[{"id": 1, "title": "A", "state": "open"}]"#,
    );

    triage(&dir)
        .args(["explain", "42", "--input", &input])
        .assert()
        .failure()
        .stderr(predicate::str::contains("issue #42 not in the loaded set"));
}

// ---------------------------------------------------------------------------
// triage deps
// ---------------------------------------------------------------------------

#[test]
fn deps_shows_symmetric_edges() {
    let dir = TempDir::new().unwrap();
    let input = write_snapshot(
        &dir,
        "issues.json",
        r#"[
            {"id": 1, "title": "A", "body": "blocks #2", "state": "open"},
            {"id": 2, "title": "B", "state": "open"}
        ]"#,
    );

    let out = triage(&dir)
        .args(["deps", "--input", &input, "--json"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let report: serde_json::Value = serde_json::from_slice(&out).unwrap();
    assert_eq!(report["issues"][0]["blocks"][0], 2);
    assert_eq!(report["issues"][1]["blocked_by"][0], 1);
    assert_eq!(report["issues"][0]["can_start"], true);
    assert_eq!(report["issues"][1]["can_start"], false);
}

// ---------------------------------------------------------------------------
// config overrides
// ---------------------------------------------------------------------------

#[test]
fn config_weight_override_applies() {
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join(".triage.yaml"),
        "scoring:\n  weights:\n    p0: 1\n",
    )
    .unwrap();
    let input = write_snapshot(
        &dir,
        "issues.json",
        r#"[
            {"id": 1, "title": "Was urgent", "labels": ["P0"], "state": "open"},
            {"id": 2, "title": "Now wins", "labels": ["P1"], "state": "open"}
        ]"#,
    );

    triage(&dir)
        .args(["next", "--input", &input])
        .assert()
        .success()
        .stdout(predicate::str::contains("Next: #2"));
}
