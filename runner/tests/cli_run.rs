//! CLI tests for `runner run` and `runner validate`.
//!
//! Spawns the runner binary and verifies exit codes and printed reports.

use std::fs;
use std::process::Command;

use suite_runner::exit_codes;
use suite_runner::io::init::{InitOptions, RunnerPaths, init_runner};
use suite_runner::io::suite_store::write_suite;
use suite_runner::tree::{ScriptPhase, SuiteNode};

#[test]
fn run_default_suite_exits_ok() {
    let temp = tempfile::tempdir().expect("tempdir");
    init_runner(temp.path(), &InitOptions { force: false }).expect("init");

    let output = Command::new(env!("CARGO_BIN_EXE_runner"))
        .current_dir(temp.path())
        .args(["run", "suite.json"])
        .output()
        .expect("runner run");

    assert_eq!(output.status.code(), Some(exit_codes::OK));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("[ok] Example suite"));
    assert!(stdout.contains("[skipped] Not yet implemented (pending)"));
}

#[test]
fn run_with_failing_node_exits_with_failed_code_and_writes_events() {
    let temp = tempfile::tempdir().expect("tempdir");
    let paths = RunnerPaths::new(temp.path());
    let mut root = SuiteNode::new("root", "Root");
    let mut broken = SuiteNode::new("broken", "Broken");
    broken.fail = vec![ScriptPhase::Execute];
    root.children = vec![broken];
    write_suite(&paths.suite_path, &root).expect("write suite");

    let output = Command::new(env!("CARGO_BIN_EXE_runner"))
        .current_dir(temp.path())
        .args(["run", "suite.json", "--events", "events.jsonl"])
        .output()
        .expect("runner run");

    assert_eq!(output.status.code(), Some(exit_codes::FAILED));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("run failed: scripted execute failure in 'broken'"));
    let events = fs::read_to_string(temp.path().join("events.jsonl")).expect("events");
    assert_eq!(events.lines().count(), 4);
}

#[test]
fn validate_accepts_dynamic_node_sharing_a_static_id() {
    let temp = tempfile::tempdir().expect("tempdir");
    let suite_path = temp.path().join("suite.json");
    fs::write(
        &suite_path,
        r#"{"id":"root","title":"Root","dynamic":[{"id":"x","title":"X"}],"children":[{"id":"x","title":"X"}]}"#,
    )
    .expect("write suite");

    let output = Command::new(env!("CARGO_BIN_EXE_runner"))
        .current_dir(temp.path())
        .args(["validate", "suite.json"])
        .output()
        .expect("runner validate");

    assert_eq!(output.status.code(), Some(exit_codes::OK));
    assert!(String::from_utf8_lossy(&output.stdout).contains("suite.json: 3 nodes ok"));
}

#[test]
fn validate_rejects_duplicate_static_ids() {
    let temp = tempfile::tempdir().expect("tempdir");
    let suite_path = temp.path().join("suite.json");
    fs::write(
        &suite_path,
        r#"{"id":"root","title":"Root","children":[{"id":"x","title":"X"},{"id":"x","title":"X again"}]}"#,
    )
    .expect("write suite");

    let output = Command::new(env!("CARGO_BIN_EXE_runner"))
        .current_dir(temp.path())
        .args(["validate", "suite.json"])
        .output()
        .expect("runner validate");

    assert_eq!(output.status.code(), Some(exit_codes::INVALID));
    assert!(String::from_utf8_lossy(&output.stderr).contains("duplicate id 'x'"));
}

#[test]
fn run_keeps_scripted_panics_out_of_stderr() {
    let temp = tempfile::tempdir().expect("tempdir");
    let paths = RunnerPaths::new(temp.path());
    let mut root = SuiteNode::new("root", "Root");
    let mut flaky = SuiteNode::new("flaky", "Flaky");
    flaky.panic = vec![ScriptPhase::Execute];
    root.children = vec![flaky];
    write_suite(&paths.suite_path, &root).expect("write suite");

    let output = Command::new(env!("CARGO_BIN_EXE_runner"))
        .current_dir(temp.path())
        .args(["run", "suite.json"])
        .output()
        .expect("runner run");

    assert_eq!(output.status.code(), Some(exit_codes::FAILED));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("run failed: panicked: scripted execute panic in 'flaky'"));
    assert!(!String::from_utf8_lossy(&output.stderr).contains("panicked at"));
}
