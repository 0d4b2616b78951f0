//! End-to-end runs of the schedcheck binary against the host scheduler.
//!
//! Workloads are tiny: these check the output contract, not the scheduler.

use std::process::{Command, Output};

fn schedcheck(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_schedcheck"))
        .args(args)
        .env("RUST_LOG", "off")
        .output()
        .expect("failed to run schedcheck")
}

fn stdout_lines(output: &Output) -> Vec<String> {
    String::from_utf8_lossy(&output.stdout)
        .lines()
        .map(str::to_string)
        .collect()
}

#[test]
fn test_default_tiers_print_three_stats_and_a_verdict() {
    let output = schedcheck(&["12", "8", "4", "40", "2000", "4", "1"]);
    assert!(output.status.success());

    let lines = stdout_lines(&output);
    assert_eq!(lines.len(), 4, "{lines:?}");
    assert!(lines[0].starts_with("stats: A "));
    assert!(lines[1].starts_with("stats: B "));
    assert!(lines[2].starts_with("stats: C "));
    assert!(
        lines[3] == "verify(eps=1): PASS" || lines[3] == "verify(eps=1): FAIL",
        "{}",
        lines[3]
    );
}

#[test]
fn test_markers_reach_the_shared_stream() {
    let output = schedcheck(&["12", "8", "4", "40", "2000", "4", "1"]);
    let stderr = String::from_utf8_lossy(&output.stderr);
    for tag in ['A', 'B', 'C'] {
        assert_eq!(stderr.matches(tag).count(), 4, "stderr: {stderr:?}");
    }
}

#[test]
fn test_equal_priorities_pass() {
    let output = schedcheck(&["10", "10", "10", "20", "1000", "2", "3"]);
    assert!(output.status.success());
    let lines = stdout_lines(&output);
    assert_eq!(lines.last().map(String::as_str), Some("verify(eps=3): PASS"));
}

#[test]
fn test_inverted_labels() {
    let output = schedcheck(&["10", "10", "10", "20", "1000", "2", "1", "--inverted-labels"]);
    let lines = stdout_lines(&output);
    assert_eq!(lines.last().map(String::as_str), Some("verify(eps=1): FAIL"));
}

#[test]
fn test_json_report_follows_summary() {
    let output = schedcheck(&["10", "10", "10", "20", "1000", "2", "1", "--format", "json"]);
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    let json_start = stdout.find('{').expect("no JSON in output");
    let report: serde_json::Value = serde_json::from_str(&stdout[json_start..]).unwrap();

    assert_eq!(report["workers"].as_array().unwrap().len(), 3);
    assert_eq!(report["config"]["loop_count"], 20);
    assert_eq!(report["verdict"]["checks"].as_array().unwrap().len(), 0);
}

#[test]
fn test_worker_command_writes_one_record() {
    let output = schedcheck(&[
        "worker", "--tag=Q", "--priority=15", "--loops=20", "--work-size=100", "--markers=5",
        "--tick-ms=1", "--cpu=0",
    ]);
    assert!(output.status.success());
    assert_eq!(output.stdout.len(), 37);
    assert_eq!(&output.stdout[0..4], b"SRR1");
    assert_eq!(output.stdout[4], b'Q');
    assert_eq!(&output.stdout[33..37], &5u32.to_le_bytes());
    assert_eq!(String::from_utf8_lossy(&output.stderr).matches('Q').count(), 5);
}
