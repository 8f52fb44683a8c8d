//! CLI integration tests
//!
//! Drive the compiled binary end to end: the built-in example, instance
//! files, bad flags, and exit codes.
//!
//! Exit code contract: 0 when a schedule is produced (Optimal or Feasible),
//! 1 on invalid input, unknown backend/objective, or infeasibility.

use std::io::Write;
use std::process::{Command, Output};

fn run(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_shopplan"))
        .args(args)
        .output()
        .expect("failed to execute shopplan")
}

fn write_instance(json: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    file.write_all(json.as_bytes()).expect("write instance");
    file
}

#[test]
fn builtin_example_solves_and_reports() {
    let output = run(&[]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    assert!(stdout.contains("Status:"));
    assert!(stdout.contains("Final Schedule:"));
    assert!(stdout.contains("Job1-Cutting"));
    assert!(stdout.contains("Total makespan"));
    assert!(stdout.contains("Machine Utilization:"));
}

#[test]
fn builtin_example_passes_its_own_audit() {
    let output = run(&["--check"]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success());
    assert!(stdout.contains("Check passed"));
}

#[test]
fn lateness_objective_is_accepted() {
    let output = run(&["--objective", "total-lateness"]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success());
    assert!(stdout.contains("Objective (total-lateness)"));
}

#[test]
fn unknown_objective_is_rejected() {
    let output = run(&["--objective", "profit"]);
    let stderr = String::from_utf8_lossy(&output.stderr);

    assert!(!output.status.success());
    assert!(stderr.contains("unknown objective"));
}

#[test]
fn unknown_backend_is_reported_by_name() {
    let output = run(&["--solver", "cplex"]);
    let stderr = String::from_utf8_lossy(&output.stderr);

    assert!(!output.status.success());
    assert!(stderr.contains("cplex"));
}

#[test]
fn instance_file_is_loaded() {
    let file = write_instance(
        r#"{
            "name": "Tiny",
            "horizon_minutes": 120,
            "tasks": [
                {"id": "first", "machine": "m", "duration": 30},
                {"id": "second", "machine": "m", "duration": 20, "predecessors": ["first"]}
            ],
            "machines": [{"id": "m"}]
        }"#,
    );

    let output = run(&[file.path().to_str().unwrap(), "--check"]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    assert!(stdout.contains("Optimal"));
    assert!(stdout.contains("first"));
    assert!(stdout.contains("Check passed"));
}

#[test]
fn cyclic_instance_fails_before_solving() {
    let file = write_instance(
        r#"{
            "name": "Cycle",
            "tasks": [
                {"id": "a", "machine": "m", "duration": 10, "predecessors": ["b"]},
                {"id": "b", "machine": "m", "duration": 10, "predecessors": ["a"]}
            ],
            "machines": [{"id": "m"}]
        }"#,
    );

    let output = run(&[file.path().to_str().unwrap()]);
    let stderr = String::from_utf8_lossy(&output.stderr);

    assert!(!output.status.success());
    assert!(stderr.contains("cycle detected"));
}

#[test]
fn infeasible_instance_exits_nonzero() {
    let file = write_instance(
        r#"{
            "name": "Overfull",
            "horizon_minutes": 15,
            "tasks": [
                {"id": "a", "machine": "m", "duration": 10},
                {"id": "b", "machine": "m", "duration": 10}
            ],
            "machines": [{"id": "m"}]
        }"#,
    );

    let output = run(&[file.path().to_str().unwrap()]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(!output.status.success());
    assert!(stdout.contains("Infeasible"));
    assert!(stdout.contains("No schedule produced."));
}

#[test]
fn malformed_json_is_a_parse_error() {
    let file = write_instance("{ not json");
    let output = run(&[file.path().to_str().unwrap()]);
    let stderr = String::from_utf8_lossy(&output.stderr);

    assert!(!output.status.success());
    assert!(stderr.contains("parsing instance"));
}
