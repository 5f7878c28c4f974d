//! End-to-end runs of the `nfasat` binary with the default z3 backend.
#![cfg(feature = "z3")]

use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Output, Stdio};

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("../nfasat-engine/tests/fixtures")
        .join(name)
}

fn nfasat(args: &[&str], stdin: &str) -> Output {
    let mut child = Command::new(env!("CARGO_BIN_EXE_nfasat"))
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("failed to spawn nfasat");
    child
        .stdin
        .take()
        .expect("stdin is piped")
        .write_all(stdin.as_bytes())
        .expect("failed to write stdin");
    child.wait_with_output().expect("failed to wait for nfasat")
}

fn stdout_of(output: &Output) -> String {
    assert!(
        output.status.success(),
        "nfasat failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8(output.stdout.clone()).expect("stdout is utf-8")
}

#[test]
fn accepting_loop_prints_yes() {
    let path = fixture("scenario_a.nfa");
    let output = nfasat(&[path.to_str().unwrap()], "");
    assert_eq!(stdout_of(&output), "YES\n");
}

#[test]
fn non_final_loop_prints_no_and_witness_from_stdin() {
    let source = std::fs::read_to_string(fixture("scenario_b.nfa")).unwrap();
    let output = nfasat(&[], &source);
    assert_eq!(stdout_of(&output), "NO\na\n");
}

#[test]
fn zero_length_rejection_prints_an_empty_witness_line() {
    let output = nfasat(&["-"], "1 1 1 0 0\na\ns0\ns0\n\n0\n");
    assert_eq!(stdout_of(&output), "NO\n\n");
}

#[test]
fn json_format_carries_verdict_word_and_stats() {
    let path = fixture("parity.nfa");
    let output = nfasat(&["--format", "json", path.to_str().unwrap()], "");
    let value: serde_json::Value = serde_json::from_str(&stdout_of(&output)).unwrap();
    assert_eq!(value["verdict"], "rejected");
    assert_eq!(value["length"], 3);
    assert_eq!(value["word"].as_array().map(Vec::len), Some(3));
    assert_eq!(value["stats"]["states"], 2);
}

#[test]
fn dump_smt_writes_the_query() {
    let dir = tempfile::tempdir().unwrap();
    let dump = dir.path().join("query.smt2");
    let path = fixture("two_step.nfa");
    let output = nfasat(
        &["--dump-smt", dump.to_str().unwrap(), path.to_str().unwrap()],
        "",
    );
    assert_eq!(stdout_of(&output), "YES\n");
    let script = std::fs::read_to_string(dump).unwrap();
    assert!(script.contains("(check-sat)"));
}

#[test]
fn verdict_stays_alone_on_stdout_with_verbose_logging() {
    let path = fixture("scenario_b.nfa");
    let output = Command::new(env!("CARGO_BIN_EXE_nfasat"))
        .arg(path)
        .env("RUST_LOG", "debug")
        .output()
        .expect("failed to run nfasat");
    assert_eq!(stdout_of(&output), "NO\na\n");
    assert!(!output.stderr.is_empty(), "logs go to stderr");
}

#[test]
fn oversized_length_fails_with_a_diagnostic() {
    let output = nfasat(&["-"], "1 1 1 0 1\na\ns0\ns0\n\ns0 a s0\n4294967295\n");
    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("nfasat::encode::too_large"), "stderr was: {stderr}");
}
