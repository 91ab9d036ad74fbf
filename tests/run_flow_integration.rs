//! Integration tests for the run_flow CLI binary.

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

fn fixture(name: &str) -> PathBuf {
  Path::new(env!("CARGO_MANIFEST_DIR"))
    .join("tests")
    .join("fixtures")
    .join(name)
}

/// Runs the built `run_flow` binary with a clean BRANCHFLOW_* environment.
fn run_flow(args: &[&str]) -> Output {
  let mut cmd = Command::new(env!("CARGO_BIN_EXE_run_flow"));
  cmd.args(args);
  for key in [
    "BRANCHFLOW_MEMORY_DIR",
    "BRANCHFLOW_OLLAMA_URL",
    "BRANCHFLOW_MODEL_TIMEOUT_SECS",
    "BRANCHFLOW_SCRIPT_MEMORY_LIMIT",
  ] {
    cmd.env_remove(key);
  }
  cmd.output().expect("run run_flow")
}

fn entries(dir: &Path) -> usize {
  std::fs::read_dir(dir).map(|d| d.count()).unwrap_or(0)
}

#[test]
fn prints_usage_without_args() {
  let out = run_flow(&[]);
  assert!(!out.status.success());
  let stderr = String::from_utf8_lossy(&out.stderr);
  assert!(stderr.contains("Usage") || stderr.contains("usage"), "{}", stderr);
}

#[test]
fn exits_1_for_missing_file() {
  let out = run_flow(&["/nonexistent/flow.json"]);
  assert_eq!(out.status.code(), Some(1));
  assert!(String::from_utf8_lossy(&out.stderr).contains("Error running"));
}

#[test]
fn runs_fixture_with_scripted_answers() {
  let dir = tempfile::tempdir().expect("temp dir");
  let memory = dir.path().join("memory");
  let log = dir.path().join("run.json");
  let flow = fixture("greeting.json");
  let out = run_flow(&[
    "--answer",
    "Ana",
    "--memory-dir",
    memory.to_str().unwrap(),
    "--log",
    log.to_str().unwrap(),
    flow.to_str().unwrap(),
  ]);
  let stdout = String::from_utf8_lossy(&out.stdout);
  assert!(
    out.status.success(),
    "stderr: {}",
    String::from_utf8_lossy(&out.stderr)
  );
  assert!(stdout.contains("Welcome, Ana."), "{}", stdout);
  assert!(stdout.contains("Flow completed."));
  assert!(stdout.contains("total = 5"));
  assert_eq!(entries(&memory), 1);

  let log: serde_json::Value =
    serde_json::from_str(&std::fs::read_to_string(&log).unwrap()).unwrap();
  assert_eq!(log["final_status"], "completed");
  assert_eq!(log["steps"].as_array().unwrap().len(), 6);
  assert_eq!(log["steps"][1]["variables_after"]["name"], "Ana");
}

#[test]
fn env_overrides_memory_dir_flag() {
  let dir = tempfile::tempdir().expect("temp dir");
  let flag_dir = dir.path().join("flag");
  let env_dir = dir.path().join("env");
  let flow = fixture("greeting.json");
  let out = Command::new(env!("CARGO_BIN_EXE_run_flow"))
    .args([
      "--answer",
      "Ana",
      "--memory-dir",
      flag_dir.to_str().unwrap(),
      flow.to_str().unwrap(),
    ])
    .env("BRANCHFLOW_MEMORY_DIR", &env_dir)
    .output()
    .expect("run run_flow");
  assert!(out.status.success());
  assert_eq!(entries(&flag_dir), 0);
  assert_eq!(entries(&env_dir), 1);
}

#[test]
fn exits_2_without_start_node_and_writes_nothing() {
  let dir = tempfile::tempdir().expect("temp dir");
  let flow = dir.path().join("flow.json");
  std::fs::write(
    &flow,
    r#"{"nodes":[{"id":"a","node_type":"action","config":{"print_text":"hi"}}],"variables":[]}"#,
  )
  .unwrap();
  let memory = dir.path().join("memory");
  let out = run_flow(&[
    "--memory-dir",
    memory.to_str().unwrap(),
    flow.to_str().unwrap(),
  ]);
  assert_eq!(out.status.code(), Some(2));
  assert!(String::from_utf8_lossy(&out.stderr).contains("no start node"));
  assert!(!String::from_utf8_lossy(&out.stdout).contains("hi"));
  assert_eq!(entries(&memory), 0);
}

#[test]
fn preloaded_variables_are_overridden_by_document() {
  let dir = tempfile::tempdir().expect("temp dir");
  let preload = dir.path().join("vars.json");
  std::fs::write(
    &preload,
    r#"{"variables":[{"name":"a","var_type":"integer","value":100},{"name":"extra","var_type":"string","value":"kept"}]}"#,
  )
  .unwrap();
  let flow = fixture("greeting.json");
  let out = run_flow(&[
    "--no-memory",
    "--answer",
    "Ana",
    "--variables",
    preload.to_str().unwrap(),
    flow.to_str().unwrap(),
  ]);
  let stdout = String::from_utf8_lossy(&out.stdout);
  assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));
  assert!(stdout.contains("total = 5"), "{}", stdout);
  assert!(stdout.contains("extra = kept"), "{}", stdout);
  assert!(!stdout.contains("Memory:"));
}
