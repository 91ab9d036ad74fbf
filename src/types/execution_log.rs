//! Step log of a flow run, for debugging and the CLI's `--log` output.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::VarValue;

/// One executed node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionStepEntry {
  /// 1-based step index.
  pub step: u32,
  pub node_id: String,
  /// Node type tag (e.g. "action", "conditional").
  pub node_type: String,
  /// Next node chosen, `None` on the terminating step.
  pub next_node_id: Option<String>,
  /// RFC 3339 timestamp when the node finished.
  pub finished_at: String,
  /// Variable bindings after the node ran, when the run records them.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub variables_after: Option<BTreeMap<String, VarValue>>,
}

/// Root structure of a run's execution log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionLog {
  pub version: u32,
  pub started_at: String,
  pub finished_at: Option<String>,
  /// "running", "completed" or "aborted".
  pub final_status: String,
  pub steps: Vec<ExecutionStepEntry>,
}

impl ExecutionLog {
  pub fn started_now() -> Self {
    Self {
      version: 1,
      started_at: chrono::Utc::now().to_rfc3339(),
      finished_at: None,
      final_status: "running".to_string(),
      steps: vec![],
    }
  }

  pub fn push(
    &mut self,
    node_id: &str,
    node_type: &str,
    next_node_id: Option<&str>,
    variables_after: Option<BTreeMap<String, VarValue>>,
  ) {
    let step = self.steps.len() as u32 + 1;
    self.steps.push(ExecutionStepEntry {
      step,
      node_id: node_id.to_string(),
      node_type: node_type.to_string(),
      next_node_id: next_node_id.map(String::from),
      finished_at: chrono::Utc::now().to_rfc3339(),
      variables_after,
    });
  }

  pub fn finish(&mut self, status: &str) {
    self.final_status = status.to_string();
    self.finished_at = Some(chrono::Utc::now().to_rfc3339());
  }

  /// Node ids in execution order.
  pub fn visited(&self) -> Vec<String> {
    self.steps.iter().map(|s| s.node_id.clone()).collect()
  }
}

#[cfg(test)]
mod tests {
  use super::ExecutionLog;
  use crate::types::VarValue;
  use std::collections::BTreeMap;

  #[test]
  fn push_numbers_steps_and_records_visits() {
    let mut log = ExecutionLog::started_now();
    log.push("s", "start", Some("a"), None);
    let mut vars = BTreeMap::new();
    vars.insert("x".to_string(), VarValue::Integer(1));
    log.push("a", "action", None, Some(vars));
    assert_eq!(log.steps[1].step, 2);
    assert_eq!(log.visited(), vec!["s", "a"]);
    assert_eq!(log.final_status, "running");
    log.finish("completed");
    assert!(log.finished_at.is_some());
  }

  #[test]
  fn serializes_to_json() {
    let mut log = ExecutionLog::started_now();
    log.push("s", "start", None, None);
    log.finish("completed");
    let parsed: serde_json::Value = serde_json::to_value(&log).unwrap();
    assert_eq!(parsed["version"], 1);
    assert_eq!(parsed["final_status"], "completed");
    assert_eq!(parsed["steps"][0]["node_id"], "s");
    assert_eq!(parsed["steps"][0]["next_node_id"], serde_json::Value::Null);
    assert!(parsed["steps"][0].get("variables_after").is_none());
  }

  #[test]
  fn step_without_variables_reads_back() {
    let json = r#"{"version": 1, "started_at": "t", "finished_at": null,
      "final_status": "running",
      "steps": [{"step": 1, "node_id": "s", "node_type": "start", "next_node_id": null,
                 "finished_at": "t"}]}"#;
    let log: ExecutionLog = serde_json::from_str(json).unwrap();
    assert_eq!(log.steps[0].variables_after, None);
  }
}
