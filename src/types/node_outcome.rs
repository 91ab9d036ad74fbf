//! Result of executing a single flow node.

use serde::{Deserialize, Serialize};

/// A request for operator input raised by a node that cannot continue without it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputRequest {
  /// Node that asked.
  pub node_id: String,
  /// Short dialog title (e.g. "Question", "Parameter").
  pub title: String,
  /// Question text, templates already resolved.
  pub question: String,
  /// Allowed answers for multiple-choice questions; empty for free text.
  pub options: Vec<String>,
}

impl InputRequest {
  pub fn new(node_id: &str, title: &str, question: impl Into<String>) -> Self {
    Self {
      node_id: node_id.to_string(),
      title: title.to_string(),
      question: question.into(),
      options: vec![],
    }
  }

  pub fn with_options(mut self, options: Vec<String>) -> Self {
    self.options = options;
    self
  }
}

/// What a node's execution produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeOutcome {
  /// Continue to the referenced node, or terminate when `None`.
  Next(Option<String>),
  /// Suspend until the host supplies an answer; the node is then executed again with it.
  NeedsInput(InputRequest),
}

impl NodeOutcome {
  pub fn next(id: Option<&str>) -> Self {
    NodeOutcome::Next(id.map(String::from))
  }
}
