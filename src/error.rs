//! Error taxonomy for flow configuration and execution.
//!
//! Node-local failures (script exceptions, model or mail adapter failures) never surface
//! here: they are turned into text at the node boundary. Only configuration problems,
//! structural problems and persistence failures are reported as [FlowError].

use thiserror::Error;

/// Problems with the shape of a flow that stop a run before or at traversal entry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StructuralError {
  #[error("flow has no start node")]
  NoStartNode,
  #[error("flow has more than one start node: {}", .0.join(", "))]
  MultipleStartNodes(Vec<String>),
  #[error("edge references unknown node: {0}")]
  UnknownNode(String),
  #[error("node {node_id} references undeclared variable: {name}")]
  MissingVariable { node_id: String, name: String },
}

#[derive(Debug, Error)]
pub enum FlowError {
  /// Rejected at configuration (save) time; never reaches execution.
  #[error("invalid configuration for node {node_id}: {message}")]
  Configuration { node_id: String, message: String },

  #[error("structural error: {0}")]
  Structural(#[from] StructuralError),

  #[error("variable already declared: {0}")]
  DuplicateVariable(String),

  #[error("duplicate node id: {0}")]
  DuplicateNode(String),

  /// The runner was driven out of order (e.g. resumed with nothing pending).
  #[error("invalid runner state: {0}")]
  InvalidState(String),

  #[error("I/O error: {0}")]
  Io(#[from] std::io::Error),

  #[error("JSON error: {0}")]
  Json(#[from] serde_json::Error),
}

impl FlowError {
  pub fn configuration(node_id: impl Into<String>, message: impl Into<String>) -> Self {
    FlowError::Configuration {
      node_id: node_id.into(),
      message: message.into(),
    }
  }

  /// True for errors that abort a run because of the flow's shape.
  pub fn is_structural(&self) -> bool {
    matches!(self, FlowError::Structural(_))
  }
}

/// Failure reported by an external adapter (model chat, mail delivery).
#[derive(Debug, Error)]
pub enum AdapterError {
  #[error("request failed: {0}")]
  Request(String),
  #[error("unexpected response: {0}")]
  Response(String),
  #[error("invalid input: {0}")]
  InvalidInput(String),
}
