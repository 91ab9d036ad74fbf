//! Traversal state of a flow run.

use crate::error::StructuralError;

use super::InputRequest;

/// How a run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Termination {
  /// Reached a node without an outgoing reference.
  Normal,
  /// Stopped by a structural problem (no start node, dangling edge, missing variable).
  Structural(StructuralError),
}

/// Traversal state machine: `NotStarted → Running ⇄ AwaitingInput → Terminated`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum RunState {
  #[default]
  NotStarted,
  Running {
    current: String,
  },
  AwaitingInput {
    current: String,
    request: InputRequest,
  },
  Terminated(Termination),
}

impl RunState {
  pub fn is_done(&self) -> bool {
    matches!(self, RunState::Terminated(_))
  }

  /// Node being executed or waiting for input.
  pub fn current_node(&self) -> Option<&str> {
    match self {
      RunState::Running { current } | RunState::AwaitingInput { current, .. } => Some(current),
      _ => None,
    }
  }
}
