//! Start and generic nodes: log and follow the single `next` reference.

use tracing::info;

use crate::types::{FlowNode, NodeOutcome};

pub(crate) fn execute(node: &FlowNode) -> NodeOutcome {
  info!(node_id = %node.id, text = %node.text, "pass-through");
  NodeOutcome::next(node.next())
}
