//! Configuration-time checks, run before a flow is saved.

use tracing::instrument;

use crate::condition::{Clause, Operator};
use crate::error::FlowError;
use crate::script::ScriptCapability;
use crate::types::{FlowGraph, FlowNode, NodeBehavior};

/// Rejects configurations that must never reach execution: code that does not compile and
/// conditional clauses with a blank variable, operator or value.
#[instrument(level = "trace", skip(node, script), fields(node_id = %node.id))]
pub fn configure(node: &FlowNode, script: &dyn ScriptCapability) -> Result<(), FlowError> {
  match &node.behavior {
    NodeBehavior::CodeExec(config) => script
      .validate(&config.code)
      .map_err(|e| FlowError::configuration(&node.id, e.to_string())),
    NodeBehavior::Conditional(config) => config
      .conditions
      .iter()
      .enumerate()
      .try_for_each(|(i, clause)| {
        incomplete_field(clause).map_or(Ok(()), |field| {
          Err(FlowError::configuration(
            &node.id,
            format!("condition {} has no {field}", i + 1),
          ))
        })
      }),
    _ => Ok(()),
  }
}

fn incomplete_field(clause: &Clause) -> Option<&'static str> {
  if clause.variable.trim().is_empty() {
    Some("variable")
  } else if matches!(&clause.operator, Operator::Other(op) if op.trim().is_empty()) {
    Some("operator")
  } else if clause.value.trim().is_empty() {
    Some("value")
  } else {
    None
  }
}

/// Checks the graph shape, then runs [configure] on every node in id order so the first
/// error reported is stable.
pub fn configure_graph(graph: &FlowGraph, script: &dyn ScriptCapability) -> Result<(), FlowError> {
  graph.validate_structure()?;
  let mut nodes: Vec<&FlowNode> = graph.nodes.values().collect();
  nodes.sort_by(|a, b| a.id.cmp(&b.id));
  nodes.into_iter().try_for_each(|node| configure(node, script))
}
