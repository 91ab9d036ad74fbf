//! Conditional node: evaluates its clauses and follows the matching branch.

use tracing::info;

use crate::condition;
use crate::context::ExecutionContext;
use crate::error::FlowError;
use crate::types::{ConditionalConfig, FlowNode, NodeOutcome};

pub(crate) fn execute(
  node: &FlowNode,
  config: &ConditionalConfig,
  ctx: &ExecutionContext,
) -> Result<NodeOutcome, FlowError> {
  let result = condition::evaluate(
    &node.id,
    &config.conditions,
    &config.logical_operator,
    &ctx.variables,
  )?;
  info!(node_id = %node.id, result, "condition evaluated");
  Ok(NodeOutcome::next(node.branch(result)))
}
