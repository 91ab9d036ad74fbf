//! Node execution: one handler per behaviour, dispatched by exhaustive match.
//!
//! Handlers read and write the [ExecutionContext] and return a [NodeOutcome]. A handler
//! that needs operator input returns [NodeOutcome::NeedsInput] before any side effect;
//! the runner re-executes it with the answers collected so far (oldest first).

mod action_node;
mod code_exec_node;
mod conditional_node;
mod configure;
mod identity_node;
mod mail_send_node;
mod model_query_node;
mod multiple_choice_node;
#[cfg(test)]
pub(crate) mod test_support;

pub use configure::{configure, configure_graph};

use tracing::instrument;

use crate::context::ExecutionContext;
use crate::error::FlowError;
use crate::types::{FlowNode, NodeBehavior, NodeOutcome};

/// Executes `node` once. `answers` holds the operator's replies to the input requests this
/// node raised earlier in the same visit; a cancelled request is `None`.
#[instrument(level = "trace", skip(node, ctx, answers), fields(node_id = %node.id, kind = %node.kind()))]
pub async fn execute_node(
  node: &FlowNode,
  ctx: &mut ExecutionContext,
  answers: &[Option<String>],
) -> Result<NodeOutcome, FlowError> {
  match &node.behavior {
    NodeBehavior::Start | NodeBehavior::Generic { .. } => Ok(identity_node::execute(node)),
    NodeBehavior::Action(config) => Ok(action_node::execute(node, config, ctx, answers)),
    NodeBehavior::Conditional(config) => conditional_node::execute(node, config, ctx),
    NodeBehavior::MultipleChoice(config) => {
      Ok(multiple_choice_node::execute(node, config, ctx, answers))
    }
    NodeBehavior::CodeExec(config) => Ok(code_exec_node::execute(node, config, ctx, answers)),
    NodeBehavior::ModelQuery(config) => {
      Ok(model_query_node::execute(node, config, ctx, answers).await)
    }
    NodeBehavior::MailSend(config) => Ok(mail_send_node::execute(node, config, ctx).await),
  }
}

/// Answer `index` as text; cancelled answers become the empty string.
pub(crate) fn answer_text(answers: &[Option<String>], index: usize) -> Option<String> {
  answers
    .get(index)
    .map(|a| a.clone().unwrap_or_default())
}
