//! Multiple-choice node: asks with a fixed option list and stores the selection.

use tracing::info;

use super::answer_text;
use crate::context::ExecutionContext;
use crate::template;
use crate::types::{FlowNode, InputRequest, MultipleChoiceConfig, NodeOutcome, VarValue};

pub(crate) const DEFAULT_QUESTION: &str = "Select an option:";
pub(crate) const CHOICE_TITLE: &str = "Multiple choice";

pub(crate) fn execute(
  node: &FlowNode,
  config: &MultipleChoiceConfig,
  ctx: &mut ExecutionContext,
  answers: &[Option<String>],
) -> NodeOutcome {
  let Some(choice) = answer_text(answers, 0) else {
    let raw = config.question.as_deref().unwrap_or(DEFAULT_QUESTION);
    let question = template::resolve(raw, &ctx.variables);
    return NodeOutcome::NeedsInput(
      InputRequest::new(&node.id, CHOICE_TITLE, question).with_options(config.responses.clone()),
    );
  };
  let var = config.output_variable();
  info!(node_id = %node.id, variable = var, %choice, "choice stored");
  ctx.variables.update(var, VarValue::String(choice));
  NodeOutcome::next(node.next())
}
