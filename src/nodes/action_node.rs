//! Action node: `print` emits resolved text, `ask` stores the operator's answer.

use tracing::info;

use super::answer_text;
use crate::context::ExecutionContext;
use crate::host::NoticeKind;
use crate::template;
use crate::types::{ActionConfig, ActionMode, FlowNode, InputRequest, NodeOutcome, VarValue};

pub(crate) const DEFAULT_QUESTION: &str = "Enter a response:";
pub(crate) const QUESTION_TITLE: &str = "Question";

pub(crate) fn execute(
  node: &FlowNode,
  config: &ActionConfig,
  ctx: &mut ExecutionContext,
  answers: &[Option<String>],
) -> NodeOutcome {
  match config.action_type {
    ActionMode::Print => {
      let raw = config.print_text.as_deref().unwrap_or(&node.text);
      let text = template::resolve(raw, &ctx.variables);
      info!(node_id = %node.id, %text, "print");
      ctx.services.notifier.notify(NoticeKind::Output, &text);
    }
    ActionMode::Ask => {
      let Some(answer) = answer_text(answers, 0) else {
        let raw = config.question.as_deref().unwrap_or(DEFAULT_QUESTION);
        let question = template::resolve(raw, &ctx.variables);
        return NodeOutcome::NeedsInput(InputRequest::new(&node.id, QUESTION_TITLE, question));
      };
      let var = config.output_variable();
      info!(node_id = %node.id, variable = var, %answer, "answer stored");
      ctx.variables.update(var, VarValue::String(answer));
    }
  }
  NodeOutcome::next(node.next())
}
