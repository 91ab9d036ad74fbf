//! Model-query node: builds a chat from sourced fields and stores the model's reply.

use tracing::{info, warn};

use super::answer_text;
use crate::adapters::ChatMessage;
use crate::context::ExecutionContext;
use crate::template;
use crate::types::{
  FieldSource, FlowNode, InputRequest, ModelQueryConfig, NodeOutcome, VarValue, VariableStore,
};

pub(crate) const PROMPT_TITLE: &str = "Model prompt";
pub(crate) const PROMPT_QUESTION: &str = "Enter your question:";

/// Text of a field: the literal, or the variable's value (empty when undeclared).
pub(crate) fn resolve_field(source: &FieldSource, store: &VariableStore) -> String {
  match source {
    FieldSource::Literal(text) => text.clone(),
    FieldSource::Variable(name) => store.value(name).map(VarValue::as_text).unwrap_or_default(),
  }
}

/// Message list in order: personality, instructions, optional context, prompt.
pub(crate) fn build_messages(
  personality: String,
  instructions: String,
  context: String,
  prompt: String,
) -> Vec<ChatMessage> {
  let mut messages = vec![
    ChatMessage::system(personality),
    ChatMessage::system(instructions),
  ];
  if !context.is_empty() {
    messages.push(ChatMessage::system(context));
  }
  messages.push(ChatMessage::user(prompt));
  messages
}

pub(crate) async fn execute(
  node: &FlowNode,
  config: &ModelQueryConfig,
  ctx: &mut ExecutionContext,
  answers: &[Option<String>],
) -> NodeOutcome {
  let store = &ctx.variables;
  let mut prompt = resolve_field(&config.prompt, store);
  if prompt.is_empty() {
    match answer_text(answers, 0) {
      Some(answer) => prompt = answer,
      None => {
        return NodeOutcome::NeedsInput(InputRequest::new(&node.id, PROMPT_TITLE, PROMPT_QUESTION));
      }
    }
  }
  let prompt = template::resolve(&prompt, store);
  let model = resolve_field(&config.model, store);
  let messages = build_messages(
    resolve_field(&config.personality, store),
    resolve_field(&config.instructions, store),
    resolve_field(&config.context, store),
    prompt,
  );

  let reply = match ctx.services.model.chat(&model, &messages).await {
    Ok(reply) => reply,
    Err(e) => {
      warn!(node_id = %node.id, %model, error = %e, "model query failed");
      format!("Error in model query: {}", e)
    }
  };
  let var = config.output_variable();
  info!(node_id = %node.id, variable = var, %model, "model reply stored");
  ctx.variables.update(var, VarValue::String(reply));
  NodeOutcome::next(node.next())
}
