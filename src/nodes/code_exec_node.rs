//! Code-exec node: runs the configured program through the script capability.
//!
//! Parameters come from the variable store when declared there; each missing one is asked
//! for in declaration order. The entry function's return value, or the error text when the
//! program fails, is written to the output variable.

use tracing::{info, warn};

use crate::context::ExecutionContext;
use crate::types::{CodeExecConfig, FlowNode, InputRequest, NodeOutcome, VarValue};

pub(crate) const PARAMETER_TITLE: &str = "Parameter";

pub(crate) fn execute(
  node: &FlowNode,
  config: &CodeExecConfig,
  ctx: &mut ExecutionContext,
  answers: &[Option<String>],
) -> NodeOutcome {
  let mut solicited = answers.iter();
  let mut args = Vec::with_capacity(config.params.len());
  for param in &config.params {
    let value = match ctx.variables.value(param) {
      Some(value) => value.clone(),
      None => match solicited.next() {
        Some(answer) => VarValue::String(answer.clone().unwrap_or_default()),
        None => {
          return NodeOutcome::NeedsInput(InputRequest::new(
            &node.id,
            PARAMETER_TITLE,
            format!("Enter a value for parameter '{}':", param),
          ));
        }
      },
    };
    args.push((param.clone(), value));
  }

  let entry = config.entry();
  let result = match ctx.services.script.invoke(&config.code, entry, &args) {
    Ok(value) => value,
    Err(e) => {
      warn!(node_id = %node.id, error = %e, "code execution failed");
      VarValue::String(e.to_string())
    }
  };
  let var = config.output_variable();
  info!(node_id = %node.id, variable = var, result = %result, "code executed");
  ctx.variables.update(var, result);
  NodeOutcome::next(node.next())
}
