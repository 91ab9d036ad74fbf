//! Flow data model: values, variables, nodes, graphs and run state.

mod execution_log;
mod execution_state;
mod flow_document;
#[cfg(test)]
mod flow_document_test;
mod flow_graph;
mod flow_node;
mod node_config;
mod node_kind;
mod node_outcome;
mod var_value;
#[cfg(test)]
mod var_value_test;
mod variable;
mod variable_store;
#[cfg(test)]
mod variable_store_test;

pub use execution_log::{ExecutionLog, ExecutionStepEntry};
pub use execution_state::{RunState, Termination};
pub use flow_document::{FlowDocument, NodeRecord, VariableRecord, decode_variables};
pub use flow_graph::FlowGraph;
pub use flow_node::{Exits, FlowNode, NodeBehavior, Position};
pub use node_config::{
  ActionConfig, ActionMode, CodeExecConfig, ConditionalConfig, DEFAULT_ENTRY_FUNCTION,
  DEFAULT_OUTPUT_VARIABLE, FieldSource, MailSendConfig, ModelQueryConfig, MultipleChoiceConfig,
};
pub use node_kind::NodeKind;
pub use node_outcome::{InputRequest, NodeOutcome};
pub use var_value::{VarType, VarValue};
pub(crate) use var_value::parse_f64;
pub use variable::Variable;
pub use variable_store::VariableStore;
