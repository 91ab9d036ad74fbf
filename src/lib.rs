//! # branchflow
//!
//! Sequential execution engine for visually assembled branching automation flows.
//!
//! ## Architecture
//!
//! A flow is an id-indexed arena of [FlowNode]s ([FlowGraph]) plus a typed
//! [VariableStore]. [FlowRunner] walks it from the unique start node, one node at a time,
//! dispatching each node to its handler in `nodes`. Nodes that need operator input suspend
//! the runner with an [InputRequest]; the host answers through [FlowRunner::resume] or a
//! [host::Prompter]. External services (model chat, mail, embedded scripts, notices) are
//! injected as [Services].

pub mod adapters;
pub mod condition;
#[cfg(test)]
mod condition_test;
pub mod config;
pub mod context;
pub mod error;
pub mod host;
pub mod memory_io;
pub mod nodes;
pub mod runner;
pub mod script;
pub mod template;
pub mod types;

pub use config::RunnerConfig;
pub use context::{ExecutionContext, Services};
pub use error::{AdapterError, FlowError, StructuralError};
pub use runner::{FlowRunner, RunReport, StepResult, run_flow};
pub use types::{
  FlowDocument, FlowGraph, FlowNode, InputRequest, NodeBehavior, NodeOutcome, RunState, VarType,
  VarValue, VariableStore,
};
