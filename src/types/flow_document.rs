//! Persisted flow document: `{ "nodes": [...], "variables": [...] }`.
//!
//! Reading and writing files is the caller's business; this module maps between the
//! decoded JSON shape and [FlowGraph] + [VariableStore].

use serde::{Deserialize, Serialize};
use tracing::warn;

use super::{
  Exits, FlowGraph, FlowNode, NodeBehavior, Position, VarType, VarValue, Variable, VariableStore,
};
use crate::error::FlowError;
use crate::nodes;
use crate::script::ScriptCapability;

/// One node as stored in a flow document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeRecord {
  pub id: String,
  #[serde(default)]
  pub x: f64,
  #[serde(default)]
  pub y: f64,
  pub node_type: String,
  #[serde(default)]
  pub text: String,
  #[serde(default)]
  pub title: String,
  #[serde(default)]
  pub config: serde_json::Value,
  #[serde(default)]
  pub connected_to: Option<String>,
  #[serde(default)]
  pub true_connection: Option<String>,
  #[serde(default)]
  pub false_connection: Option<String>,
}

/// One variable as stored in a flow document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariableRecord {
  pub name: String,
  #[serde(default)]
  pub var_type: VarType,
  #[serde(default)]
  pub value: serde_json::Value,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FlowDocument {
  #[serde(default)]
  pub nodes: Vec<NodeRecord>,
  #[serde(default)]
  pub variables: Vec<VariableRecord>,
}

impl FlowDocument {
  pub fn from_json(source: &str) -> Result<Self, FlowError> {
    Ok(serde_json::from_str(source)?)
  }

  pub fn to_json_pretty(&self) -> Result<String, FlowError> {
    Ok(serde_json::to_string_pretty(self)?)
  }

  /// Builds the graph and variable store. References to unknown ids are dropped.
  pub fn decode(&self) -> Result<(FlowGraph, VariableStore), FlowError> {
    let mut graph = FlowGraph::new();
    for record in &self.nodes {
      graph.add_node(node_from_record(record)?)?;
    }
    let dropped = graph.drop_dangling_edges();
    if dropped > 0 {
      warn!(dropped, "dropped references to unknown nodes");
    }
    let variables = decode_variables(&self.variables);
    Ok((graph, variables))
  }

  /// Encodes a graph for saving. Every node must pass its configuration check first,
  /// so a code-exec program that does not compile is never persisted.
  pub fn encode(
    graph: &FlowGraph,
    variables: &VariableStore,
    script: &dyn ScriptCapability,
  ) -> Result<Self, FlowError> {
    nodes::configure_graph(graph, script)?;
    let mut ids: Vec<&String> = graph.nodes.keys().collect();
    ids.sort();
    let mut records = Vec::with_capacity(ids.len());
    for id in ids {
      if let Some(node) = graph.get(id) {
        records.push(record_from_node(node)?);
      }
    }
    let variables = variables
      .iter()
      .map(|v| VariableRecord {
        name: v.name.clone(),
        var_type: v.var_type,
        value: serde_json::to_value(&v.value).unwrap_or(serde_json::Value::Null),
      })
      .collect();
    Ok(FlowDocument {
      nodes: records,
      variables,
    })
  }
}

/// Declared variables from document records; later records with the same name win.
pub fn decode_variables(records: &[VariableRecord]) -> VariableStore {
  records
    .iter()
    .map(|r| {
      Variable::new(
        r.name.clone(),
        r.var_type,
        VarValue::from_json(&r.value, r.var_type),
      )
    })
    .collect()
}

fn node_from_record(record: &NodeRecord) -> Result<FlowNode, FlowError> {
  let behavior = NodeBehavior::from_parts(&record.node_type, record.config.clone())
    .map_err(|e| FlowError::configuration(&record.id, e.to_string()))?;
  let exits = if behavior.kind().is_branching() {
    Exits::Branch {
      on_true: record.true_connection.clone(),
      on_false: record.false_connection.clone(),
    }
  } else {
    Exits::Single(record.connected_to.clone())
  };
  Ok(FlowNode {
    id: record.id.clone(),
    title: record.title.clone(),
    text: record.text.clone(),
    position: Position {
      x: record.x,
      y: record.y,
    },
    behavior,
    exits,
  })
}

fn record_from_node(node: &FlowNode) -> Result<NodeRecord, FlowError> {
  let (connected_to, true_connection, false_connection) = match &node.exits {
    Exits::Single(next) => (next.clone(), None, None),
    Exits::Branch { on_true, on_false } => (None, on_true.clone(), on_false.clone()),
  };
  Ok(NodeRecord {
    id: node.id.clone(),
    x: node.position.x,
    y: node.position.y,
    node_type: node.behavior.tag().to_string(),
    text: node.text.clone(),
    title: node.title.clone(),
    config: node.behavior.config_json()?,
    connected_to,
    true_connection,
    false_connection,
  })
}
