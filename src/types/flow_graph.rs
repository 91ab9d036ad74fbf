//! Id-indexed arena of flow nodes.

use std::collections::HashMap;

use tracing::instrument;

use super::{Exits, FlowNode, NodeKind};
use crate::error::{FlowError, StructuralError};

/// Flow graph. Edges are node ids resolved through [FlowGraph::get].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FlowGraph {
  pub nodes: HashMap<String, FlowNode>,
}

impl FlowGraph {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn add_node(&mut self, node: FlowNode) -> Result<(), FlowError> {
    if self.nodes.contains_key(&node.id) {
      return Err(FlowError::DuplicateNode(node.id));
    }
    self.nodes.insert(node.id.clone(), node);
    Ok(())
  }

  /// Builds a graph from nodes, failing on duplicate ids.
  pub fn from_nodes(nodes: impl IntoIterator<Item = FlowNode>) -> Result<Self, FlowError> {
    let mut graph = FlowGraph::new();
    for node in nodes {
      graph.add_node(node)?;
    }
    Ok(graph)
  }

  pub fn get(&self, id: &str) -> Option<&FlowNode> {
    self.nodes.get(id)
  }

  pub fn len(&self) -> usize {
    self.nodes.len()
  }

  pub fn is_empty(&self) -> bool {
    self.nodes.is_empty()
  }

  /// Ids of every start node, sorted.
  pub fn start_ids(&self) -> Vec<String> {
    let mut ids: Vec<String> = self
      .nodes
      .values()
      .filter(|n| n.kind() == NodeKind::Start)
      .map(|n| n.id.clone())
      .collect();
    ids.sort();
    ids
  }

  /// The unique start node.
  #[instrument(level = "trace", skip(self))]
  pub fn find_start(&self) -> Result<&FlowNode, StructuralError> {
    let ids = self.start_ids();
    match ids.as_slice() {
      [] => Err(StructuralError::NoStartNode),
      [only] => self
        .nodes
        .get(only)
        .ok_or_else(|| StructuralError::UnknownNode(only.clone())),
      _ => Err(StructuralError::MultipleStartNodes(ids)),
    }
  }

  /// Checks the shape invariants: exactly one start node and every edge resolves.
  pub fn validate_structure(&self) -> Result<(), StructuralError> {
    self.find_start()?;
    for node in self.nodes.values() {
      for target in node.exits.targets() {
        if !self.nodes.contains_key(target) {
          return Err(StructuralError::UnknownNode(target.to_string()));
        }
      }
    }
    Ok(())
  }

  /// Removes references to ids that are not in the graph. Returns how many were dropped.
  pub fn drop_dangling_edges(&mut self) -> usize {
    let known: std::collections::HashSet<String> = self.nodes.keys().cloned().collect();
    let mut dropped = 0;
    let mut clear = |slot: &mut Option<String>| {
      if slot.as_ref().is_some_and(|id| !known.contains(id)) {
        *slot = None;
        dropped += 1;
      }
    };
    for node in self.nodes.values_mut() {
      match &mut node.exits {
        Exits::Single(next) => clear(next),
        Exits::Branch { on_true, on_false } => {
          clear(on_true);
          clear(on_false);
        }
      }
    }
    dropped
  }
}
