//! A node of a flow graph: identity, display data, behaviour and outgoing edges.

use serde::{Deserialize, Serialize};

use super::{
  ActionConfig, CodeExecConfig, ConditionalConfig, MailSendConfig, ModelQueryConfig,
  MultipleChoiceConfig, NodeKind,
};

/// Canvas position. Carried for the editor; the engine never reads it.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
  pub x: f64,
  pub y: f64,
}

/// Behaviour of a node with its kind-specific configuration.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeBehavior {
  Start,
  Action(ActionConfig),
  Conditional(ConditionalConfig),
  MultipleChoice(MultipleChoiceConfig),
  CodeExec(CodeExecConfig),
  ModelQuery(ModelQueryConfig),
  MailSend(MailSendConfig),
  /// Pass-through. `tag` keeps the original type string (e.g. `"end"`) and `config`
  /// the raw configuration so unknown kinds survive a save/load cycle.
  Generic {
    tag: String,
    config: serde_json::Map<String, serde_json::Value>,
  },
}

impl NodeBehavior {
  pub fn generic() -> Self {
    NodeBehavior::Generic {
      tag: NodeKind::Generic.as_tag().to_string(),
      config: serde_json::Map::new(),
    }
  }

  pub fn kind(&self) -> NodeKind {
    match self {
      NodeBehavior::Start => NodeKind::Start,
      NodeBehavior::Action(_) => NodeKind::Action,
      NodeBehavior::Conditional(_) => NodeKind::Conditional,
      NodeBehavior::MultipleChoice(_) => NodeKind::MultipleChoice,
      NodeBehavior::CodeExec(_) => NodeKind::CodeExec,
      NodeBehavior::ModelQuery(_) => NodeKind::ModelQuery,
      NodeBehavior::MailSend(_) => NodeKind::MailSend,
      NodeBehavior::Generic { .. } => NodeKind::Generic,
    }
  }

  /// Type string written to flow documents.
  pub fn tag(&self) -> &str {
    match self {
      NodeBehavior::Generic { tag, .. } => tag,
      other => other.kind().as_tag(),
    }
  }

  /// Builds a behaviour from a document's `node_type` and `config`.
  pub fn from_parts(tag: &str, config: serde_json::Value) -> Result<Self, serde_json::Error> {
    let config = match config {
      serde_json::Value::Null => serde_json::Value::Object(serde_json::Map::new()),
      other => other,
    };
    Ok(match NodeKind::from_tag(tag) {
      NodeKind::Start => NodeBehavior::Start,
      NodeKind::Action => NodeBehavior::Action(serde_json::from_value(config)?),
      NodeKind::Conditional => NodeBehavior::Conditional(serde_json::from_value(config)?),
      NodeKind::MultipleChoice => NodeBehavior::MultipleChoice(serde_json::from_value(config)?),
      NodeKind::CodeExec => NodeBehavior::CodeExec(serde_json::from_value(config)?),
      NodeKind::ModelQuery => NodeBehavior::ModelQuery(serde_json::from_value(config)?),
      NodeKind::MailSend => NodeBehavior::MailSend(serde_json::from_value(config)?),
      NodeKind::Generic => NodeBehavior::Generic {
        tag: tag.to_string(),
        config: serde_json::from_value(config)?,
      },
    })
  }

  /// Configuration in its persisted JSON shape.
  pub fn config_json(&self) -> Result<serde_json::Value, serde_json::Error> {
    match self {
      NodeBehavior::Start => Ok(serde_json::Value::Object(serde_json::Map::new())),
      NodeBehavior::Action(c) => serde_json::to_value(c),
      NodeBehavior::Conditional(c) => serde_json::to_value(c),
      NodeBehavior::MultipleChoice(c) => serde_json::to_value(c),
      NodeBehavior::CodeExec(c) => serde_json::to_value(c),
      NodeBehavior::ModelQuery(c) => serde_json::to_value(c),
      NodeBehavior::MailSend(c) => serde_json::to_value(c),
      NodeBehavior::Generic { config, .. } => Ok(serde_json::Value::Object(config.clone())),
    }
  }
}

/// Outgoing references of a node, by id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Exits {
  Single(Option<String>),
  Branch {
    on_true: Option<String>,
    on_false: Option<String>,
  },
}

impl Exits {
  pub fn none_for(kind: NodeKind) -> Self {
    if kind.is_branching() {
      Exits::Branch {
        on_true: None,
        on_false: None,
      }
    } else {
      Exits::Single(None)
    }
  }

  /// All referenced ids.
  pub fn targets(&self) -> Vec<&str> {
    match self {
      Exits::Single(next) => next.iter().map(String::as_str).collect(),
      Exits::Branch { on_true, on_false } => on_true
        .iter()
        .chain(on_false.iter())
        .map(String::as_str)
        .collect(),
    }
  }
}

/// A node of a flow graph.
#[derive(Debug, Clone, PartialEq)]
pub struct FlowNode {
  pub id: String,
  pub title: String,
  pub text: String,
  pub position: Position,
  pub behavior: NodeBehavior,
  pub exits: Exits,
}

impl FlowNode {
  /// New node with no outgoing references. Display text defaults to the kind tag.
  pub fn new(id: impl Into<String>, behavior: NodeBehavior) -> Self {
    let kind = behavior.kind();
    Self {
      id: id.into(),
      title: String::new(),
      text: behavior.tag().to_string(),
      position: Position::default(),
      exits: Exits::none_for(kind),
      behavior,
    }
  }

  pub fn kind(&self) -> NodeKind {
    self.behavior.kind()
  }

  pub fn with_text(mut self, text: impl Into<String>) -> Self {
    self.text = text.into();
    self
  }

  pub fn with_title(mut self, title: impl Into<String>) -> Self {
    self.title = title.into();
    self
  }

  pub fn with_position(mut self, x: f64, y: f64) -> Self {
    self.position = Position { x, y };
    self
  }

  /// Sets the single `next` reference. Ignored by branch-capable nodes.
  pub fn with_next(mut self, next: impl Into<String>) -> Self {
    if let Exits::Single(slot) = &mut self.exits {
      *slot = Some(next.into());
    }
    self
  }

  /// Sets both branch references. Ignored by single-exit nodes.
  pub fn with_branches(mut self, on_true: Option<&str>, on_false: Option<&str>) -> Self {
    if let Exits::Branch {
      on_true: t,
      on_false: f,
    } = &mut self.exits
    {
      *t = on_true.map(String::from);
      *f = on_false.map(String::from);
    }
    self
  }

  /// The `next` reference of a single-exit node.
  pub fn next(&self) -> Option<&str> {
    match &self.exits {
      Exits::Single(next) => next.as_deref(),
      Exits::Branch { .. } => None,
    }
  }

  /// The branch reference selected by `result`. `None` for single-exit nodes.
  pub fn branch(&self, result: bool) -> Option<&str> {
    match &self.exits {
      Exits::Branch { on_true, on_false } => {
        if result {
          on_true.as_deref()
        } else {
          on_false.as_deref()
        }
      }
      Exits::Single(_) => None,
    }
  }
}
