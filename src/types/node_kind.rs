//! Node variant tags as persisted in flow documents.

use std::fmt;

/// Closed set of node behaviours. Unrecognized tags map to [NodeKind::Generic].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
  Start,
  Action,
  Conditional,
  MultipleChoice,
  CodeExec,
  ModelQuery,
  MailSend,
  Generic,
}

impl NodeKind {
  pub fn from_tag(tag: &str) -> NodeKind {
    match tag.trim() {
      "start" => NodeKind::Start,
      "action" => NodeKind::Action,
      "conditional" => NodeKind::Conditional,
      "multiple_choice" => NodeKind::MultipleChoice,
      "code_exec" => NodeKind::CodeExec,
      "model_query" => NodeKind::ModelQuery,
      "mail_send" => NodeKind::MailSend,
      _ => NodeKind::Generic,
    }
  }

  pub fn as_tag(&self) -> &'static str {
    match self {
      NodeKind::Start => "start",
      NodeKind::Action => "action",
      NodeKind::Conditional => "conditional",
      NodeKind::MultipleChoice => "multiple_choice",
      NodeKind::CodeExec => "code_exec",
      NodeKind::ModelQuery => "model_query",
      NodeKind::MailSend => "mail_send",
      NodeKind::Generic => "generic",
    }
  }

  /// Branch-capable kinds expose `on_true`/`on_false` instead of a single `next`.
  pub fn is_branching(&self) -> bool {
    matches!(self, NodeKind::Conditional)
  }
}

impl fmt::Display for NodeKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_tag())
  }
}
