//! Per-kind configuration payloads, in their persisted JSON shape.

use serde::{Deserialize, Deserializer, Serialize};

use crate::condition::{Clause, Combinator};

/// Output variable used when a node does not name one.
pub const DEFAULT_OUTPUT_VARIABLE: &str = "answer";

/// Entry function invoked by code-exec nodes that do not name one.
pub const DEFAULT_ENTRY_FUNCTION: &str = "entry";

fn output_or_default(name: &Option<String>) -> &str {
  name
    .as_deref()
    .filter(|s| !s.trim().is_empty())
    .unwrap_or(DEFAULT_OUTPUT_VARIABLE)
}

/// Sub-mode of an action node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionMode {
  #[default]
  Print,
  Ask,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ActionConfig {
  pub action_type: ActionMode,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub print_text: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub question: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub variable_name: Option<String>,
}

impl ActionConfig {
  pub fn print(text: impl Into<String>) -> Self {
    Self {
      action_type: ActionMode::Print,
      print_text: Some(text.into()),
      ..Self::default()
    }
  }

  pub fn ask(question: impl Into<String>, variable_name: impl Into<String>) -> Self {
    Self {
      action_type: ActionMode::Ask,
      question: Some(question.into()),
      variable_name: Some(variable_name.into()),
      ..Self::default()
    }
  }

  pub fn output_variable(&self) -> &str {
    output_or_default(&self.variable_name)
  }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ConditionalConfig {
  pub conditions: Vec<Clause>,
  pub logical_operator: Combinator,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MultipleChoiceConfig {
  #[serde(skip_serializing_if = "Option::is_none")]
  pub question: Option<String>,
  pub responses: Vec<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub variable_name: Option<String>,
}

impl MultipleChoiceConfig {
  pub fn output_variable(&self) -> &str {
    output_or_default(&self.variable_name)
  }
}

/// Code-exec node: a program defining `entry_function`, called with `params` bound by name.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CodeExecConfig {
  pub code: String,
  pub params: Vec<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub variable_name: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub entry_function: Option<String>,
}

impl CodeExecConfig {
  pub fn new(code: impl Into<String>, params: &[&str], variable_name: impl Into<String>) -> Self {
    Self {
      code: code.into(),
      params: params.iter().map(|p| p.to_string()).collect(),
      variable_name: Some(variable_name.into()),
      entry_function: None,
    }
  }

  pub fn output_variable(&self) -> &str {
    output_or_default(&self.variable_name)
  }

  pub fn entry(&self) -> &str {
    self
      .entry_function
      .as_deref()
      .filter(|s| !s.trim().is_empty())
      .unwrap_or(DEFAULT_ENTRY_FUNCTION)
  }
}

/// Where a model-query field takes its text from.
///
/// Persisted as `{"type": "free" | "variable", "value": "..."}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum FieldSource {
  #[serde(rename = "free", alias = "literal")]
  Literal(String),
  Variable(String),
}

impl Default for FieldSource {
  fn default() -> Self {
    FieldSource::Literal(String::new())
  }
}

impl FieldSource {
  pub fn literal(s: impl Into<String>) -> Self {
    FieldSource::Literal(s.into())
  }

  pub fn variable(name: impl Into<String>) -> Self {
    FieldSource::Variable(name.into())
  }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelQueryConfig {
  pub model: FieldSource,
  pub personality: FieldSource,
  pub instructions: FieldSource,
  pub context: FieldSource,
  pub prompt: FieldSource,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub variable_name: Option<String>,
}

impl ModelQueryConfig {
  pub fn output_variable(&self) -> &str {
    output_or_default(&self.variable_name)
  }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MailSendConfig {
  pub smtp_server: String,
  #[serde(deserialize_with = "port_from_text_or_number")]
  pub smtp_port: u16,
  pub user: String,
  pub password: String,
  pub from: String,
  /// Comma-separated recipient list.
  pub to: String,
  pub subject: String,
  pub body: String,
  pub is_html: bool,
}

impl MailSendConfig {
  /// Recipients split on commas, trimmed, empties dropped.
  pub fn recipients(&self) -> Vec<String> {
    self
      .to
      .split(',')
      .map(str::trim)
      .filter(|s| !s.is_empty())
      .map(String::from)
      .collect()
  }
}

/// Ports are stored as text by some editors; accept both `"587"` and `587`.
fn port_from_text_or_number<'de, D>(deserializer: D) -> Result<u16, D::Error>
where
  D: Deserializer<'de>,
{
  #[derive(Deserialize)]
  #[serde(untagged)]
  enum Port {
    Number(u16),
    Text(String),
  }
  match Port::deserialize(deserializer)? {
    Port::Number(n) => Ok(n),
    Port::Text(s) if s.trim().is_empty() => Ok(0),
    Port::Text(s) => s.trim().parse().map_err(serde::de::Error::custom),
  }
}
