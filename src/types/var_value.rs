//! Typed variable values and the coercion rules used by conditionals and templates.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Declared type tag of a variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum VarType {
  #[default]
  String,
  Integer,
  Boolean,
}

impl fmt::Display for VarType {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      VarType::String => write!(f, "string"),
      VarType::Integer => write!(f, "integer"),
      VarType::Boolean => write!(f, "boolean"),
    }
  }
}

/// Current value of a variable.
///
/// Serialized untagged so the persisted form is plain JSON (`"text"`, `42`, `true`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum VarValue {
  Boolean(bool),
  Integer(i64),
  String(String),
}

impl VarValue {
  /// Type tag matching the runtime shape of the value.
  pub fn var_type(&self) -> VarType {
    match self {
      VarValue::String(_) => VarType::String,
      VarValue::Integer(_) => VarType::Integer,
      VarValue::Boolean(_) => VarType::Boolean,
    }
  }

  /// Decimal-string form used by `==`/`!=` clauses and template substitution.
  pub fn as_text(&self) -> String {
    self.to_string()
  }

  /// Parses the decimal-string form as a float; `None` when it is not numeric.
  pub fn as_f64(&self) -> Option<f64> {
    match self {
      VarValue::Integer(i) => Some(*i as f64),
      VarValue::Boolean(_) => None,
      VarValue::String(s) => parse_f64(s),
    }
  }

  /// Converts the value to `target` when its text form parses; otherwise returns it unchanged.
  pub fn coerce_to(self, target: VarType) -> VarValue {
    match (target, self) {
      (VarType::String, v) => VarValue::String(v.as_text()),
      (VarType::Integer, VarValue::String(s)) => match s.trim().parse::<i64>() {
        Ok(i) => VarValue::Integer(i),
        Err(_) => VarValue::String(s),
      },
      (VarType::Boolean, VarValue::String(s)) => match parse_bool(&s) {
        Some(b) => VarValue::Boolean(b),
        None => VarValue::String(s),
      },
      (_, v) => v,
    }
  }

  /// Builds the initial value for a freshly declared variable from its raw JSON.
  pub fn from_json(raw: &serde_json::Value, var_type: VarType) -> VarValue {
    let value = match raw {
      serde_json::Value::Null => return VarValue::default_for(var_type),
      serde_json::Value::Bool(b) => VarValue::Boolean(*b),
      serde_json::Value::Number(n) => match n.as_i64() {
        Some(i) => VarValue::Integer(i),
        None => VarValue::String(n.to_string()),
      },
      serde_json::Value::String(s) => VarValue::String(s.clone()),
      other => VarValue::String(other.to_string()),
    };
    value.coerce_to(var_type)
  }

  /// Zero value for a type: `""`, `0` or `false`.
  pub fn default_for(var_type: VarType) -> VarValue {
    match var_type {
      VarType::String => VarValue::String(String::new()),
      VarType::Integer => VarValue::Integer(0),
      VarType::Boolean => VarValue::Boolean(false),
    }
  }
}

impl fmt::Display for VarValue {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      VarValue::String(s) => f.write_str(s),
      VarValue::Integer(i) => write!(f, "{}", i),
      VarValue::Boolean(b) => write!(f, "{}", b),
    }
  }
}

impl From<&str> for VarValue {
  fn from(s: &str) -> Self {
    VarValue::String(s.to_string())
  }
}

impl From<String> for VarValue {
  fn from(s: String) -> Self {
    VarValue::String(s)
  }
}

impl From<i64> for VarValue {
  fn from(i: i64) -> Self {
    VarValue::Integer(i)
  }
}

impl From<bool> for VarValue {
  fn from(b: bool) -> Self {
    VarValue::Boolean(b)
  }
}

/// Float parse with surrounding whitespace ignored.
pub(crate) fn parse_f64(s: &str) -> Option<f64> {
  s.trim().parse::<f64>().ok()
}

fn parse_bool(s: &str) -> Option<bool> {
  match s.trim().to_ascii_lowercase().as_str() {
    "true" | "1" | "yes" => Some(true),
    "false" | "0" | "no" => Some(false),
    _ => None,
  }
}
