//! Conditional evaluation: an ordered clause list folded with a combinator.

use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::error::StructuralError;
use crate::types::{VarValue, VariableStore, parse_f64};

/// Comparison operator of a clause. Unrecognized tokens evaluate to `false`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Operator {
  Eq,
  Ne,
  Gt,
  Lt,
  Other(String),
}

impl From<String> for Operator {
  fn from(s: String) -> Self {
    match s.trim() {
      "==" => Operator::Eq,
      "!=" => Operator::Ne,
      ">" => Operator::Gt,
      "<" => Operator::Lt,
      _ => Operator::Other(s),
    }
  }
}

impl From<Operator> for String {
  fn from(op: Operator) -> Self {
    match op {
      Operator::Eq => "==".to_string(),
      Operator::Ne => "!=".to_string(),
      Operator::Gt => ">".to_string(),
      Operator::Lt => "<".to_string(),
      Operator::Other(s) => s,
    }
  }
}

/// How clause results are folded together.
///
/// `AND`/`OR` match case-insensitively. Any other token, including the empty string,
/// makes each clause replace the accumulated result (last clause wins).
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Combinator {
  #[default]
  And,
  Or,
  Other(String),
}

impl From<String> for Combinator {
  fn from(s: String) -> Self {
    match s.to_ascii_uppercase().as_str() {
      "AND" => Combinator::And,
      "OR" => Combinator::Or,
      _ => Combinator::Other(s),
    }
  }
}

impl From<Combinator> for String {
  fn from(c: Combinator) -> Self {
    match c {
      Combinator::And => "AND".to_string(),
      Combinator::Or => "OR".to_string(),
      Combinator::Other(s) => s,
    }
  }
}

/// One comparison: `variable operator literal`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Clause {
  pub variable: String,
  pub operator: Operator,
  pub value: String,
}

impl Clause {
  pub fn new(variable: impl Into<String>, operator: &str, value: impl Into<String>) -> Self {
    Self {
      variable: variable.into(),
      operator: Operator::from(operator.to_string()),
      value: value.into(),
    }
  }
}

/// Evaluates one clause against a variable's current value.
///
/// `>`/`<` compare as floats and yield `false` when either side does not parse.
#[instrument(level = "trace")]
pub fn evaluate_clause(clause: &Clause, current: &VarValue) -> bool {
  match &clause.operator {
    Operator::Eq => current.as_text() == clause.value,
    Operator::Ne => current.as_text() != clause.value,
    Operator::Gt => match (current.as_f64(), parse_f64(&clause.value)) {
      (Some(l), Some(r)) => l > r,
      _ => false,
    },
    Operator::Lt => match (current.as_f64(), parse_f64(&clause.value)) {
      (Some(l), Some(r)) => l < r,
      _ => false,
    },
    Operator::Other(_) => false,
  }
}

/// Left fold of clause results. An empty clause list is `false`.
pub fn combine(results: impl IntoIterator<Item = bool>, combinator: &Combinator) -> bool {
  let mut acc: Option<bool> = None;
  for r in results {
    acc = Some(match (acc, combinator) {
      (None, _) => r,
      (Some(a), Combinator::And) => a && r,
      (Some(a), Combinator::Or) => a || r,
      (Some(_), Combinator::Other(_)) => r,
    });
  }
  acc.unwrap_or(false)
}

/// Evaluates all clauses against the store.
///
/// Every clause is evaluated (no short-circuit), so a clause naming an undeclared
/// variable is reported even when an earlier clause already decides the outcome.
pub fn evaluate(
  node_id: &str,
  clauses: &[Clause],
  combinator: &Combinator,
  store: &VariableStore,
) -> Result<bool, StructuralError> {
  let mut results = Vec::with_capacity(clauses.len());
  for clause in clauses {
    let current = store
      .value(&clause.variable)
      .ok_or_else(|| StructuralError::MissingVariable {
        node_id: node_id.to_string(),
        name: clause.variable.clone(),
      })?;
    results.push(evaluate_clause(clause, current));
  }
  Ok(combine(results, combinator))
}
