//! A named, typed variable.

use serde::{Deserialize, Serialize};

use super::{VarType, VarValue};

/// A named, typed variable held by the [VariableStore](super::VariableStore).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Variable {
  pub name: String,
  pub var_type: VarType,
  pub value: VarValue,
}

impl Variable {
  pub fn new(name: impl Into<String>, var_type: VarType, value: VarValue) -> Self {
    Self {
      name: name.into(),
      var_type,
      value: value.coerce_to(var_type),
    }
  }
}
