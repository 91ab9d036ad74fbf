//! Named variable bindings shared by every node of a run.

use std::collections::BTreeMap;

use tracing::{debug, instrument};

use super::{VarType, VarValue, Variable};
use crate::error::FlowError;

/// Named, typed values; read/declare/update.
///
/// Iteration order is by name so snapshots and documents are stable.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VariableStore {
  variables: BTreeMap<String, Variable>,
}

impl VariableStore {
  pub fn new() -> Self {
    Self::default()
  }

  /// Declares a new variable. Fails if the name is already declared.
  pub fn declare(
    &mut self,
    name: impl Into<String>,
    var_type: VarType,
    value: VarValue,
  ) -> Result<&Variable, FlowError> {
    let name = name.into();
    if self.variables.contains_key(&name) {
      return Err(FlowError::DuplicateVariable(name));
    }
    let var = Variable::new(name.clone(), var_type, value);
    Ok(self.variables.entry(name).or_insert(var))
  }

  /// Inserts or replaces a whole variable (used when loading documents).
  pub fn insert(&mut self, variable: Variable) {
    self.variables.insert(variable.name.clone(), variable);
  }

  pub fn get(&self, name: &str) -> Option<&Variable> {
    self.variables.get(name)
  }

  pub fn value(&self, name: &str) -> Option<&VarValue> {
    self.variables.get(name).map(|v| &v.value)
  }

  pub fn contains(&self, name: &str) -> bool {
    self.variables.contains_key(name)
  }

  /// Writes a value. Declared variables coerce to their type; undeclared names are
  /// created with the type of the value written.
  #[instrument(level = "trace", skip(self, value))]
  pub fn update(&mut self, name: &str, value: VarValue) {
    match self.variables.get_mut(name) {
      Some(var) => {
        var.value = value.coerce_to(var.var_type);
        debug!(variable = name, value = %var.value, "variable updated");
      }
      None => {
        debug!(variable = name, value = %value, "variable created on first write");
        let var_type = value.var_type();
        self
          .variables
          .insert(name.to_string(), Variable::new(name, var_type, value));
      }
    }
  }

  pub fn iter(&self) -> impl Iterator<Item = &Variable> {
    self.variables.values()
  }

  pub fn len(&self) -> usize {
    self.variables.len()
  }

  pub fn is_empty(&self) -> bool {
    self.variables.is_empty()
  }

  /// Flat name → value map of the current bindings.
  pub fn snapshot(&self) -> BTreeMap<String, VarValue> {
    self
      .variables
      .iter()
      .map(|(k, v)| (k.clone(), v.value.clone()))
      .collect()
  }
}

impl FromIterator<Variable> for VariableStore {
  fn from_iter<I: IntoIterator<Item = Variable>>(iter: I) -> Self {
    let mut store = VariableStore::new();
    for var in iter {
      store.insert(var);
    }
    store
  }
}
