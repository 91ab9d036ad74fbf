//! Tests for `VariableStore`.

use super::{VarType, VarValue, Variable, VariableStore};
use crate::error::FlowError;

#[test]
fn declare_then_read() {
  let mut store = VariableStore::new();
  store.declare("count", VarType::Integer, VarValue::from("3")).unwrap();
  assert_eq!(store.value("count"), Some(&VarValue::Integer(3)));
  assert!(store.contains("count"));
  assert_eq!(store.len(), 1);
}

#[test]
fn declare_twice_fails() {
  let mut store = VariableStore::new();
  store.declare("x", VarType::String, VarValue::from("a")).unwrap();
  let err = store.declare("x", VarType::String, VarValue::from("b")).unwrap_err();
  assert!(matches!(err, FlowError::DuplicateVariable(ref n) if n == "x"));
  assert_eq!(store.value("x"), Some(&VarValue::from("a")));
}

#[test]
fn update_coerces_declared_type() {
  let mut store = VariableStore::new();
  store.declare("age", VarType::Integer, VarValue::Integer(0)).unwrap();
  store.update("age", VarValue::from("41"));
  assert_eq!(store.value("age"), Some(&VarValue::Integer(41)));
  store.update("age", VarValue::from("unknown"));
  assert_eq!(store.value("age"), Some(&VarValue::from("unknown")));
}

#[test]
fn update_creates_undeclared_with_value_type() {
  let mut store = VariableStore::new();
  store.update("reply", VarValue::from("hi"));
  store.update("total", VarValue::Integer(5));
  store.update("flag", VarValue::Boolean(true));
  let reply = store.get("reply").unwrap();
  assert_eq!(reply.var_type, VarType::String);
  assert_eq!(reply.value, VarValue::from("hi"));
  let total = store.get("total").unwrap();
  assert_eq!(total.var_type, VarType::Integer);
  assert_eq!(total.value, VarValue::Integer(5));
  let flag = store.get("flag").unwrap();
  assert_eq!(flag.var_type, VarType::Boolean);
  assert_eq!(flag.value, VarValue::Boolean(true));
}

#[test]
fn auto_created_variable_keeps_type_on_later_writes() {
  let mut store = VariableStore::new();
  store.update("total", VarValue::Integer(5));
  store.update("total", VarValue::from("7"));
  assert_eq!(store.value("total"), Some(&VarValue::Integer(7)));
}

#[test]
fn snapshot_is_flat_and_sorted() {
  let store: VariableStore = vec![
    Variable::new("b", VarType::Boolean, VarValue::Boolean(true)),
    Variable::new("a", VarType::String, VarValue::from("x")),
  ]
  .into_iter()
  .collect();
  let snap = store.snapshot();
  let keys: Vec<_> = snap.keys().cloned().collect();
  assert_eq!(keys, vec!["a", "b"]);
  assert_eq!(snap["b"], VarValue::Boolean(true));
}
