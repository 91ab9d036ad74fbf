//! Tests for `condition`.

use crate::condition::{Clause, Combinator, Operator, combine, evaluate, evaluate_clause};
use crate::error::StructuralError;
use crate::types::{VarType, VarValue, VariableStore};

fn store_with(name: &str, value: VarValue) -> VariableStore {
  let mut store = VariableStore::new();
  store.update(name, value);
  store
}

#[test]
fn equality_compares_decimal_string() {
  let clauses = vec![Clause::new("x", "==", "5")];
  let s = store_with("x", VarValue::from("5"));
  assert!(evaluate("c", &clauses, &Combinator::And, &s).unwrap());
  let s = store_with("x", VarValue::from("6"));
  assert!(!evaluate("c", &clauses, &Combinator::And, &s).unwrap());
}

#[test]
fn equality_on_integer_variable() {
  let mut s = VariableStore::new();
  s.declare("n", VarType::Integer, VarValue::Integer(5)).unwrap();
  assert!(evaluate("c", &[Clause::new("n", "==", "5")], &Combinator::And, &s).unwrap());
  assert!(evaluate("c", &[Clause::new("n", "!=", "5.0")], &Combinator::And, &s).unwrap());
}

#[test]
fn numeric_parse_failure_is_false() {
  let s = store_with("x", VarValue::from("10"));
  assert!(!evaluate("c", &[Clause::new("x", ">", "abc")], &Combinator::And, &s).unwrap());
  assert!(!evaluate("c", &[Clause::new("x", "<", "abc")], &Combinator::And, &s).unwrap());
  let s = store_with("x", VarValue::from("ten"));
  assert!(!evaluate("c", &[Clause::new("x", ">", "1")], &Combinator::And, &s).unwrap());
}

#[test]
fn numeric_comparisons() {
  let v = VarValue::from("2.5");
  assert!(evaluate_clause(&Clause::new("x", ">", "2"), &v));
  assert!(evaluate_clause(&Clause::new("x", "<", "10"), &v));
  assert!(!evaluate_clause(&Clause::new("x", "<", "2.5"), &v));
}

#[test]
fn unknown_operator_is_false() {
  let clause = Clause::new("x", ">=", "1");
  assert_eq!(clause.operator, Operator::Other(">=".to_string()));
  assert!(!evaluate_clause(&clause, &VarValue::Integer(5)));
}

#[test]
fn and_or_fold() {
  assert!(!combine([true, false], &Combinator::And));
  assert!(combine([true, true], &Combinator::And));
  assert!(combine([false, true], &Combinator::Or));
  assert!(!combine([false, false], &Combinator::Or));
}

#[test]
fn unrecognized_combinator_last_clause_wins() {
  let empty = Combinator::from(String::new());
  assert!(combine([false, true], &empty));
  assert!(!combine([true, false], &empty));
  let xor = Combinator::from("XOR".to_string());
  assert!(!combine([true, true, false], &xor));
}

#[test]
fn combinator_is_case_insensitive() {
  assert_eq!(Combinator::from("or".to_string()), Combinator::Or);
  assert_eq!(Combinator::from("And".to_string()), Combinator::And);
}

#[test]
fn two_clauses_with_empty_combinator_take_second() {
  let mut s = VariableStore::new();
  s.update("a", VarValue::from("1"));
  s.update("b", VarValue::from("2"));
  let clauses = vec![Clause::new("a", "==", "1"), Clause::new("b", "==", "3")];
  let empty = Combinator::from(String::new());
  assert!(!evaluate("c", &clauses, &empty, &s).unwrap());
  let clauses = vec![Clause::new("a", "==", "9"), Clause::new("b", "==", "2")];
  assert!(evaluate("c", &clauses, &empty, &s).unwrap());
}

#[test]
fn empty_clause_list_is_false() {
  let s = VariableStore::new();
  assert!(!evaluate("c", &[], &Combinator::Or, &s).unwrap());
}

#[test]
fn missing_variable_is_structural() {
  let s = VariableStore::new();
  let err = evaluate("cond1", &[Clause::new("ghost", "==", "1")], &Combinator::And, &s)
    .unwrap_err();
  assert_eq!(
    err,
    StructuralError::MissingVariable {
      node_id: "cond1".to_string(),
      name: "ghost".to_string()
    }
  );
}

#[test]
fn clause_serde_shape() {
  let c: Clause =
    serde_json::from_str(r#"{"variable":"x","operator":"!=","value":"y"}"#).unwrap();
  assert_eq!(c.operator, Operator::Ne);
  let json = serde_json::to_value(&c).unwrap();
  assert_eq!(json["operator"], "!=");
}
