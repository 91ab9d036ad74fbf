//! Tests for `VarValue`.

use super::{VarType, VarValue};

#[test]
fn display_uses_decimal_form() {
  assert_eq!(VarValue::Integer(5).as_text(), "5");
  assert_eq!(VarValue::Integer(-12).as_text(), "-12");
  assert_eq!(VarValue::Boolean(true).as_text(), "true");
  assert_eq!(VarValue::from("Ana").as_text(), "Ana");
}

#[test]
fn as_f64_parses_numeric_text_only() {
  assert_eq!(VarValue::from(" 2.5 ").as_f64(), Some(2.5));
  assert_eq!(VarValue::Integer(3).as_f64(), Some(3.0));
  assert_eq!(VarValue::from("abc").as_f64(), None);
  assert_eq!(VarValue::Boolean(true).as_f64(), None);
}

#[test]
fn coerce_to_integer_when_text_parses() {
  assert_eq!(VarValue::from("42").coerce_to(VarType::Integer), VarValue::Integer(42));
  assert_eq!(
    VarValue::from("forty").coerce_to(VarType::Integer),
    VarValue::from("forty")
  );
}

#[test]
fn coerce_to_boolean_and_string() {
  assert_eq!(VarValue::from("TRUE").coerce_to(VarType::Boolean), VarValue::Boolean(true));
  assert_eq!(VarValue::from("no").coerce_to(VarType::Boolean), VarValue::Boolean(false));
  assert_eq!(VarValue::Integer(7).coerce_to(VarType::String), VarValue::from("7"));
}

#[test]
fn from_json_respects_declared_type() {
  let v = VarValue::from_json(&serde_json::json!("10"), VarType::Integer);
  assert_eq!(v, VarValue::Integer(10));
  let v = VarValue::from_json(&serde_json::json!(null), VarType::Boolean);
  assert_eq!(v, VarValue::Boolean(false));
  let v = VarValue::from_json(&serde_json::json!(3), VarType::String);
  assert_eq!(v, VarValue::from("3"));
}

#[test]
fn serializes_untagged() {
  let json = serde_json::to_string(&vec![
    VarValue::from("x"),
    VarValue::Integer(1),
    VarValue::Boolean(false),
  ])
  .unwrap();
  assert_eq!(json, r#"["x",1,false]"#);
  let back: Vec<VarValue> = serde_json::from_str(&json).unwrap();
  assert_eq!(back[1], VarValue::Integer(1));
  assert_eq!(back[2], VarValue::Boolean(false));
}
