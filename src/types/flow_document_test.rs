//! Tests for `FlowDocument`.

use super::{
  ActionConfig, CodeExecConfig, ConditionalConfig, FieldSource, FlowDocument, FlowGraph,
  FlowNode, ModelQueryConfig, NodeBehavior, VarType, VarValue, VariableStore,
};
use crate::condition::{Clause, Combinator};
use crate::error::FlowError;
use crate::script::LuaScriptEngine;

fn sample_graph() -> FlowGraph {
  let cond = ConditionalConfig {
    conditions: vec![Clause::new("age", ">", "17")],
    logical_operator: Combinator::Or,
  };
  let model = ModelQueryConfig {
    model: FieldSource::literal("llama3"),
    prompt: FieldSource::variable("question"),
    variable_name: Some("reply".to_string()),
    ..ModelQueryConfig::default()
  };
  FlowGraph::from_nodes(vec![
    FlowNode::new("s", NodeBehavior::Start).with_next("ask").with_position(10.0, 20.0),
    FlowNode::new("ask", NodeBehavior::Action(ActionConfig::ask("Age?", "age"))).with_next("c"),
    FlowNode::new("c", NodeBehavior::Conditional(cond)).with_branches(Some("m"), Some("code")),
    FlowNode::new("m", NodeBehavior::ModelQuery(model)).with_title("Ask model"),
    FlowNode::new(
      "code",
      NodeBehavior::CodeExec(CodeExecConfig::new(
        "function entry(a) return a end",
        &["age"],
        "out",
      )),
    ),
  ])
  .unwrap()
}

fn sample_vars() -> VariableStore {
  let mut v = VariableStore::new();
  v.declare("age", VarType::Integer, VarValue::Integer(30)).unwrap();
  v.declare("question", VarType::String, VarValue::from("Why?")).unwrap();
  v.declare("ok", VarType::Boolean, VarValue::Boolean(true)).unwrap();
  v
}

#[test]
fn encode_then_decode_preserves_graph_and_variables() {
  let graph = sample_graph();
  let vars = sample_vars();
  let doc = FlowDocument::encode(&graph, &vars, &LuaScriptEngine::default()).unwrap();
  let json = doc.to_json_pretty().unwrap();
  let (graph2, vars2) = FlowDocument::from_json(&json).unwrap().decode().unwrap();
  assert_eq!(graph2, graph);
  assert_eq!(vars2, vars);
}

#[test]
fn values_written_at_run_time_survive_encode_and_decode() {
  let graph = sample_graph();
  let mut vars = sample_vars();
  vars.update("total", VarValue::Integer(5));
  vars.update("flag", VarValue::Boolean(true));
  vars.update("note", VarValue::from("12 apples"));
  let doc = FlowDocument::encode(&graph, &vars, &LuaScriptEngine::default()).unwrap();
  let json = doc.to_json_pretty().unwrap();
  let (_, vars2) = FlowDocument::from_json(&json).unwrap().decode().unwrap();
  assert_eq!(vars2, vars);
  assert_eq!(vars2.value("total"), Some(&VarValue::Integer(5)));
  assert_eq!(vars2.value("flag"), Some(&VarValue::Boolean(true)));
}

#[test]
fn encode_rejects_code_that_does_not_compile() {
  let graph = FlowGraph::from_nodes(vec![
    FlowNode::new("s", NodeBehavior::Start).with_next("code"),
    FlowNode::new(
      "code",
      NodeBehavior::CodeExec(CodeExecConfig::new("function entry(a return", &["a"], "o")),
    ),
  ])
  .unwrap();
  let err =
    FlowDocument::encode(&graph, &VariableStore::new(), &LuaScriptEngine::default()).unwrap_err();
  assert!(matches!(err, FlowError::Configuration { ref node_id, .. } if node_id == "code"));
}

#[test]
fn decode_document_shape() {
  let json = r#"{
    "nodes": [
      {"id": "1", "x": 0, "y": 0, "node_type": "start", "text": "Start", "title": "",
       "config": {}, "connected_to": "2", "true_connection": null, "false_connection": null},
      {"id": "2", "x": 5, "y": 5, "node_type": "conditional", "text": "If", "title": "",
       "config": {"conditions": [{"variable": "n", "operator": "==", "value": "1"}],
                  "logical_operator": "AND"},
       "connected_to": null, "true_connection": "3", "false_connection": "gone"},
      {"id": "3", "x": 9, "y": 9, "node_type": "final", "text": "End", "title": "",
       "config": {}, "connected_to": null, "true_connection": null, "false_connection": null}
    ],
    "variables": [
      {"name": "n", "var_type": "integer", "value": "1"},
      {"name": "s", "var_type": "string", "value": null}
    ]
  }"#;
  let (graph, vars) = FlowDocument::from_json(json).unwrap().decode().unwrap();
  assert_eq!(graph.find_start().unwrap().id, "1");
  let cond = graph.get("2").unwrap();
  assert_eq!(cond.branch(true), Some("3"));
  assert_eq!(cond.branch(false), None);
  assert_eq!(graph.get("3").unwrap().behavior.tag(), "final");
  assert_eq!(vars.value("n"), Some(&VarValue::Integer(1)));
  assert_eq!(vars.value("s"), Some(&VarValue::from("")));
}

#[test]
fn decode_reports_bad_config_with_node_id() {
  let json = r#"{"nodes": [{"id": "bad", "node_type": "multiple_choice",
    "config": {"responses": "not-a-list"}}]}"#;
  let err = FlowDocument::from_json(json).unwrap().decode().unwrap_err();
  assert!(matches!(err, FlowError::Configuration { ref node_id, .. } if node_id == "bad"));
}
