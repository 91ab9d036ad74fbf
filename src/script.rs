//! Embedded code execution for code-exec nodes.
//!
//! Programs are Lua 5.4 chunks that define a global entry function, e.g.
//!
//! ```lua
//! function entry(a, b)
//!   return a + b
//! end
//! ```
//!
//! Each invocation gets a fresh interpreter with only the `string`, `table` and `math`
//! libraries loaded: no `io`, `os`, `package` or `debug`, and no access to flow variables
//! other than the bound parameters. This is the only isolation provided; the program still
//! runs in-process with the host's privileges, so flows should only run code from trusted
//! authors. A [ScriptCapability] implementation backed by a subprocess or a WASM runtime can
//! be swapped in where stronger isolation is needed.

use mlua::{Lua, LuaOptions, StdLib, Value, Variadic};
use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;
use tracing::instrument;

use crate::types::VarValue;

const CHUNK_NAME: &str = "flow_script";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScriptError {
  #[error("compile error: {0}")]
  Compile(String),
  #[error("Error: entry function '{0}' is not defined")]
  MissingEntry(String),
  #[error("Error executing code: {0}")]
  Runtime(String),
}

/// Host capability that checks and runs operator-authored programs.
pub trait ScriptCapability: Send + Sync {
  /// Compiles `program` without running it.
  fn validate(&self, program: &str) -> Result<(), ScriptError>;

  /// Runs `program` in a fresh environment and calls `entry` with `args` bound by name.
  fn invoke(
    &self,
    program: &str,
    entry: &str,
    args: &[(String, VarValue)],
  ) -> Result<VarValue, ScriptError>;
}

/// [ScriptCapability] backed by an embedded Lua interpreter.
#[derive(Debug, Clone, Default)]
pub struct LuaScriptEngine {
  memory_limit: Option<usize>,
}

impl LuaScriptEngine {
  pub fn new() -> Self {
    Self::default()
  }

  /// Caps interpreter memory; allocations beyond it raise a runtime error in the program.
  pub fn with_memory_limit(mut self, bytes: usize) -> Self {
    self.memory_limit = Some(bytes);
    self
  }

  fn new_state(&self) -> mlua::Result<Lua> {
    let lua = Lua::new_with(
      StdLib::STRING | StdLib::TABLE | StdLib::MATH,
      LuaOptions::default(),
    )?;
    if let Some(limit) = self.memory_limit {
      lua.set_memory_limit(limit)?;
    }
    Ok(lua)
  }
}

impl ScriptCapability for LuaScriptEngine {
  #[instrument(level = "trace", skip(self, program))]
  fn validate(&self, program: &str) -> Result<(), ScriptError> {
    let lua = self
      .new_state()
      .map_err(|e| ScriptError::Compile(e.to_string()))?;
    lua
      .load(program)
      .set_name(CHUNK_NAME)
      .into_function()
      .map(|_| ())
      .map_err(|e| ScriptError::Compile(e.to_string()))
  }

  #[instrument(level = "trace", skip(self, program, args))]
  fn invoke(
    &self,
    program: &str,
    entry: &str,
    args: &[(String, VarValue)],
  ) -> Result<VarValue, ScriptError> {
    let runtime = |e: mlua::Error| ScriptError::Runtime(e.to_string());
    let lua = self.new_state().map_err(runtime)?;
    lua
      .load(program)
      .set_name(CHUNK_NAME)
      .exec()
      .map_err(runtime)?;
    let func = match lua.globals().get::<Value>(entry).map_err(runtime)? {
      Value::Function(f) => f,
      _ => return Err(ScriptError::MissingEntry(entry.to_string())),
    };
    let ordered = bind_arguments(entry_parameters(program, entry), args)?;
    let values = ordered
      .into_iter()
      .map(|v| to_lua(&lua, v))
      .collect::<mlua::Result<Variadic<Value>>>()
      .map_err(runtime)?;
    let result: Value = func.call(values).map_err(runtime)?;
    Ok(from_lua(result))
  }
}

/// Parameter names of `entry` as declared in the program text, if the declaration is found.
pub(crate) fn entry_parameters(program: &str, entry: &str) -> Option<Vec<String>> {
  static DECL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
      r"(?m)(?:^|[^.\w])function\s+([A-Za-z_]\w*)\s*\(([^)]*)\)|(?:^|[^.\w])([A-Za-z_]\w*)\s*=\s*function\s*\(([^)]*)\)",
    )
    .expect("declaration pattern is valid")
  });
  DECL.captures_iter(program).find_map(|c| {
    let (name, params) = match (c.get(1), c.get(2), c.get(3), c.get(4)) {
      (Some(n), Some(p), _, _) => (n.as_str(), p.as_str()),
      (_, _, Some(n), Some(p)) => (n.as_str(), p.as_str()),
      _ => return None,
    };
    (name == entry).then(|| {
      params
        .split(',')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(String::from)
        .collect()
    })
  })
}

/// Orders supplied arguments to match the declared parameter list.
///
/// Every declared parameter must be supplied, and every supplied argument must match a
/// declared parameter unless the function is variadic (`...`), in which case the extras
/// follow in supplied order. Without a declaration the supplied order is used.
pub(crate) fn bind_arguments<'a>(
  declared: Option<Vec<String>>,
  args: &'a [(String, VarValue)],
) -> Result<Vec<&'a VarValue>, ScriptError> {
  let Some(declared) = declared else {
    return Ok(args.iter().map(|(_, v)| v).collect());
  };
  let variadic = declared.iter().any(|p| p == "...");
  let named: Vec<&String> = declared.iter().filter(|p| *p != "...").collect();
  let mut ordered = Vec::with_capacity(args.len());
  for param in &named {
    let value = args
      .iter()
      .find(|(n, _)| n == *param)
      .map(|(_, v)| v)
      .ok_or_else(|| ScriptError::Runtime(format!("missing argument '{}'", param)))?;
    ordered.push(value);
  }
  for (name, value) in args {
    if !named.iter().any(|p| *p == name) {
      if !variadic {
        return Err(ScriptError::Runtime(format!(
          "unexpected argument '{}'",
          name
        )));
      }
      ordered.push(value);
    }
  }
  Ok(ordered)
}

fn to_lua(lua: &Lua, value: &VarValue) -> mlua::Result<Value> {
  Ok(match value {
    VarValue::Boolean(b) => Value::Boolean(*b),
    VarValue::Integer(i) => Value::Integer(*i),
    VarValue::String(s) => Value::String(lua.create_string(s)?),
  })
}

fn from_lua(value: Value) -> VarValue {
  match value {
    Value::Nil => VarValue::String(String::new()),
    Value::Boolean(b) => VarValue::Boolean(b),
    Value::Integer(i) => VarValue::Integer(i),
    Value::Number(n) => VarValue::String(n.to_string()),
    Value::String(s) => VarValue::String(s.to_string_lossy().to_string()),
    other => VarValue::String(format!("<{}>", other.type_name())),
  }
}
