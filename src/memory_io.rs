//! Persistence of run memory records, execution logs and flow documents (JSON files).

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use tracing::instrument;
use uuid::Uuid;

use crate::error::FlowError;
use crate::types::{ExecutionLog, FlowDocument, VarValue};

/// Path of the memory record `id` under `dir`.
pub fn memory_path(dir: &Path, id: Uuid) -> PathBuf {
  dir.join(format!("{}.json", id))
}

fn invalid_data(e: serde_json::Error) -> std::io::Error {
  std::io::Error::new(std::io::ErrorKind::InvalidData, e)
}

fn write_json(path: &Path, json: String) -> Result<(), std::io::Error> {
  if let Some(parent) = path.parent() {
    std::fs::create_dir_all(parent)?;
  }
  std::fs::write(path, json)
}

/// Writes the final bindings of a run as a flat name → value JSON object at
/// `<dir>/<id>.json`, creating `dir` if needed.
#[instrument(level = "trace", skip(dir, values))]
pub fn save_memory(
  dir: &Path,
  id: Uuid,
  values: &BTreeMap<String, VarValue>,
) -> Result<PathBuf, std::io::Error> {
  let path = memory_path(dir, id);
  let json = serde_json::to_string_pretty(values).map_err(invalid_data)?;
  write_json(&path, json)?;
  Ok(path)
}

#[instrument(level = "trace", skip(path))]
pub fn load_memory(path: &Path) -> Result<BTreeMap<String, VarValue>, std::io::Error> {
  let bytes = std::fs::read(path)?;
  serde_json::from_slice(&bytes).map_err(invalid_data)
}

pub fn write_execution_log(path: &Path, log: &ExecutionLog) -> Result<(), std::io::Error> {
  let json = serde_json::to_string_pretty(log).map_err(invalid_data)?;
  write_json(path, json)
}

pub fn load_execution_log(path: &Path) -> Result<ExecutionLog, std::io::Error> {
  let bytes = std::fs::read(path)?;
  serde_json::from_slice(&bytes).map_err(invalid_data)
}

pub fn load_flow_document(path: &Path) -> Result<FlowDocument, FlowError> {
  let source = std::fs::read_to_string(path)?;
  FlowDocument::from_json(&source)
}

pub fn save_flow_document(path: &Path, document: &FlowDocument) -> Result<(), FlowError> {
  write_json(path, document.to_json_pretty()?)?;
  Ok(())
}
