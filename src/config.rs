//! Runner configuration with defaults and environment overrides.

use std::path::PathBuf;
use std::time::Duration;

use tracing::warn;

/// Default directory for run memory records.
pub const DEFAULT_MEMORY_DIR: &str = "memory";

/// Default Ollama endpoint.
pub const DEFAULT_OLLAMA_URL: &str = "http://localhost:11434";

pub const ENV_MEMORY_DIR: &str = "BRANCHFLOW_MEMORY_DIR";
pub const ENV_OLLAMA_URL: &str = "BRANCHFLOW_OLLAMA_URL";
pub const ENV_MODEL_TIMEOUT_SECS: &str = "BRANCHFLOW_MODEL_TIMEOUT_SECS";
pub const ENV_SCRIPT_MEMORY_LIMIT: &str = "BRANCHFLOW_SCRIPT_MEMORY_LIMIT";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunnerConfig {
  /// Where `<uuid>.json` memory records are written. `None` disables persistence.
  pub memory_dir: Option<PathBuf>,
  pub ollama_url: String,
  /// Bounded wait for model replies; `None` waits indefinitely.
  pub model_timeout: Option<Duration>,
  /// Memory cap in bytes for code-exec interpreters.
  pub script_memory_limit: Option<usize>,
}

impl Default for RunnerConfig {
  fn default() -> Self {
    Self {
      memory_dir: Some(PathBuf::from(DEFAULT_MEMORY_DIR)),
      ollama_url: DEFAULT_OLLAMA_URL.to_string(),
      model_timeout: None,
      script_memory_limit: None,
    }
  }
}

impl RunnerConfig {
  /// Defaults with environment overrides applied.
  pub fn from_env() -> Self {
    let mut config = Self::default();
    config.apply_env(|key| std::env::var(key).ok());
    config
  }

  /// Applies overrides from `lookup`. Unparseable numbers are ignored with a warning.
  pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
    if let Some(dir) = lookup(ENV_MEMORY_DIR).filter(|s| !s.is_empty()) {
      self.memory_dir = Some(PathBuf::from(dir));
    }
    if let Some(url) = lookup(ENV_OLLAMA_URL).filter(|s| !s.is_empty()) {
      self.ollama_url = url;
    }
    if let Some(raw) = lookup(ENV_MODEL_TIMEOUT_SECS) {
      match raw.trim().parse::<u64>() {
        Ok(0) => self.model_timeout = None,
        Ok(secs) => self.model_timeout = Some(Duration::from_secs(secs)),
        Err(_) => warn!(key = ENV_MODEL_TIMEOUT_SECS, value = %raw, "ignoring invalid value"),
      }
    }
    if let Some(raw) = lookup(ENV_SCRIPT_MEMORY_LIMIT) {
      match raw.trim().parse::<usize>() {
        Ok(0) => self.script_memory_limit = None,
        Ok(bytes) => self.script_memory_limit = Some(bytes),
        Err(_) => warn!(key = ENV_SCRIPT_MEMORY_LIMIT, value = %raw, "ignoring invalid value"),
      }
    }
  }
}
