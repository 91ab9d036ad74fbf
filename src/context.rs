//! Per-run execution context: the variable store plus the host services nodes call into.

use std::sync::Arc;

use crate::adapters::{MailSender, ModelChat, OllamaChat, SmtpMailer};
use crate::config::RunnerConfig;
use crate::error::AdapterError;
use crate::host::{Notifier, StdoutNotifier};
use crate::script::{LuaScriptEngine, ScriptCapability};
use crate::types::VariableStore;

/// Capabilities injected by the host. Shared, never mutated by the engine.
#[derive(Clone)]
pub struct Services {
  pub model: Arc<dyn ModelChat>,
  pub mail: Arc<dyn MailSender>,
  pub script: Arc<dyn ScriptCapability>,
  pub notifier: Arc<dyn Notifier>,
}

impl Services {
  /// Real adapters: Ollama chat, SMTP mail, Lua scripts, stdout notices.
  pub fn from_config(config: &RunnerConfig) -> Result<Self, AdapterError> {
    let mut script = LuaScriptEngine::new();
    if let Some(limit) = config.script_memory_limit {
      script = script.with_memory_limit(limit);
    }
    Ok(Self {
      model: Arc::new(OllamaChat::new(&config.ollama_url, config.model_timeout)?),
      mail: Arc::new(SmtpMailer),
      script: Arc::new(script),
      notifier: Arc::new(StdoutNotifier),
    })
  }

  pub fn with_model(mut self, model: Arc<dyn ModelChat>) -> Self {
    self.model = model;
    self
  }

  pub fn with_mail(mut self, mail: Arc<dyn MailSender>) -> Self {
    self.mail = mail;
    self
  }

  pub fn with_script(mut self, script: Arc<dyn ScriptCapability>) -> Self {
    self.script = script;
    self
  }

  pub fn with_notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
    self.notifier = notifier;
    self
  }
}

/// Engine-owned state threaded through every node of one run.
pub struct ExecutionContext {
  pub variables: VariableStore,
  pub services: Services,
}

impl ExecutionContext {
  pub fn new(variables: VariableStore, services: Services) -> Self {
    Self {
      variables,
      services,
    }
  }
}
