//! Doubles for node and runner tests.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::adapters::{ChatMessage, MailRequest, MailSender, ModelChat};
use crate::context::{ExecutionContext, Services};
use crate::error::AdapterError;
use crate::host::MemoryNotifier;
use crate::script::LuaScriptEngine;
use crate::types::VariableStore;

/// Replies with a fixed text, or fails when `reply` is `None`. Records every call.
#[derive(Default)]
pub(crate) struct StubModel {
  pub reply: Option<String>,
  pub calls: Mutex<Vec<(String, Vec<ChatMessage>)>>,
}

impl StubModel {
  pub fn replying(reply: &str) -> Self {
    Self {
      reply: Some(reply.to_string()),
      calls: Mutex::new(vec![]),
    }
  }

  pub fn calls(&self) -> Vec<(String, Vec<ChatMessage>)> {
    self.calls.lock().unwrap().clone()
  }
}

#[async_trait]
impl ModelChat for StubModel {
  async fn chat(&self, model: &str, messages: &[ChatMessage]) -> Result<String, AdapterError> {
    self
      .calls
      .lock()
      .unwrap()
      .push((model.to_string(), messages.to_vec()));
    self
      .reply
      .clone()
      .ok_or_else(|| AdapterError::Request("connection refused".to_string()))
  }
}

#[derive(Default)]
pub(crate) struct StubMail {
  pub fail: bool,
  pub sent: Mutex<Vec<MailRequest>>,
}

impl StubMail {
  pub fn sent(&self) -> Vec<MailRequest> {
    self.sent.lock().unwrap().clone()
  }
}

#[async_trait]
impl MailSender for StubMail {
  async fn send(&self, mail: &MailRequest) -> Result<(), AdapterError> {
    if self.fail {
      return Err(AdapterError::Request("smtp unavailable".to_string()));
    }
    self.sent.lock().unwrap().push(mail.clone());
    Ok(())
  }
}

pub(crate) struct Harness {
  pub model: Arc<StubModel>,
  pub mail: Arc<StubMail>,
  pub notifier: Arc<MemoryNotifier>,
}

impl Harness {
  pub fn new() -> Self {
    Self::with(StubModel::replying("stub reply"), StubMail::default())
  }

  pub fn with(model: StubModel, mail: StubMail) -> Self {
    Self {
      model: Arc::new(model),
      mail: Arc::new(mail),
      notifier: Arc::new(MemoryNotifier::new()),
    }
  }

  pub fn services(&self) -> Services {
    Services {
      model: self.model.clone(),
      mail: self.mail.clone(),
      script: Arc::new(LuaScriptEngine::new()),
      notifier: self.notifier.clone(),
    }
  }

  pub fn context(&self, variables: VariableStore) -> ExecutionContext {
    ExecutionContext::new(variables, self.services())
  }
}
