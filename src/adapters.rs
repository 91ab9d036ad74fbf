//! Adapters to external services: model chat (Ollama) and mail delivery (SMTP).
//!
//! Both are single best-effort attempts; callers turn failures into text and continue.

use std::time::Duration;

use async_trait::async_trait;
use lettre::message::Mailbox;
use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::error::AdapterError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
  System,
  User,
  Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
  pub role: ChatRole,
  pub content: String,
}

impl ChatMessage {
  pub fn system(content: impl Into<String>) -> Self {
    Self {
      role: ChatRole::System,
      content: content.into(),
    }
  }

  pub fn user(content: impl Into<String>) -> Self {
    Self {
      role: ChatRole::User,
      content: content.into(),
    }
  }
}

/// Sends a message list to a chat model and returns one complete text reply.
#[async_trait]
pub trait ModelChat: Send + Sync {
  async fn chat(&self, model: &str, messages: &[ChatMessage]) -> Result<String, AdapterError>;
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
  model: &'a str,
  messages: &'a [ChatMessage],
  stream: bool,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
  message: ChatMessage,
}

/// [ModelChat] over the Ollama HTTP API (`POST /api/chat`, non-streaming).
#[derive(Debug, Clone)]
pub struct OllamaChat {
  http: reqwest::Client,
  base_url: String,
}

impl OllamaChat {
  pub fn new(base_url: impl Into<String>, timeout: Option<Duration>) -> Result<Self, AdapterError> {
    let mut builder = reqwest::Client::builder();
    if let Some(timeout) = timeout {
      builder = builder.timeout(timeout);
    }
    let http = builder
      .build()
      .map_err(|e| AdapterError::Request(e.to_string()))?;
    Ok(Self {
      http,
      base_url: base_url.into().trim_end_matches('/').to_string(),
    })
  }

  pub fn base_url(&self) -> &str {
    &self.base_url
  }
}

#[async_trait]
impl ModelChat for OllamaChat {
  #[instrument(level = "trace", skip(self, messages))]
  async fn chat(&self, model: &str, messages: &[ChatMessage]) -> Result<String, AdapterError> {
    if model.trim().is_empty() {
      return Err(AdapterError::InvalidInput("model name is empty".to_string()));
    }
    let url = format!("{}/api/chat", self.base_url);
    debug!(%url, model, messages = messages.len(), "sending chat request");
    let response = self
      .http
      .post(&url)
      .json(&ChatRequest {
        model,
        messages,
        stream: false,
      })
      .send()
      .await
      .map_err(|e| AdapterError::Request(e.to_string()))?;
    let status = response.status();
    if !status.is_success() {
      let body = response.text().await.unwrap_or_default();
      return Err(AdapterError::Response(format!("HTTP {}: {}", status, body)));
    }
    let parsed: ChatResponse = response
      .json()
      .await
      .map_err(|e| AdapterError::Response(e.to_string()))?;
    Ok(parsed.message.content)
  }
}

/// Everything needed to deliver one message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MailRequest {
  pub server: String,
  /// 0 selects the transport's default submission port.
  pub port: u16,
  pub user: String,
  pub password: String,
  pub from: String,
  pub recipients: Vec<String>,
  pub subject: String,
  pub body: String,
  pub is_html: bool,
}

#[async_trait]
pub trait MailSender: Send + Sync {
  async fn send(&self, mail: &MailRequest) -> Result<(), AdapterError>;
}

/// [MailSender] over SMTP with STARTTLS and login credentials.
#[derive(Debug, Clone, Default)]
pub struct SmtpMailer;

impl SmtpMailer {
  /// Builds the MIME message without sending it.
  pub fn build_message(mail: &MailRequest) -> Result<Message, AdapterError> {
    let invalid = |e: String| AdapterError::InvalidInput(e);
    let from = mail
      .from
      .parse::<Mailbox>()
      .map_err(|e| invalid(format!("from '{}': {}", mail.from, e)))?;
    let mut builder = Message::builder().from(from).subject(mail.subject.clone());
    for to in &mail.recipients {
      let mailbox = to
        .parse::<Mailbox>()
        .map_err(|e| invalid(format!("recipient '{}': {}", to, e)))?;
      builder = builder.to(mailbox);
    }
    let content_type = if mail.is_html {
      ContentType::TEXT_HTML
    } else {
      ContentType::TEXT_PLAIN
    };
    builder
      .header(content_type)
      .body(mail.body.clone())
      .map_err(|e| invalid(e.to_string()))
  }
}

#[async_trait]
impl MailSender for SmtpMailer {
  #[instrument(level = "trace", skip(self, mail), fields(server = %mail.server))]
  async fn send(&self, mail: &MailRequest) -> Result<(), AdapterError> {
    let message = Self::build_message(mail)?;
    let mut transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&mail.server)
      .map_err(|e| AdapterError::Request(e.to_string()))?
      .credentials(Credentials::new(mail.user.clone(), mail.password.clone()));
    if mail.port != 0 {
      transport = transport.port(mail.port);
    }
    transport
      .build()
      .send(message)
      .await
      .map_err(|e| AdapterError::Request(e.to_string()))?;
    Ok(())
  }
}
