//! Host capabilities the engine consumes but does not own: operator prompts and notices.

use std::collections::VecDeque;
use std::fmt;
use std::sync::Mutex;

use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

use crate::types::InputRequest;

/// Answers input requests raised by suspended nodes. `None` means the operator cancelled.
#[async_trait]
pub trait Prompter: Send {
  async fn prompt(&mut self, request: &InputRequest) -> Option<String>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
  /// Text emitted by a print action.
  Output,
  Info,
  Warning,
  Error,
}

impl fmt::Display for NoticeKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let s = match self {
      NoticeKind::Output => "output",
      NoticeKind::Info => "info",
      NoticeKind::Warning => "warning",
      NoticeKind::Error => "error",
    };
    f.write_str(s)
  }
}

/// Receives operator-facing notices.
pub trait Notifier: Send + Sync {
  fn notify(&self, kind: NoticeKind, message: &str);
}

/// Prints output to stdout and everything else to stderr.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdoutNotifier;

impl Notifier for StdoutNotifier {
  fn notify(&self, kind: NoticeKind, message: &str) {
    match kind {
      NoticeKind::Output => println!("{}", message),
      other => eprintln!("[{}] {}", other, message),
    }
  }
}

/// Records notices in memory.
#[derive(Debug, Default)]
pub struct MemoryNotifier {
  notices: Mutex<Vec<(NoticeKind, String)>>,
}

impl MemoryNotifier {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn notices(&self) -> Vec<(NoticeKind, String)> {
    self
      .notices
      .lock()
      .map(|n| n.clone())
      .unwrap_or_default()
  }

  /// Messages of the given kind, in order.
  pub fn messages(&self, kind: NoticeKind) -> Vec<String> {
    self
      .notices()
      .into_iter()
      .filter(|(k, _)| *k == kind)
      .map(|(_, m)| m)
      .collect()
  }
}

impl Notifier for MemoryNotifier {
  fn notify(&self, kind: NoticeKind, message: &str) {
    if let Ok(mut notices) = self.notices.lock() {
      notices.push((kind, message.to_string()));
    }
  }
}

/// Asks on stdout and reads one line from stdin per request. End of input cancels.
pub struct TerminalPrompter {
  lines: tokio::io::Lines<BufReader<tokio::io::Stdin>>,
}

impl TerminalPrompter {
  pub fn new() -> Self {
    Self {
      lines: BufReader::new(tokio::io::stdin()).lines(),
    }
  }
}

impl Default for TerminalPrompter {
  fn default() -> Self {
    Self::new()
  }
}

/// Text shown for a request: title, question and numbered options.
pub fn render_request(request: &InputRequest) -> String {
  let mut out = String::new();
  if !request.title.is_empty() {
    out.push_str(&format!("[{}] ", request.title));
  }
  out.push_str(&request.question);
  for (i, option) in request.options.iter().enumerate() {
    out.push_str(&format!("\n  {}) {}", i + 1, option));
  }
  out.push_str("\n> ");
  out
}

/// Maps a numeric answer to the matching option; other answers pass through.
pub fn pick_option(request: &InputRequest, answer: &str) -> String {
  let trimmed = answer.trim();
  trimmed
    .parse::<usize>()
    .ok()
    .and_then(|n| n.checked_sub(1))
    .and_then(|i| request.options.get(i))
    .cloned()
    .unwrap_or_else(|| trimmed.to_string())
}

#[async_trait]
impl Prompter for TerminalPrompter {
  async fn prompt(&mut self, request: &InputRequest) -> Option<String> {
    let mut stdout = tokio::io::stdout();
    stdout
      .write_all(render_request(request).as_bytes())
      .await
      .ok()?;
    stdout.flush().await.ok()?;
    let line = self.lines.next_line().await.ok()??;
    Some(pick_option(request, &line))
  }
}

/// Answers from a fixed queue, then from `fallback` (or cancels) once it is exhausted.
#[derive(Debug, Clone, Default)]
pub struct ScriptedPrompter {
  answers: VecDeque<String>,
  fallback: Option<String>,
  asked: Vec<InputRequest>,
}

impl ScriptedPrompter {
  pub fn new<I, S>(answers: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    Self {
      answers: answers.into_iter().map(Into::into).collect(),
      fallback: None,
      asked: vec![],
    }
  }

  pub fn with_fallback(mut self, fallback: impl Into<String>) -> Self {
    self.fallback = Some(fallback.into());
    self
  }

  /// Requests seen so far.
  pub fn asked(&self) -> &[InputRequest] {
    &self.asked
  }
}

#[async_trait]
impl Prompter for ScriptedPrompter {
  async fn prompt(&mut self, request: &InputRequest) -> Option<String> {
    self.asked.push(request.clone());
    self.answers.pop_front().or_else(|| self.fallback.clone())
  }
}
