//! Flow runner: a resumable traversal state machine over a [FlowGraph].
//!
//! - [FlowRunner::step] executes one node, or reports the input request blocking it.
//! - [FlowRunner::resume] answers the pending request and continues with the same node.
//! - [FlowRunner::run] drives the machine to completion with a [Prompter].
//!
//! On normal termination the final variable store is written once as a memory record
//! named by a fresh uuid, under `memory/` unless another directory is set. Structural
//! problems abort the run and write nothing.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::config::RunnerConfig;
use crate::context::{ExecutionContext, Services};
use crate::error::{FlowError, StructuralError};
use crate::host::{NoticeKind, Prompter};
use crate::memory_io;
use crate::nodes::execute_node;
use crate::types::{
  ExecutionLog, FlowDocument, FlowGraph, InputRequest, NodeOutcome, RunState, Termination,
  VarValue, VariableStore,
};

/// Summary of a normally terminated run.
#[derive(Debug, Clone, PartialEq)]
pub struct RunReport {
  /// Identifier of the memory record.
  pub memory_id: Uuid,
  /// Where the record was written; `None` after [FlowRunner::without_memory].
  pub memory_path: Option<PathBuf>,
  /// Final bindings.
  pub variables: BTreeMap<String, VarValue>,
  /// Executed node ids in order.
  pub visited: Vec<String>,
  pub log: ExecutionLog,
}

/// What a call to [FlowRunner::step] or [FlowRunner::resume] did.
#[derive(Debug, Clone, PartialEq)]
pub enum StepResult {
  /// A node ran and traversal continues at `next`.
  Continue { executed: String, next: String },
  /// The current node is waiting for operator input.
  NeedsInput(InputRequest),
  Finished(RunReport),
}

pub struct FlowRunner {
  graph: FlowGraph,
  context: ExecutionContext,
  state: RunState,
  /// Answers collected for the current node visit, oldest first.
  answers: Vec<Option<String>>,
  log: ExecutionLog,
  memory_dir: Option<PathBuf>,
  /// Record the bindings after every step in the log.
  step_variables: bool,
}

impl FlowRunner {
  /// New runner writing its memory record under the default `memory` directory.
  pub fn new(graph: FlowGraph, variables: VariableStore, services: Services) -> Self {
    Self {
      graph,
      context: ExecutionContext::new(variables, services),
      state: RunState::NotStarted,
      answers: vec![],
      log: ExecutionLog::started_now(),
      memory_dir: RunnerConfig::default().memory_dir,
      step_variables: false,
    }
  }

  /// Decodes a flow document into a runner.
  pub fn from_document(document: &FlowDocument, services: Services) -> Result<Self, FlowError> {
    let (graph, variables) = document.decode()?;
    Ok(Self::new(graph, variables, services))
  }

  pub fn with_memory_dir(mut self, dir: impl AsRef<Path>) -> Self {
    self.memory_dir = Some(dir.as_ref().to_path_buf());
    self
  }

  /// Skips the memory record; the host keeps [RunReport::variables] itself.
  pub fn without_memory(mut self) -> Self {
    self.memory_dir = None;
    self
  }

  /// Records a full variable snapshot with every log step. Off by default: on a looping
  /// flow the log would grow by one store copy per step.
  pub fn with_step_variables(mut self, enabled: bool) -> Self {
    self.step_variables = enabled;
    self
  }

  pub fn memory_dir(&self) -> Option<&Path> {
    self.memory_dir.as_deref()
  }

  pub fn state(&self) -> &RunState {
    &self.state
  }

  pub fn variables(&self) -> &VariableStore {
    &self.context.variables
  }

  pub fn log(&self) -> &ExecutionLog {
    &self.log
  }

  /// Advances by one node.
  ///
  /// The first call locates the unique start node. While input is pending the pending
  /// request is returned again without executing anything.
  #[instrument(level = "trace", skip(self))]
  pub async fn step(&mut self) -> Result<StepResult, FlowError> {
    let current = match &self.state {
      RunState::NotStarted => match self.graph.find_start() {
        Ok(start) => {
          info!(start = %start.id, nodes = self.graph.len(), "flow run started");
          start.id.clone()
        }
        Err(e) => return Err(self.abort(e)),
      },
      RunState::Running { current } => current.clone(),
      RunState::AwaitingInput { request, .. } => return Ok(StepResult::NeedsInput(request.clone())),
      RunState::Terminated(_) => {
        return Err(FlowError::InvalidState("run already terminated".to_string()));
      }
    };

    let Some(node) = self.graph.get(&current) else {
      return Err(self.abort(StructuralError::UnknownNode(current)));
    };
    info!(node_id = %node.id, kind = %node.kind(), "executing node");
    let outcome = match execute_node(node, &mut self.context, &self.answers).await {
      Ok(outcome) => outcome,
      Err(FlowError::Structural(e)) => return Err(self.abort(e)),
      Err(e) => return Err(e),
    };

    match outcome {
      NodeOutcome::NeedsInput(request) => {
        info!(node_id = %current, title = %request.title, "waiting for input");
        self.state = RunState::AwaitingInput {
          current,
          request: request.clone(),
        };
        Ok(StepResult::NeedsInput(request))
      }
      NodeOutcome::Next(next) => {
        self.answers.clear();
        let variables_after = self
          .step_variables
          .then(|| self.context.variables.snapshot());
        self
          .log
          .push(&current, node.behavior.tag(), next.as_deref(), variables_after);
        match next {
          Some(next) => {
            self.state = RunState::Running {
              current: next.clone(),
            };
            Ok(StepResult::Continue {
              executed: current,
              next,
            })
          }
          None => self.finish().map(StepResult::Finished),
        }
      }
    }
  }

  /// Supplies the answer to the pending input request (`None` = cancelled) and re-executes
  /// the waiting node.
  pub async fn resume(&mut self, answer: Option<String>) -> Result<StepResult, FlowError> {
    let RunState::AwaitingInput { current, .. } = &self.state else {
      return Err(FlowError::InvalidState("no input request is pending".to_string()));
    };
    self.state = RunState::Running {
      current: current.clone(),
    };
    self.answers.push(answer);
    self.step().await
  }

  /// Runs to termination, answering input requests with `prompter`.
  ///
  /// There is no cycle detection: a flow whose references loop runs until the host stops it.
  pub async fn run(&mut self, prompter: &mut dyn Prompter) -> Result<RunReport, FlowError> {
    let mut result = self.step().await?;
    loop {
      result = match result {
        StepResult::Continue { .. } => self.step().await?,
        StepResult::NeedsInput(request) => {
          let answer = prompter.prompt(&request).await;
          self.resume(answer).await?
        }
        StepResult::Finished(report) => return Ok(report),
      };
    }
  }

  fn finish(&mut self) -> Result<RunReport, FlowError> {
    self.state = RunState::Terminated(Termination::Normal);
    self.log.finish("completed");
    let memory_id = Uuid::new_v4();
    let variables = self.context.variables.snapshot();
    let memory_path = match &self.memory_dir {
      Some(dir) => Some(memory_io::save_memory(dir, memory_id, &variables)?),
      None => None,
    };
    let notifier = &self.context.services.notifier;
    notifier.notify(NoticeKind::Info, "Flow completed");
    if let Some(path) = &memory_path {
      notifier.notify(
        NoticeKind::Info,
        &format!("Memory saved to {}", path.display()),
      );
    }
    info!(steps = self.log.steps.len(), %memory_id, "flow run completed");
    Ok(RunReport {
      memory_id,
      memory_path,
      variables,
      visited: self.log.visited(),
      log: self.log.clone(),
    })
  }

  fn abort(&mut self, error: StructuralError) -> FlowError {
    warn!(error = %error, "flow run aborted");
    self
      .context
      .services
      .notifier
      .notify(NoticeKind::Error, &error.to_string());
    self.log.finish("aborted");
    self.state = RunState::Terminated(Termination::Structural(error.clone()));
    FlowError::Structural(error)
  }
}

/// Decodes `document`, runs it to completion with `prompter` and persists memory under
/// `memory_dir`.
pub async fn run_flow(
  document: &FlowDocument,
  services: Services,
  memory_dir: &Path,
  prompter: &mut dyn Prompter,
) -> Result<RunReport, FlowError> {
  FlowRunner::from_document(document, services)?
    .with_memory_dir(memory_dir)
    .run(prompter)
    .await
}
