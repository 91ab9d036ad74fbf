//! CLI: run a flow document (JSON) to completion.
//!
//! Usage: `run_flow [OPTIONS] <path-to-flow-json>`
//! Example: run_flow --answer Ana --memory-dir /tmp/memory flows/greeting.json
//!
//! Input requests are read from stdin unless answers are given with `--answer`.
//! The final variable store is written to `<memory-dir>/<uuid>.json` on normal completion.
//!
//! Set RUST_LOG=branchflow=trace for TRACE-level span enter/exit and events.

use std::path::{Path, PathBuf};
use std::process;
use std::time::Duration;

use branchflow::host::{Prompter, ScriptedPrompter, TerminalPrompter};
use branchflow::memory_io::{load_flow_document, write_execution_log};
use branchflow::types::{FlowDocument, decode_variables};
use branchflow::{FlowError, FlowRunner, RunnerConfig, Services, VariableStore};
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Run a flow document.
#[derive(Parser, Debug)]
#[command(name = "run_flow")]
#[command(
  after_help = r#"Environment variables (override the matching flags when set):
  BRANCHFLOW_MEMORY_DIR           Directory for memory records (default: memory).
  BRANCHFLOW_OLLAMA_URL           Ollama endpoint for model-query nodes (default: http://localhost:11434).
  BRANCHFLOW_MODEL_TIMEOUT_SECS   Bounded wait for model replies in seconds; 0 waits indefinitely.
  BRANCHFLOW_SCRIPT_MEMORY_LIMIT  Memory cap in bytes for code-exec interpreters.

Examples:
  run_flow flows/greeting.json
  run_flow --answer Ana --answer 42 --log run.json flows/greeting.json"#
)]
struct Args {
  /// Directory for memory records. Overridden by BRANCHFLOW_MEMORY_DIR if set.
  #[arg(long, value_name = "DIR")]
  memory_dir: Option<PathBuf>,

  /// Do not write a memory record.
  #[arg(long, conflicts_with = "memory_dir")]
  no_memory: bool,

  /// Ollama endpoint. Overridden by BRANCHFLOW_OLLAMA_URL if set.
  #[arg(long, value_name = "URL")]
  ollama_url: Option<String>,

  /// Model reply timeout in seconds. Overridden by BRANCHFLOW_MODEL_TIMEOUT_SECS if set.
  #[arg(long, value_name = "SECS")]
  model_timeout_secs: Option<u64>,

  /// JSON file with a `variables` array preloaded before the flow's own variables.
  #[arg(long, value_name = "FILE")]
  variables: Option<PathBuf>,

  /// Answer for the next input request, in order. When given, stdin is not read and
  /// requests beyond the supplied answers are cancelled.
  #[arg(long = "answer", value_name = "TEXT")]
  answers: Vec<String>,

  /// Write the execution log as JSON to this path.
  #[arg(long, value_name = "FILE")]
  log: Option<PathBuf>,

  /// Path to the flow document
  #[arg(value_name = "path-to-flow-json")]
  flow_path: PathBuf,
}

fn config_from(args: &Args) -> RunnerConfig {
  let mut config = RunnerConfig::default();
  if let Some(dir) = &args.memory_dir {
    config.memory_dir = Some(dir.clone());
  }
  if let Some(url) = &args.ollama_url {
    config.ollama_url = url.clone();
  }
  if let Some(secs) = args.model_timeout_secs.filter(|s| *s > 0) {
    config.model_timeout = Some(Duration::from_secs(secs));
  }
  // Env vars override flags.
  config.apply_env(|key| std::env::var(key).ok());
  if args.no_memory {
    config.memory_dir = None;
  }
  config
}

/// Declared variables: the preload file first, then the document's own (which win).
fn initial_variables(
  preload: Option<&Path>,
  declared: VariableStore,
) -> Result<VariableStore, FlowError> {
  let Some(path) = preload else {
    return Ok(declared);
  };
  let source = std::fs::read_to_string(path)?;
  let preloaded = FlowDocument::from_json(&source)?;
  let mut store = decode_variables(&preloaded.variables);
  for var in declared.iter() {
    store.insert(var.clone());
  }
  Ok(store)
}

async fn run(args: Args) -> Result<(), FlowError> {
  let config = config_from(&args);
  info!(
    memory_dir = ?config.memory_dir,
    ollama_url = %config.ollama_url,
    model_timeout = ?config.model_timeout,
    "options (env or flags)"
  );

  let document = load_flow_document(&args.flow_path)?;
  let (graph, declared) = document.decode()?;
  let variables = initial_variables(args.variables.as_deref(), declared)?;
  let services = Services::from_config(&config)
    .map_err(|e| FlowError::InvalidState(format!("cannot initialise services: {}", e)))?;

  let runner =
    FlowRunner::new(graph, variables, services).with_step_variables(args.log.is_some());
  let mut runner = match &config.memory_dir {
    Some(dir) => runner.with_memory_dir(dir),
    None => runner.without_memory(),
  };
  let mut prompter: Box<dyn Prompter> = if args.answers.is_empty() {
    Box::new(TerminalPrompter::new())
  } else {
    Box::new(ScriptedPrompter::new(args.answers.clone()))
  };

  let result = runner.run(prompter.as_mut()).await;
  if let Some(path) = &args.log {
    write_execution_log(path, runner.log())?;
    info!(path = %path.display(), "execution log written");
  }
  let report = result?;

  println!("Flow completed.");
  println!("  Visited: {}", report.visited.join(" -> "));
  for (name, value) in &report.variables {
    println!("  {} = {}", name, value);
  }
  if let Some(path) = &report.memory_path {
    println!("  Memory: {}", path.display());
  }
  Ok(())
}

#[tokio::main]
async fn main() {
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
    .with_writer(std::io::stderr)
    .init();

  let args = Args::parse();
  let path = args.flow_path.clone();
  if let Err(e) = run(args).await {
    error!(flow = %path.display(), error = %e, "run failed");
    eprintln!("Error running {}: {}", path.display(), e);
    process::exit(if e.is_structural() { 2 } else { 1 });
  }
}
