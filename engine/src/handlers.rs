//! Command handlers
//!
//! Glue between the CLI and the library: credential resolution, task
//! entry, console progress and result files.

use crate::config::Config;
use crate::conversation::{
    Collaboration, CollaborationEvent, CollaborationObserver, PromptBuilder,
};
use crate::llm::{gemini::GeminiProvider, groq::GroqProvider, LLMProvider};
use crate::results::ResultStore;
use crate::secrets::{ApiKeys, Credential, CredentialStore};
use anyhow::{Context, Result};
use sdk::errors::EngineError;
use sdk::types::CollaborationResult;
use serde_json::json;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Output format for command results
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable text output
    Text,
    /// JSON output for machine consumption
    Json,
}

/// Prints progress lines to stdout as the conversation unfolds
pub struct ConsoleObserver {
    prompts: PromptBuilder,
}

impl ConsoleObserver {
    pub fn new(prompts: PromptBuilder) -> Self {
        Self { prompts }
    }
}

impl CollaborationObserver for ConsoleObserver {
    fn on_event(&self, event: &CollaborationEvent<'_>) {
        match event {
            CollaborationEvent::PlanningStarted => {
                println!("Determining optimal conversation length...");
            }
            CollaborationEvent::TurnsPlanned { turns } => {
                println!("Decided on {} turns of conversation\n", turns);
                println!("Beginning agent collaboration...\n");
            }
            CollaborationEvent::TurnStarted { turn, max_turns } => {
                println!("--- Turn {}/{} ---\n", turn, max_turns);
            }
            CollaborationEvent::AgentThinking { speaker } => {
                println!("{} thinking...", self.prompts.label(*speaker));
            }
            CollaborationEvent::AgentReplied { entry } => {
                println!("{}: {}\n", self.prompts.label(entry.speaker), entry.text);
            }
            CollaborationEvent::SummaryStarted => {
                println!("Generating final summary and output...");
            }
            CollaborationEvent::SummaryReady { summary } => {
                println!("\nFINAL OUTPUT:\n");
                println!("{}", summary);
            }
        }
        io::stdout().flush().ok();
    }
}

/// Wire both providers from config and keys into a [`Collaboration`].
pub fn build_collaboration(config: &Config, keys: ApiKeys) -> Result<Collaboration, EngineError> {
    let primary: Arc<dyn LLMProvider> =
        Arc::new(GeminiProvider::new(config.llm.gemini.clone(), keys.gemini)?);
    let partner: Arc<dyn LLMProvider> =
        Arc::new(GroqProvider::new(config.llm.groq.clone(), keys.groq)?);

    let prompts = PromptBuilder::new(
        config.llm.gemini.display_name.clone(),
        config.llm.groq.display_name.clone(),
    );

    Ok(Collaboration::new(primary, partner, prompts))
}

/// Prompt for the task on stderr and read one line.
pub fn read_task<R: BufRead, W: Write>(input: &mut R, out: &mut W) -> Result<String, EngineError> {
    write!(out, "Enter task for AI agents to collaborate on: ")?;
    out.flush()?;

    let mut line = String::new();
    input.read_line(&mut line)?;

    let task = line.trim();
    if task.is_empty() {
        return Err(EngineError::EmptyTask);
    }
    Ok(task.to_string())
}

/// Run a collaboration
///
/// Resolves both API keys (prompting when the environment lacks them),
/// reads the task if it was not given, runs the loop and saves the result.
pub async fn handle_run(
    task: Option<String>,
    output: Option<PathBuf>,
    no_save: bool,
    config: &Config,
    format: OutputFormat,
) -> Result<()> {
    let keys = CredentialStore::interactive()
        .resolve_all()
        .context("Failed to resolve API keys")?;

    let task = match task.map(|t| t.trim().to_string()) {
        Some(t) if !t.is_empty() => t,
        Some(_) => return Err(EngineError::EmptyTask.into()),
        None => {
            let stdin = io::stdin();
            let mut input = stdin.lock();
            read_task(&mut input, &mut io::stderr()).context("Failed to read task")?
        }
    };

    let mut collaboration =
        build_collaboration(config, keys).context("Failed to set up model clients")?;

    if format == OutputFormat::Text {
        let observer = ConsoleObserver::new(collaboration.prompts().clone());
        collaboration = collaboration.with_observer(Arc::new(observer));
        println!("Task: {}\n", task);
    }

    let result = collaboration.run(&task).await;

    let saved_to = if no_save {
        None
    } else {
        let store = ResultStore::new(&config.core.output_dir);
        Some(
            store
                .save(&result, output.as_deref())
                .context("Failed to save results")?,
        )
    };

    match format {
        OutputFormat::Text => {
            if let Some(path) = &saved_to {
                println!("\nResults saved to {}", path.display());
            }
        }
        OutputFormat::Json => {
            let mut value = serde_json::to_value(&result)?;
            if let Some(obj) = value.as_object_mut() {
                obj.insert("saved_to".to_string(), json!(saved_to));
            }
            println!("{}", serde_json::to_string_pretty(&value)?);
        }
    }

    Ok(())
}

/// Print a saved collaboration result
pub async fn handle_replay(file: &Path, config: &Config, format: OutputFormat) -> Result<()> {
    let result = ResultStore::load(file).with_context(|| format!("Failed to load {:?}", file))?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&result)?),
        OutputFormat::Text => {
            let prompts = PromptBuilder::new(
                config.llm.gemini.display_name.clone(),
                config.llm.groq.display_name.clone(),
            );
            print!("{}", render_result(&result, &prompts));
        }
    }

    Ok(())
}

/// Text rendering of a saved result, one labelled block per reply
pub fn render_result(result: &CollaborationResult, prompts: &PromptBuilder) -> String {
    let mut out = String::new();
    out.push_str(&format!("Task: {}\n", result.task));
    out.push_str(&format!(
        "Turns: {} ({} replies)\n\n",
        result.turn_count,
        result.transcript.len()
    ));

    for entry in &result.transcript {
        out.push_str(&format!("{}: {}\n\n", prompts.label(entry.speaker), entry.text));
    }

    out.push_str("FINAL OUTPUT:\n\n");
    out.push_str(&result.summary);
    out.push('\n');
    out
}

/// Report configuration and whether each API key is available
pub async fn handle_doctor(
    config: &Config,
    config_path: &Path,
    format: OutputFormat,
) -> Result<()> {
    let store = CredentialStore::env_only();
    let credentials: Vec<(Credential, bool)> = Credential::ALL
        .iter()
        .map(|c| (*c, store.from_env(*c).is_some()))
        .collect();

    match format {
        OutputFormat::Json => {
            let keys: serde_json::Map<String, serde_json::Value> = credentials
                .iter()
                .map(|(c, found)| (c.env_var().to_string(), json!(found)))
                .collect();
            let report = json!({
                "config_path": config_path,
                "output_dir": config.core.output_dir,
                "log_level": config.core.log_level,
                "primary": {
                    "base_url": config.llm.gemini.base_url,
                    "model": config.llm.gemini.model,
                },
                "partner": {
                    "base_url": config.llm.groq.base_url,
                    "model": config.llm.groq.model,
                },
                "credentials": keys,
            });
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        OutputFormat::Text => {
            println!("Configuration: {}", config_path.display());
            println!("  Output dir:  {}", config.core.output_dir.display());
            println!("  Log level:   {}", config.core.log_level);
            println!(
                "  Agent 1:     {} @ {}",
                config.llm.gemini.model, config.llm.gemini.base_url
            );
            println!(
                "  Agent 2:     {} @ {}",
                config.llm.groq.model, config.llm.groq.base_url
            );
            println!("Credentials:");
            for (credential, found) in &credentials {
                println!(
                    "  {:<15} {}",
                    credential.env_var(),
                    if *found {
                        "set"
                    } else {
                        "not set (will prompt)"
                    }
                );
            }
        }
    }

    Ok(())
}
