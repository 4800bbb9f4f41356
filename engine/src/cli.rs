//! CLI interface for Colloquy
//!
//! This module provides the command-line interface using clap's derive API.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Colloquy: two LLM agents collaborate on a task, then report.
///
/// Agent 1 (Gemini) and Agent 2 (an OpenAI-compatible endpoint, Groq by
/// default) take turns discussing the task for a model-chosen number of
/// turns, after which Agent 1 writes a final report.
#[derive(Parser, Debug)]
#[command(name = "colloquy")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Set log level (error, warn, info, debug, trace)
    #[arg(long, global = true, value_name = "LEVEL")]
    pub log: Option<String>,

    /// Specify alternate configuration file
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run a collaboration on a task
    Run {
        /// The task for the agents; prompted for when omitted
        task: Option<String>,

        /// Write the result to this file instead of a timestamped one
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Do not write a result file
        #[arg(long, conflicts_with = "output")]
        no_save: bool,
    },

    /// Print a saved collaboration result
    Replay {
        /// Path to an ai_collaboration_*.json file
        file: PathBuf,
    },

    /// Check configuration and API key availability
    Doctor,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_run_with_task() {
        let cli = Cli::parse_from(["colloquy", "run", "Plan a 3-day trip to Kyoto"]);
        match cli.command {
            Command::Run {
                task,
                output,
                no_save,
            } => {
                assert_eq!(task.as_deref(), Some("Plan a 3-day trip to Kyoto"));
                assert!(output.is_none());
                assert!(!no_save);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_run_without_task() {
        let cli = Cli::parse_from(["colloquy", "--json", "run", "-o", "out.json"]);
        assert!(cli.json);
        match cli.command {
            Command::Run { task, output, .. } => {
                assert!(task.is_none());
                assert_eq!(output, Some(PathBuf::from("out.json")));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_output_conflicts_with_no_save() {
        let parsed = Cli::try_parse_from(["colloquy", "run", "t", "-o", "x.json", "--no-save"]);
        assert!(parsed.is_err());
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::parse_from(["colloquy", "doctor", "--log", "debug", "--config", "c.toml"]);
        assert_eq!(cli.log.as_deref(), Some("debug"));
        assert_eq!(cli.config, Some(PathBuf::from("c.toml")));
        assert!(matches!(cli.command, Command::Doctor));
    }
}
