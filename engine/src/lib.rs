//! Colloquy Engine Library
//!
//! Two remote LLMs discuss a task turn by turn and the first one writes a
//! final report. This library holds everything the `colloquy` binary and
//! the integration tests use.

/// Configuration management module
pub mod config;

/// API key resolution
pub mod secrets;

/// LLM provider abstraction layer
pub mod llm;

/// Turn planning, prompts, the turn loop and summarizing
pub mod conversation;

/// Result file persistence
pub mod results;

/// Telemetry and Observability
pub mod telemetry;

/// CLI interface module
pub mod cli;

/// Command handlers module
pub mod handlers;
