//! Error types and handling
//!
//! This module provides the error types used throughout the Colloquy engine.
//! All errors implement the `ColloquyErrorExt` trait which provides
//! user-friendly hints and indicates whether errors are recoverable.
//!
//! # Security
//!
//! Error messages never carry API keys. Credentials travel in request
//! headers, so transport errors that echo the request URL stay clean.

use thiserror::Error;

/// Trait for Colloquy error extensions
///
/// This trait provides additional context for errors, including user-friendly
/// hints and recoverability information. All engine errors implement this trait.
pub trait ColloquyErrorExt {
    /// Returns a user-friendly hint for the error
    ///
    /// The hint is a static string and never echoes the underlying message.
    fn user_hint(&self) -> &str;

    /// Returns whether the error is recoverable
    ///
    /// Recoverable errors can be fixed by the user (edit config, export a
    /// key, pick another path) and the command re-run.
    fn is_recoverable(&self) -> bool;
}

/// Main engine error type
///
/// # Error Categories
///
/// - **Configuration**: Invalid or missing configuration
/// - **Credentials**: Missing or unreadable API keys
/// - **LLM Provider**: Client construction failures
/// - **Results**: Result file encoding/decoding failures
/// - **Task**: Empty or unreadable task input
///
/// # Examples
///
/// ```
/// use sdk::errors::{ColloquyErrorExt, EngineError};
///
/// let error = EngineError::MissingCredential("GROQ_API_KEY".to_string());
/// println!("Hint: {}", error.user_hint());
/// assert!(error.is_recoverable());
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Path canonicalization failed for {0:?}: {1}")]
    PathCanonicalization(std::path::PathBuf, String),

    // Credential errors
    #[error("Missing credential: {0}")]
    MissingCredential(String),

    #[error("Credential input error: {0}")]
    CredentialInput(String),

    // LLM provider errors
    #[error("LLM provider error: {0}")]
    LLMProvider(String),

    // Result persistence errors
    #[error("Result file error: {0}")]
    ResultFile(String),

    // Task input errors
    #[error("Task must not be empty")]
    EmptyTask,

    // Generic IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ColloquyErrorExt for EngineError {
    fn user_hint(&self) -> &str {
        match self {
            Self::Config(_) => "Check your config.toml file for errors",
            Self::PathCanonicalization(_, _) => "Invalid path specified",

            Self::MissingCredential(_) => {
                "Export GEMINI_API_KEY and GROQ_API_KEY or enter them when prompted"
            }
            Self::CredentialInput(_) => "Could not read the API key from the terminal",

            Self::LLMProvider(_) => "LLM provider unavailable. Check your API keys and network",

            Self::ResultFile(_) => "The result file is missing or not a collaboration result",

            Self::EmptyTask => "Describe the task the agents should work on",

            Self::Io(_) => "File system operation failed",
        }
    }

    fn is_recoverable(&self) -> bool {
        match self {
            // A broken client setup needs a rebuild or config change, not a retry
            Self::LLMProvider(_) => false,

            _ => true,
        }
    }
}
