//! Colloquy SDK
//!
//! Shared error and conversation types for the Colloquy engine and anything
//! that reads saved collaboration results.

/// Error types and handling
pub mod errors;

/// Transcript and result types
pub mod types;

// Re-export commonly used types
pub use errors::{ColloquyErrorExt, EngineError};
pub use types::{CollaborationResult, Speaker, Transcript, TranscriptEntry};
