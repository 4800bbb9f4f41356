//! Result files
//!
//! A finished collaboration is written as pretty-printed JSON:
//!
//! ```json
//! {
//!   "task": "...",
//!   "conversation_turns": 4,
//!   "conversation": ["...", "..."],
//!   "summary": "..."
//! }
//! ```
//!
//! Default file names are `ai_collaboration_<YYYYMMDD-HHMMSS>.json` in local
//! time, so two saves within the same second overwrite each other.

use chrono::{DateTime, Local, TimeZone};
use sdk::errors::EngineError;
use sdk::types::CollaborationResult;
use std::fs;
use std::path::{Path, PathBuf};

const FILE_PREFIX: &str = "ai_collaboration_";

/// Reads and writes result files under one directory
#[derive(Debug, Clone)]
pub struct ResultStore {
    dir: PathBuf,
}

impl ResultStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// `ai_collaboration_20250314-093005.json`
    pub fn file_name_for<Tz: TimeZone>(at: &DateTime<Tz>) -> String
    where
        Tz::Offset: std::fmt::Display,
    {
        format!("{}{}.json", FILE_PREFIX, at.format("%Y%m%d-%H%M%S"))
    }

    /// Write `result` and return the path written.
    ///
    /// `path` overrides the default timestamped name and is used as given.
    pub fn save(
        &self,
        result: &CollaborationResult,
        path: Option<&Path>,
    ) -> Result<PathBuf, EngineError> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => self.dir.join(Self::file_name_for(&Local::now())),
        };

        let json = serde_json::to_string_pretty(result)
            .map_err(|e| EngineError::ResultFile(format!("Failed to encode result: {}", e)))?;

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, json)?;

        tracing::info!("Saved collaboration result to {:?}", path);
        Ok(path)
    }

    /// Read a result file written by [`ResultStore::save`].
    pub fn load(path: &Path) -> Result<CollaborationResult, EngineError> {
        let contents = fs::read_to_string(path)?;

        serde_json::from_str(&contents).map_err(|e| {
            EngineError::ResultFile(format!("Failed to decode {:?}: {}", path, e))
        })
    }
}
