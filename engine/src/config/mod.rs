//! Configuration management
//!
//! This module handles loading, validation, and management of the Colloquy
//! configuration. Configuration is stored in TOML format at
//! ~/.colloquy/config.toml.
//!
//! # Configuration Sections
//!
//! - **core**: Log level, directory that result files are written to
//! - **llm.gemini**: Endpoint and model for the primary agent
//! - **llm.groq**: Endpoint, model and sampling settings for the partner agent
//!
//! API keys are never read from or written to this file. They come from
//! `GEMINI_API_KEY` / `GROQ_API_KEY` or an interactive prompt
//! (see [`crate::secrets`]).
//!
//! # Path Expansion
//!
//! The configuration system automatically:
//! - Expands ~ to the user's home directory
//! - Creates the output directory if it doesn't exist
//! - Canonicalizes the output directory
//!
//! # Examples
//!
//! ```no_run
//! use colloquy_engine::config::Config;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config::load_or_create()?;
//!
//! println!("Results go to: {:?}", config.core.output_dir);
//! println!("Primary model: {}", config.llm.gemini.model);
//! # Ok(())
//! # }
//! ```

use sdk::errors::EngineError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Core settings
    #[serde(default)]
    pub core: CoreConfig,

    /// Model endpoints for both agents
    #[serde(default)]
    pub llm: LLMConfig,
}

/// Core configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoreConfig {
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Directory for `ai_collaboration_*.json` files (supports ~ expansion)
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
}

/// Model endpoints
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct LLMConfig {
    /// Primary agent (Agent 1)
    #[serde(default)]
    pub gemini: GeminiConfig,

    /// Partner agent (Agent 2)
    #[serde(default)]
    pub groq: GroqConfig,
}

/// Gemini provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeminiConfig {
    /// Base URL for Gemini API
    #[serde(default = "default_gemini_base_url")]
    pub base_url: String,

    /// Model name
    #[serde(default = "default_gemini_model")]
    pub model: String,

    /// Name the agent is introduced with in prompts
    #[serde(default = "default_gemini_display_name")]
    pub display_name: String,
    // Note: API key comes from GEMINI_API_KEY, not from config
}

/// Groq (OpenAI-compatible chat completions) provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroqConfig {
    /// Base URL; `/chat/completions` is appended
    #[serde(default = "default_groq_base_url")]
    pub base_url: String,

    /// Model name
    #[serde(default = "default_groq_model")]
    pub model: String,

    /// Name the agent is introduced with in prompts
    #[serde(default = "default_groq_display_name")]
    pub display_name: String,

    /// Sampling temperature (0.0-2.0)
    #[serde(default = "default_temperature")]
    pub temperature: f64,

    /// Completion token cap
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Nucleus sampling mass (0.0-1.0]
    #[serde(default = "default_top_p")]
    pub top_p: f64,
    // Note: API key comes from GROQ_API_KEY, not from config
}

// Default value functions
fn default_log_level() -> String {
    "info".to_string()
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_gemini_base_url() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_string()
}

fn default_gemini_model() -> String {
    "gemini-2.0-flash".to_string()
}

fn default_gemini_display_name() -> String {
    "Gemini 2.0 Flash".to_string()
}

fn default_groq_base_url() -> String {
    "https://api.groq.com/openai/v1".to_string()
}

fn default_groq_model() -> String {
    "deepseek-r1-distill-llama-70b".to_string()
}

fn default_groq_display_name() -> String {
    "Deepseek Llama 70B".to_string()
}

fn default_temperature() -> f64 {
    0.6
}

fn default_max_tokens() -> u32 {
    4096
}

fn default_top_p() -> f64 {
    0.95
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            output_dir: default_output_dir(),
        }
    }
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            base_url: default_gemini_base_url(),
            model: default_gemini_model(),
            display_name: default_gemini_display_name(),
        }
    }
}

impl Default for GroqConfig {
    fn default() -> Self {
        Self {
            base_url: default_groq_base_url(),
            model: default_groq_model(),
            display_name: default_groq_display_name(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            top_p: default_top_p(),
        }
    }
}

impl Config {
    /// Load configuration from the default location (~/.colloquy/config.toml)
    ///
    /// If the configuration file doesn't exist, creates a default configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Configuration file cannot be read
    /// - TOML parsing fails
    /// - Validation fails
    pub fn load_or_create() -> Result<Self, EngineError> {
        let config_path = Self::default_config_path()?;

        if config_path.exists() {
            Self::load_from_path(&config_path)
        } else {
            Self::create_default(&config_path)
        }
    }

    /// Load configuration from a specific path
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - File cannot be read
    /// - TOML parsing fails
    /// - Validation fails
    pub fn load_from_path(path: &Path) -> Result<Self, EngineError> {
        let contents = fs::read_to_string(path)
            .map_err(|e| EngineError::Config(format!("Failed to read config file: {}", e)))?;

        Self::from_toml_str(&contents)
    }

    /// Parse and validate configuration from TOML text
    pub fn from_toml_str(contents: &str) -> Result<Self, EngineError> {
        let mut config: Config = toml::from_str(contents)
            .map_err(|e| EngineError::Config(format!("Failed to parse config: {}", e)))?;

        config.validate_and_process()?;

        Ok(config)
    }

    /// Create default configuration and save to path
    fn create_default(path: &Path) -> Result<Self, EngineError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                EngineError::Config(format!("Failed to create config directory: {}", e))
            })?;
        }

        let mut config = Self::default();

        // Written before processing so the file keeps the portable relative paths
        let toml_string = toml::to_string_pretty(&config)
            .map_err(|e| EngineError::Config(format!("Failed to serialize config: {}", e)))?;

        fs::write(path, toml_string)
            .map_err(|e| EngineError::Config(format!("Failed to write config file: {}", e)))?;

        tracing::info!("Created default configuration at {:?}", path);

        config.validate_and_process()?;

        Ok(config)
    }

    /// Get the default configuration file path (~/.colloquy/config.toml)
    pub fn default_config_path() -> Result<PathBuf, EngineError> {
        let home = dirs::home_dir()
            .ok_or_else(|| EngineError::Config("Could not determine home directory".to_string()))?;

        Ok(home.join(".colloquy").join("config.toml"))
    }

    /// Validate and process configuration
    ///
    /// This method:
    /// - Validates log level, endpoints, models and sampling ranges
    /// - Expands ~ in the output directory
    /// - Creates and canonicalizes the output directory
    fn validate_and_process(&mut self) -> Result<(), EngineError> {
        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.core.log_level.as_str()) {
            return Err(EngineError::Config(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.core.log_level,
                valid_log_levels.join(", ")
            )));
        }

        validate_endpoint("llm.gemini", &self.llm.gemini.base_url, &self.llm.gemini.model)?;
        validate_endpoint("llm.groq", &self.llm.groq.base_url, &self.llm.groq.model)?;

        if !(0.0..=2.0).contains(&self.llm.groq.temperature) {
            return Err(EngineError::Config(
                "llm.groq.temperature must be between 0.0 and 2.0".to_string(),
            ));
        }
        if self.llm.groq.top_p <= 0.0 || self.llm.groq.top_p > 1.0 {
            return Err(EngineError::Config(
                "llm.groq.top_p must be greater than 0.0 and at most 1.0".to_string(),
            ));
        }
        if self.llm.groq.max_tokens == 0 {
            return Err(EngineError::Config(
                "llm.groq.max_tokens must be greater than 0".to_string(),
            ));
        }

        // Trailing slashes would produce `//chat/completions`
        self.llm.gemini.base_url = self.llm.gemini.base_url.trim_end_matches('/').to_string();
        self.llm.groq.base_url = self.llm.groq.base_url.trim_end_matches('/').to_string();

        self.core.output_dir = expand_path(&self.core.output_dir)?;
        self.core.output_dir = canonicalize_or_create(&self.core.output_dir)?;

        if !self.core.output_dir.is_dir() {
            return Err(EngineError::Config(format!(
                "Output path is not a directory: {:?}",
                self.core.output_dir
            )));
        }

        Ok(())
    }
}

fn validate_endpoint(section: &str, base_url: &str, model: &str) -> Result<(), EngineError> {
    if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
        return Err(EngineError::Config(format!(
            "{}.base_url must start with http:// or https://, got '{}'",
            section, base_url
        )));
    }
    if model.trim().is_empty() {
        return Err(EngineError::Config(format!(
            "{}.model must not be empty",
            section
        )));
    }
    Ok(())
}

/// Expand ~ in path to user's home directory
///
/// # Examples
///
/// ```ignore
/// let path = PathBuf::from("~/collaborations");
/// let expanded = expand_path(&path)?;
/// // expanded is now /home/user/collaborations (on Unix)
/// ```
fn expand_path(path: &Path) -> Result<PathBuf, EngineError> {
    let path_str = path
        .to_str()
        .ok_or_else(|| EngineError::Config("Invalid UTF-8 in path".to_string()))?;

    if let Some(rest) = path_str.strip_prefix("~/") {
        let home = dirs::home_dir()
            .ok_or_else(|| EngineError::Config("Could not determine home directory".to_string()))?;

        Ok(home.join(rest))
    } else if path_str == "~" {
        dirs::home_dir()
            .ok_or_else(|| EngineError::Config("Could not determine home directory".to_string()))
    } else {
        Ok(path.to_path_buf())
    }
}

/// Canonicalize path, creating it if it doesn't exist
fn canonicalize_or_create(path: &Path) -> Result<PathBuf, EngineError> {
    if !path.exists() {
        fs::create_dir_all(path).map_err(|e| {
            EngineError::Config(format!("Failed to create directory {:?}: {}", path, e))
        })?;
    }

    path.canonicalize()
        .map_err(|e| EngineError::PathCanonicalization(path.to_path_buf(), e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_values() {
        let config = Config::default();

        assert_eq!(config.core.log_level, "info");
        assert_eq!(config.llm.gemini.model, "gemini-2.0-flash");
        assert_eq!(config.llm.groq.model, "deepseek-r1-distill-llama-70b");
        assert_eq!(config.llm.groq.temperature, 0.6);
        assert_eq!(config.llm.groq.max_tokens, 4096);
        assert_eq!(config.llm.groq.top_p, 0.95);
    }

    #[test]
    fn test_expand_path_with_tilde() {
        let path = PathBuf::from("~/test");
        let expanded = expand_path(&path).unwrap();

        let home = dirs::home_dir().unwrap();
        assert_eq!(expanded, home.join("test"));
    }

    #[test]
    fn test_expand_path_without_tilde() {
        let path = PathBuf::from("/absolute/path");
        let expanded = expand_path(&path).unwrap();

        assert_eq!(expanded, path);
    }

    #[test]
    fn test_expand_path_tilde_only() {
        let expanded = expand_path(Path::new("~")).unwrap();
        assert_eq!(expanded, dirs::home_dir().unwrap());
    }

    #[test]
    fn test_config_serialization() {
        let config = Config::default();
        let toml_string = toml::to_string(&config).unwrap();

        let deserialized: Config = toml::from_str(&toml_string).unwrap();
        assert_eq!(config.core.log_level, deserialized.core.log_level);
        assert_eq!(config.llm.groq.base_url, deserialized.llm.groq.base_url);
        assert_eq!(config.llm.gemini.display_name, deserialized.llm.gemini.display_name);
    }

    #[test]
    fn test_empty_toml_uses_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.llm.gemini.base_url, default_gemini_base_url());
        assert_eq!(config.core.output_dir, PathBuf::from("."));
    }

    #[test]
    fn test_validate_rejects_bad_log_level() {
        let err = Config::from_toml_str("[core]\nlog_level = \"loud\"\n").unwrap_err();
        assert!(err.to_string().contains("Invalid log level 'loud'"));
    }

    #[test]
    fn test_validate_rejects_non_http_base_url() {
        let err = Config::from_toml_str("[llm.groq]\nbase_url = \"api.groq.com\"\n").unwrap_err();
        assert!(err.to_string().contains("llm.groq.base_url"));
    }

    #[test]
    fn test_validate_rejects_sampling_out_of_range() {
        let err = Config::from_toml_str("[llm.groq]\ntop_p = 1.5\n").unwrap_err();
        assert!(err.to_string().contains("top_p"));

        let err = Config::from_toml_str("[llm.groq]\ntemperature = -0.1\n").unwrap_err();
        assert!(err.to_string().contains("temperature"));

        let err = Config::from_toml_str("[llm.groq]\nmax_tokens = 0\n").unwrap_err();
        assert!(err.to_string().contains("max_tokens"));
    }

    #[test]
    fn test_validate_trims_trailing_slash() {
        let dir = tempfile::tempdir().unwrap();
        let toml = format!(
            "[core]\noutput_dir = {:?}\n[llm.groq]\nbase_url = \"http://localhost:8080/v1/\"\n",
            dir.path()
        );
        let config = Config::from_toml_str(&toml).unwrap();
        assert_eq!(config.llm.groq.base_url, "http://localhost:8080/v1");
    }
}
