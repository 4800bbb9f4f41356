//! API key resolution
//!
//! Each agent needs one API key. Keys are looked up in the process
//! environment first; if a variable is unset or blank the user is prompted
//! on stderr and the key is read from stdin. Keys are never written to
//! disk and never logged.

use sdk::errors::EngineError;
use std::fmt;
use std::io::{self, BufRead, Write};

/// A wrapper for sensitive string data that prevents accidental logging.
///
/// `Debug` and `Display` always print `[REDACTED]`. Use `unsecure()` to
/// read the value when building a request.
#[derive(Clone, PartialEq, Eq)]
pub struct SecretString(String);

impl SecretString {
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Access the raw underlying string
    pub fn unsecure(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for SecretString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SecretString([REDACTED])")
    }
}

impl fmt::Display for SecretString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[REDACTED]")
    }
}

impl From<&str> for SecretString {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// The two keys a collaboration needs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Credential {
    Gemini,
    Groq,
}

impl Credential {
    pub const ALL: [Credential; 2] = [Credential::Gemini, Credential::Groq];

    /// Environment variable holding the key
    pub fn env_var(self) -> &'static str {
        match self {
            Credential::Gemini => "GEMINI_API_KEY",
            Credential::Groq => "GROQ_API_KEY",
        }
    }

    /// Human name used in the interactive prompt
    pub fn label(self) -> &'static str {
        match self {
            Credential::Gemini => "Gemini",
            Credential::Groq => "Groq",
        }
    }
}

/// Both resolved keys
#[derive(Debug, Clone)]
pub struct ApiKeys {
    pub gemini: SecretString,
    pub groq: SecretString,
}

/// Resolves API keys from the environment, falling back to a prompt.
pub struct CredentialStore {
    interactive: bool,
}

impl CredentialStore {
    /// Store that prompts when a variable is missing
    pub fn interactive() -> Self {
        Self { interactive: true }
    }

    /// Store that only reads the environment; missing keys are errors
    pub fn env_only() -> Self {
        Self { interactive: false }
    }

    /// Look a key up in the environment without prompting.
    pub fn from_env(&self, credential: Credential) -> Option<SecretString> {
        std::env::var(credential.env_var())
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .map(SecretString::new)
    }

    /// Resolve a single key.
    ///
    /// # Errors
    /// `EngineError::MissingCredential` when the variable is unset and the
    /// store is not interactive, `EngineError::CredentialInput` when the
    /// prompt cannot be read or the entered key is empty.
    pub fn resolve(&self, credential: Credential) -> Result<SecretString, EngineError> {
        if let Some(secret) = self.from_env(credential) {
            tracing::debug!("Using {} from environment", credential.env_var());
            return Ok(secret);
        }

        if !self.interactive {
            return Err(EngineError::MissingCredential(
                credential.env_var().to_string(),
            ));
        }

        tracing::info!(
            "{} not set, prompting for {} API key",
            credential.env_var(),
            credential.label()
        );
        let stdin = io::stdin();
        let mut input = stdin.lock();
        prompt_for_secret(credential, &mut input, &mut io::stderr())
    }

    /// Resolve both keys. Prompts, if any, happen before the run starts.
    pub fn resolve_all(&self) -> Result<ApiKeys, EngineError> {
        Ok(ApiKeys {
            gemini: self.resolve(Credential::Gemini)?,
            groq: self.resolve(Credential::Groq)?,
        })
    }
}

/// Write the prompt to `out` and read one line from `input`.
///
/// The prompt goes to stderr (not stdout) so it never mixes with
/// collaboration output.
fn prompt_for_secret<R: BufRead, W: Write>(
    credential: Credential,
    input: &mut R,
    out: &mut W,
) -> Result<SecretString, EngineError> {
    write!(out, "Enter your {} API key: ", credential.label())
        .and_then(|_| out.flush())
        .map_err(|e| EngineError::CredentialInput(format!("Failed to write prompt: {}", e)))?;

    let mut line = String::new();
    input
        .read_line(&mut line)
        .map_err(|e| EngineError::CredentialInput(format!("Failed to read input: {}", e)))?;

    let secret = line.trim();
    if secret.is_empty() {
        return Err(EngineError::CredentialInput(format!(
            "{} API key cannot be empty",
            credential.label()
        )));
    }

    Ok(SecretString::new(secret))
}
