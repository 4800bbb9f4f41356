//! LLM Provider Abstraction Layer
//!
//! Both agents are remote text-generation endpoints with different wire
//! formats (Gemini `generateContent`, OpenAI-compatible chat completions).
//! The `LLMProvider` trait hides the difference behind a single
//! prompt-in/text-out call so the conversation loop, the planner and tests
//! can treat them alike.
//!
//! Failures never escape a provider call made through
//! [`LLMProvider::invoke`]: they come back as [`Reply::Failed`], whose text
//! starts with the provider's error tag (e.g. `"Groq Agent Error: "`) and
//! is what lands in the transcript.

use async_trait::async_trait;
use sdk::errors::EngineError;
use std::fmt;

pub mod gemini;
pub mod groq;

/// Result type for LLM operations
pub type Result<T> = std::result::Result<T, LLMError>;

/// Errors that can occur during LLM operations
#[derive(Debug, thiserror::Error)]
pub enum LLMError {
    #[error("Provider unavailable: {0}")]
    ProviderUnavailable(String),

    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("Rate limit exceeded: {0}")]
    RateLimitExceeded(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Timeout: {0}")]
    Timeout(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    /// Response decoded but lacked the expected fields; carries the raw body
    #[error("Unexpected response format - {0}")]
    UnexpectedFormat(String),

    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl LLMError {
    /// Map a non-2xx status and its body to an error
    pub(crate) fn from_status(provider: &str, status: reqwest::StatusCode, body: String) -> Self {
        match status.as_u16() {
            400 | 404 | 422 => LLMError::InvalidRequest(body),
            401 | 403 => LLMError::AuthenticationFailed(body),
            429 => LLMError::RateLimitExceeded(body),
            _ => LLMError::ProviderUnavailable(format!(
                "{} API error ({}): {}",
                provider, status, body
            )),
        }
    }
}

impl From<reqwest::Error> for LLMError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            LLMError::Timeout(e.to_string())
        } else if e.is_connect() {
            LLMError::ProviderUnavailable(format!("Cannot connect: {}", e))
        } else if e.is_decode() {
            LLMError::ParseError(e.to_string())
        } else {
            LLMError::NetworkError(e.to_string())
        }
    }
}

/// Outcome of a single model call
#[derive(Debug)]
pub enum Reply {
    /// Generated text
    Text(String),

    /// The call failed; `text` is the tagged message shown in its place
    Failed { text: String, error: LLMError },
}

impl Reply {
    /// Build a failed reply with the `"<tag> Error: <detail>"` text
    pub fn failed(error_tag: &str, error: LLMError) -> Self {
        Reply::Failed {
            text: format!("{} Error: {}", error_tag, error),
            error,
        }
    }

    /// Text that goes into the transcript, console and result file
    pub fn text(&self) -> &str {
        match self {
            Reply::Text(text) => text,
            Reply::Failed { text, .. } => text,
        }
    }

    /// Underlying error for a failed call
    pub fn error(&self) -> Option<&LLMError> {
        match self {
            Reply::Text(_) => None,
            Reply::Failed { error, .. } => Some(error),
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, Reply::Failed { .. })
    }

    pub fn into_text(self) -> String {
        match self {
            Reply::Text(text) => text,
            Reply::Failed { text, .. } => text,
        }
    }
}

impl fmt::Display for Reply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.text())
    }
}

/// LLM Provider trait that both agents implement
#[async_trait]
pub trait LLMProvider: Send + Sync {
    /// Returns the name of the provider (e.g., "gemini", "groq")
    fn name(&self) -> &str;

    /// Prefix for failure text, e.g. "Gemini Agent" -> "Gemini Agent Error: ..."
    fn error_tag(&self) -> &str;

    /// Send one prompt as a single user message and return the generated text.
    ///
    /// Exactly one outbound request, no retries.
    async fn generate(&self, prompt: &str) -> Result<String>;

    /// Call the model and fold any failure into a tagged [`Reply`].
    ///
    /// Never returns an error and never panics on provider failure.
    async fn invoke(&self, prompt: &str) -> Reply {
        match self.generate(prompt).await {
            Ok(text) => {
                tracing::debug!(
                    provider = self.name(),
                    prompt_chars = prompt.len(),
                    reply_chars = text.len(),
                    "Model call succeeded"
                );
                Reply::Text(text)
            }
            Err(e) => {
                tracing::warn!(provider = self.name(), error = %e, "Model call failed");
                Reply::failed(self.error_tag(), e)
            }
        }
    }
}

/// Shared HTTP client setup for both providers
pub(crate) fn build_http_client() -> std::result::Result<reqwest::Client, EngineError> {
    reqwest::Client::builder()
        .user_agent(concat!("colloquy/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| EngineError::LLMProvider(format!("Failed to build HTTP client: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Failing;

    #[async_trait]
    impl LLMProvider for Failing {
        fn name(&self) -> &str {
            "failing"
        }

        fn error_tag(&self) -> &str {
            "Failing Agent"
        }

        async fn generate(&self, _prompt: &str) -> Result<String> {
            Err(LLMError::NetworkError("connection reset".to_string()))
        }
    }

    #[test]
    fn test_failed_reply_text() {
        let reply = Reply::failed("Groq Agent", LLMError::UnexpectedFormat("{}".to_string()));
        assert!(reply.is_failure());
        assert!(matches!(reply.error(), Some(LLMError::UnexpectedFormat(_))));
        assert_eq!(
            reply.text(),
            "Groq Agent Error: Unexpected response format - {}"
        );
    }

    #[test]
    fn test_text_reply() {
        let reply = Reply::Text("hello".to_string());
        assert!(!reply.is_failure());
        assert!(reply.error().is_none());
        assert_eq!(reply.to_string(), "hello");
        assert_eq!(reply.into_text(), "hello");
    }

    #[test]
    fn test_status_mapping() {
        let err = LLMError::from_status("Groq", reqwest::StatusCode::UNAUTHORIZED, "bad key".into());
        assert!(matches!(err, LLMError::AuthenticationFailed(_)));

        let err = LLMError::from_status(
            "Groq",
            reqwest::StatusCode::TOO_MANY_REQUESTS,
            "try again in 7.5s".into(),
        );
        assert!(matches!(err, LLMError::RateLimitExceeded(ref body) if body == "try again in 7.5s"));
        assert_eq!(err.to_string(), "Rate limit exceeded: try again in 7.5s");

        let err = LLMError::from_status("Groq", reqwest::StatusCode::BAD_GATEWAY, "upstream".into());
        assert_eq!(
            err.to_string(),
            "Provider unavailable: Groq API error (502 Bad Gateway): upstream"
        );
    }

    #[tokio::test]
    async fn test_invoke_folds_error_into_text() {
        let reply = Failing.invoke("anything").await;
        assert!(reply.is_failure());
        assert!(reply.text().starts_with("Failing Agent Error: "));
        assert!(reply.text().contains("connection reset"));
    }
}
