use super::{LLMError, LLMProvider};
use crate::config::GroqConfig;
use crate::secrets::SecretString;
use async_trait::async_trait;
use sdk::errors::EngineError;
use serde_json::json;

/// Partner agent: OpenAI-compatible `/chat/completions` (Groq by default)
pub struct GroqProvider {
    config: GroqConfig,
    api_key: SecretString,
    client: reqwest::Client,
}

impl GroqProvider {
    pub fn new(config: GroqConfig, api_key: SecretString) -> Result<Self, EngineError> {
        Ok(Self {
            config,
            api_key,
            client: super::build_http_client()?,
        })
    }

    pub fn model(&self) -> &str {
        &self.config.model
    }

    fn payload(&self, prompt: &str) -> serde_json::Value {
        json!({
            "model": self.config.model,
            "messages": [{"role": "user", "content": prompt}],
            "temperature": self.config.temperature,
            "max_tokens": self.config.max_tokens,
            "top_p": self.config.top_p,
        })
    }
}

/// Pull `choices[0].message.content` out of a decoded body.
///
/// Anything else, including an empty `choices` array or an error object,
/// is reported with the raw body attached.
fn extract_content(data: &serde_json::Value) -> super::Result<String> {
    data.get("choices")
        .and_then(|c| c.as_array())
        .and_then(|c| c.first())
        .and_then(|choice| choice.get("message"))
        .and_then(|message| message.get("content"))
        .and_then(|content| content.as_str())
        .map(str::to_string)
        .ok_or_else(|| LLMError::UnexpectedFormat(data.to_string()))
}

#[async_trait]
impl LLMProvider for GroqProvider {
    fn name(&self) -> &str {
        "groq"
    }

    fn error_tag(&self) -> &str {
        "Groq Agent"
    }

    async fn generate(&self, prompt: &str) -> super::Result<String> {
        let url = format!("{}/chat/completions", self.config.base_url);

        let response = self
            .client
            .post(&url)
            .bearer_auth(self.api_key.unsecure())
            .header("Content-Type", "application/json")
            .json(&self.payload(prompt))
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(LLMError::from_status("Groq", status, body));
        }

        let data: serde_json::Value =
            serde_json::from_str(&body).map_err(|_| LLMError::UnexpectedFormat(body.clone()))?;

        extract_content(&data)
    }
}
