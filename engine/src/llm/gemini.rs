use super::{LLMError, LLMProvider};
use crate::config::GeminiConfig;
use crate::secrets::SecretString;
use async_trait::async_trait;
use sdk::errors::EngineError;
use serde_json::json;

/// Primary agent: Google Gemini `generateContent`
pub struct GeminiProvider {
    config: GeminiConfig,
    api_key: SecretString,
    client: reqwest::Client,
}

impl GeminiProvider {
    pub fn new(config: GeminiConfig, api_key: SecretString) -> Result<Self, EngineError> {
        Ok(Self {
            config,
            api_key,
            client: super::build_http_client()?,
        })
    }

    pub fn model(&self) -> &str {
        &self.config.model
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.config.base_url, self.config.model
        )
    }
}

#[async_trait]
impl LLMProvider for GeminiProvider {
    fn name(&self) -> &str {
        "gemini"
    }

    fn error_tag(&self) -> &str {
        "Gemini Agent"
    }

    async fn generate(&self, prompt: &str) -> super::Result<String> {
        let payload = json!({
            "contents": [{
                "role": "user",
                "parts": [{"text": prompt}]
            }]
        });

        // Key goes in a header so transport errors that echo the URL never carry it
        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", self.api_key.unsecure())
            .header("Content-Type", "application/json")
            .json(&payload)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(LLMError::from_status("Gemini", status, text));
        }

        let data: serde_json::Value = response
            .json()
            .await
            .map_err(|e| LLMError::ParseError(e.to_string()))?;

        let candidate = data
            .get("candidates")
            .and_then(|c| c.as_array())
            .and_then(|c| c.first())
            .ok_or_else(|| {
                LLMError::ParseError(format!("No candidates in response - {}", data))
            })?;

        let parts = candidate
            .get("content")
            .and_then(|c| c.get("parts"))
            .and_then(|p| p.as_array())
            .ok_or_else(|| {
                LLMError::ParseError(format!("No parts in candidate content - {}", data))
            })?;

        let full_text: String = parts
            .iter()
            .filter_map(|part| part.get("text").and_then(|t| t.as_str()))
            .collect();

        Ok(full_text)
    }
}
