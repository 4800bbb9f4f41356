use super::prompts::PromptBuilder;
use crate::llm::LLMProvider;
use sdk::types::Transcript;
use std::sync::Arc;

/// Sends the finished transcript back to the primary model for a report
pub struct Summarizer {
    llm: Arc<dyn LLMProvider>,
    prompts: PromptBuilder,
}

impl Summarizer {
    pub fn new(llm: Arc<dyn LLMProvider>, prompts: PromptBuilder) -> Self {
        Self { llm, prompts }
    }

    /// Returns the model's report verbatim, or the tagged error text.
    pub async fn summarize(&self, task: &str, transcript: &Transcript) -> String {
        let reply = self
            .llm
            .invoke(&self.prompts.summary_prompt(task, transcript))
            .await;

        if reply.is_failure() {
            tracing::warn!("Summary call failed; saving the error text as the summary");
        }

        reply.into_text()
    }
}
