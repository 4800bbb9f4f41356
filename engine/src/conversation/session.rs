//! Conversation Loop
//!
//! Runs one collaboration end to end:
//!
//! 1. plan a turn budget with the primary model,
//! 2. opening turn: primary introduces itself, partner answers with the
//!    primary's reply quoted after its own opening prompt,
//! 3. turns 2..=N: primary then partner, each seeing the full transcript,
//! 4. summary from the primary.
//!
//! Calls are strictly sequential. Failed calls are recorded as tagged error
//! text and the loop carries on; nothing shortens or extends the budget
//! once it is planned.

use super::events::{CollaborationEvent, CollaborationObserver, SilentObserver};
use super::planner::{TurnBudget, TurnPlanner};
use super::prompts::PromptBuilder;
use super::summarizer::Summarizer;
use crate::llm::LLMProvider;
use sdk::types::{CollaborationResult, Speaker, Transcript};
use std::sync::Arc;
use tracing::Instrument;

pub struct Collaboration {
    primary: Arc<dyn LLMProvider>,
    partner: Arc<dyn LLMProvider>,
    prompts: PromptBuilder,
    planner: TurnPlanner,
    summarizer: Summarizer,
    observer: Arc<dyn CollaborationObserver>,
}

impl Collaboration {
    /// Planning and summarizing both go to `primary`.
    pub fn new(
        primary: Arc<dyn LLMProvider>,
        partner: Arc<dyn LLMProvider>,
        prompts: PromptBuilder,
    ) -> Self {
        Self {
            planner: TurnPlanner::new(Arc::clone(&primary)),
            summarizer: Summarizer::new(Arc::clone(&primary), prompts.clone()),
            primary,
            partner,
            prompts,
            observer: Arc::new(SilentObserver),
        }
    }

    pub fn with_observer(mut self, observer: Arc<dyn CollaborationObserver>) -> Self {
        self.observer = observer;
        self
    }

    pub fn prompts(&self) -> &PromptBuilder {
        &self.prompts
    }

    /// Run the whole collaboration for `task`.
    ///
    /// Always produces a result; provider failures show up as error text
    /// inside the transcript or summary.
    pub async fn run(&self, task: &str) -> CollaborationResult {
        let run_id = uuid::Uuid::new_v4();
        let span = tracing::info_span!("collaboration", %run_id);

        async move {
            tracing::info!("Starting collaboration on task: {}", task);

            self.emit(CollaborationEvent::PlanningStarted);
            let budget = self.planner.plan(task).await;
            tracing::info!("Planned {} turns", budget);
            self.emit(CollaborationEvent::TurnsPlanned {
                turns: budget.get(),
            });

            let transcript = self.converse(task, budget).await;

            self.emit(CollaborationEvent::SummaryStarted);
            let summary = self.summarizer.summarize(task, &transcript).await;
            self.emit(CollaborationEvent::SummaryReady { summary: &summary });

            tracing::info!(
                entries = transcript.len(),
                failures = transcript.failure_count(),
                "Collaboration finished"
            );

            CollaborationResult {
                task: task.to_string(),
                turn_count: budget.get(),
                transcript,
                summary,
            }
        }
        .instrument(span)
        .await
    }

    /// Turn loop only. Returns `2 * budget` entries alternating primary/partner.
    pub async fn converse(&self, task: &str, budget: TurnBudget) -> Transcript {
        let max_turns = budget.get();
        let mut transcript = Transcript::new();

        self.emit(CollaborationEvent::TurnStarted { turn: 1, max_turns });
        let opening = self.prompts.opening_prompt(Speaker::Primary, task);
        self.speak(Speaker::Primary, &opening, &mut transcript).await;

        let primary_reply = transcript.last().map(|e| e.text.as_str()).unwrap_or("");
        let response = self.prompts.opening_response_prompt(task, primary_reply);
        self.speak(Speaker::Partner, &response, &mut transcript).await;

        for turn in 2..=max_turns {
            self.emit(CollaborationEvent::TurnStarted { turn, max_turns });

            for speaker in [Speaker::Primary, Speaker::Partner] {
                // Rebuilt per speaker so the partner sees the primary's reply from this turn
                let prompt =
                    self.prompts
                        .follow_up_prompt(speaker, task, &transcript, turn, max_turns);
                self.speak(speaker, &prompt, &mut transcript).await;
            }
        }

        transcript
    }

    async fn speak(&self, speaker: Speaker, prompt: &str, transcript: &mut Transcript) {
        self.emit(CollaborationEvent::AgentThinking { speaker });

        let reply = self.provider(speaker).invoke(prompt).await;
        let failed = reply.is_failure();
        transcript.push(speaker, reply.into_text(), failed);

        if let Some(entry) = transcript.last() {
            self.emit(CollaborationEvent::AgentReplied { entry });
        }
    }

    fn provider(&self, speaker: Speaker) -> &dyn LLMProvider {
        match speaker {
            Speaker::Primary => self.primary.as_ref(),
            Speaker::Partner => self.partner.as_ref(),
        }
    }

    fn emit(&self, event: CollaborationEvent<'_>) {
        self.observer.on_event(&event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::{LLMError, Result};
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// Replies from a queue, then echoes "<name> reply N"
    struct Scripted {
        name: &'static str,
        queue: Mutex<VecDeque<Result<String>>>,
        prompts: Mutex<Vec<String>>,
    }

    impl Scripted {
        fn new(name: &'static str, queue: Vec<Result<String>>) -> Arc<Self> {
            Arc::new(Self {
                name,
                queue: Mutex::new(queue.into()),
                prompts: Mutex::new(Vec::new()),
            })
        }

        fn prompts(&self) -> Vec<String> {
            self.prompts.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl LLMProvider for Scripted {
        fn name(&self) -> &str {
            self.name
        }

        fn error_tag(&self) -> &str {
            "Scripted Agent"
        }

        async fn generate(&self, prompt: &str) -> Result<String> {
            let mut prompts = self.prompts.lock().unwrap();
            prompts.push(prompt.to_string());
            let n = prompts.len();
            self.queue
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Ok(format!("{} reply {}", self.name, n)))
        }
    }

    struct Recorder(Mutex<Vec<String>>);

    impl CollaborationObserver for Recorder {
        fn on_event(&self, event: &CollaborationEvent<'_>) {
            let line = match event {
                CollaborationEvent::PlanningStarted => "plan".to_string(),
                CollaborationEvent::TurnsPlanned { turns } => format!("planned {}", turns),
                CollaborationEvent::TurnStarted { turn, .. } => format!("turn {}", turn),
                CollaborationEvent::AgentThinking { speaker } => {
                    format!("thinking {}", speaker.number())
                }
                CollaborationEvent::AgentReplied { entry } => {
                    format!("replied {}", entry.speaker.number())
                }
                CollaborationEvent::SummaryStarted => "summary".to_string(),
                CollaborationEvent::SummaryReady { .. } => "done".to_string(),
            };
            self.0.lock().unwrap().push(line);
        }
    }

    fn prompts() -> PromptBuilder {
        PromptBuilder::new("Gemini", "Deepseek")
    }

    #[tokio::test]
    async fn test_converse_alternates_and_sizes() {
        let primary = Scripted::new("a", vec![]);
        let partner = Scripted::new("b", vec![]);
        let collab = Collaboration::new(primary.clone(), partner.clone(), prompts());

        let transcript = collab.converse("task", TurnBudget::clamped(3)).await;

        assert_eq!(transcript.len(), 6);
        for (i, entry) in transcript.iter().enumerate() {
            assert_eq!(entry.speaker, Speaker::at_position(i));
        }
        assert_eq!(primary.prompts().len(), 3);
        assert_eq!(partner.prompts().len(), 3);
    }

    #[tokio::test]
    async fn test_opening_partner_prompt_quotes_primary() {
        let primary = Scripted::new("a", vec![Ok("Hi, I'm Agent 1.".to_string())]);
        let partner = Scripted::new("b", vec![]);
        let collab = Collaboration::new(primary.clone(), partner.clone(), prompts());

        collab.converse("task", TurnBudget::clamped(3)).await;

        let first_partner_prompt = &partner.prompts()[0];
        assert!(first_partner_prompt.ends_with("\n\nAgent 1 said: Hi, I'm Agent 1."));
        assert!(!first_partner_prompt.contains("Conversation history"));
    }

    #[tokio::test]
    async fn test_partner_sees_primary_reply_from_same_turn() {
        let primary = Scripted::new("a", vec![]);
        let partner = Scripted::new("b", vec![]);
        let collab = Collaboration::new(primary.clone(), partner.clone(), prompts());

        collab.converse("task", TurnBudget::clamped(3)).await;

        // Primary's second call is its turn-2 reply "a reply 2"
        let partner_turn_two = &partner.prompts()[1];
        assert!(partner_turn_two.contains("Agent 1 (Gemini): a reply 2"));
        assert!(partner_turn_two.contains("This is turn 2 of 3."));

        let primary_turn_two = &primary.prompts()[1];
        assert!(!primary_turn_two.contains("a reply 2"));
    }

    #[tokio::test]
    async fn test_failed_call_is_recorded_and_loop_continues() {
        let primary = Scripted::new("a", vec![]);
        let partner = Scripted::new(
            "b",
            vec![Err(LLMError::UnexpectedFormat(r#"{"choices":[]}"#.to_string()))],
        );
        let collab = Collaboration::new(primary, partner, prompts());

        let transcript = collab.converse("task", TurnBudget::clamped(3)).await;

        assert_eq!(transcript.len(), 6);
        let entry = &transcript.entries()[1];
        assert!(entry.failed);
        assert_eq!(
            entry.text,
            r#"Scripted Agent Error: Unexpected response format - {"choices":[]}"#
        );
        assert_eq!(transcript.failure_count(), 1);
    }

    #[tokio::test]
    async fn test_run_uses_planned_budget_and_summarizes_once() {
        let primary = Scripted::new("a", vec![Ok("4".to_string())]);
        let partner = Scripted::new("b", vec![]);
        let collab = Collaboration::new(primary.clone(), partner.clone(), prompts());

        let result = collab.run("Plan a 3-day trip to Kyoto").await;

        assert_eq!(result.turn_count, 4);
        assert_eq!(result.transcript.len(), 8);
        // plan + 4 turns + summary
        assert_eq!(primary.prompts().len(), 6);
        assert_eq!(partner.prompts().len(), 4);
        assert_eq!(result.summary, "a reply 6");
    }

    #[tokio::test]
    async fn test_event_order() {
        let primary = Scripted::new("a", vec![Ok("3".to_string())]);
        let partner = Scripted::new("b", vec![]);
        let recorder = Arc::new(Recorder(Mutex::new(Vec::new())));
        let collab =
            Collaboration::new(primary, partner, prompts()).with_observer(recorder.clone());

        collab.run("task").await;

        let events = recorder.0.lock().unwrap().clone();
        assert_eq!(&events[..3], ["plan", "planned 3", "turn 1"]);
        assert_eq!(
            &events[3..7],
            ["thinking 1", "replied 1", "thinking 2", "replied 2"]
        );
        assert_eq!(events.iter().filter(|e| e.starts_with("turn")).count(), 3);
        assert_eq!(&events[events.len() - 2..], ["summary", "done"]);
    }
}
