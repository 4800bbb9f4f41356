//! Prompt Builder
//!
//! Renders the instruction text each agent receives. Everything here is a
//! pure function of the task, the transcript so far and the turn position.

use sdk::types::{Speaker, Transcript};

/// Directive used on every follow-up turn except the last
pub const CONTINUE_DIRECTIVE: &str =
    "Continue the collaborative discussion, building on what has been shared so far.";

/// Opening words of the final-turn directive
pub const CONCLUDE_DIRECTIVE_LEAD: &str = "As this is the final turn";

/// Glue between the partner's opening prompt and the primary's first reply
pub const OPENING_REPLY_PREAMBLE: &str = "\n\nAgent 1 said: ";

struct Persona {
    specialties: [&'static str; 3],
    opening_instruction: &'static str,
    opening_focus: &'static str,
}

const PRIMARY_PERSONA: Persona = Persona {
    specialties: [
        "Creative thinking and ideation",
        "Structured planning",
        "Considering multiple perspectives",
    ],
    opening_instruction: "Begin by introducing yourself to Agent 2 and outline your initial thoughts on how to approach this task.",
    opening_focus: "Focus on the big picture and strategic elements.",
};

const PARTNER_PERSONA: Persona = Persona {
    specialties: [
        "Detailed analysis and implementation",
        "Technical precision",
        "Pragmatic refinement of ideas",
    ],
    opening_instruction: "Wait for Agent 1's initial thoughts, then respond with your specialized perspective.",
    opening_focus: "Feel free to build on their ideas while adding your technical insights.",
};

fn persona(speaker: Speaker) -> &'static Persona {
    match speaker {
        Speaker::Primary => &PRIMARY_PERSONA,
        Speaker::Partner => &PARTNER_PERSONA,
    }
}

/// Renders role-specific prompts for the two agents
#[derive(Debug, Clone)]
pub struct PromptBuilder {
    primary_name: String,
    partner_name: String,
}

impl PromptBuilder {
    /// `primary_name` / `partner_name` are the model names the agents are
    /// introduced with, e.g. "Gemini 2.0 Flash".
    pub fn new(primary_name: impl Into<String>, partner_name: impl Into<String>) -> Self {
        Self {
            primary_name: primary_name.into(),
            partner_name: partner_name.into(),
        }
    }

    pub fn display_name(&self, speaker: Speaker) -> &str {
        match speaker {
            Speaker::Primary => &self.primary_name,
            Speaker::Partner => &self.partner_name,
        }
    }

    /// "Agent 1 (Gemini 2.0 Flash)"
    pub fn label(&self, speaker: Speaker) -> String {
        format!("Agent {} ({})", speaker.number(), self.display_name(speaker))
    }

    /// Transcript as `"<label>: <text>"` paragraphs separated by blank lines.
    ///
    /// Labels come from each entry's recorded speaker.
    pub fn render_history(&self, transcript: &Transcript) -> String {
        transcript
            .iter()
            .map(|entry| format!("{}: {}", self.label(entry.speaker), entry.text))
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    /// Turn 1 prompt. Carries no history.
    pub fn opening_prompt(&self, speaker: Speaker, task: &str) -> String {
        let persona = persona(speaker);
        let specialties = persona
            .specialties
            .iter()
            .map(|s| format!("- {}", s))
            .collect::<Vec<_>>()
            .join("\n");

        format!(
            "You are {me}, working collaboratively with {other} on this task:\n\
             \"{task}\"\n\
             \n\
             Your specialties are:\n\
             {specialties}\n\
             \n\
             {instruction}\n\
             {focus}",
            me = self.label(speaker),
            other = self.label(speaker.other()),
            task = task,
            specialties = specialties,
            instruction = persona.opening_instruction,
            focus = persona.opening_focus,
        )
    }

    /// Partner's turn 1 prompt with the primary's first reply quoted after it.
    ///
    /// The opening prompt has no history section, so the reply is attached
    /// explicitly.
    pub fn opening_response_prompt(&self, task: &str, primary_reply: &str) -> String {
        format!(
            "{}{}{}",
            self.opening_prompt(Speaker::Partner, task),
            OPENING_REPLY_PREAMBLE,
            primary_reply
        )
    }

    /// Prompt for turns 2..=max_turns, embedding the whole transcript.
    pub fn follow_up_prompt(
        &self,
        speaker: Speaker,
        task: &str,
        transcript: &Transcript,
        turn: u32,
        max_turns: u32,
    ) -> String {
        let directive = if turn == max_turns {
            format!(
                "{}, work with Agent {} to conclude and present a final solution or recommendation.",
                CONCLUDE_DIRECTIVE_LEAD,
                speaker.other().number()
            )
        } else {
            CONTINUE_DIRECTIVE.to_string()
        };

        format!(
            "You are {me}. Review the conversation so far about the task: \"{task}\"\n\
             \n\
             Conversation history:\n\
             {history}\n\
             \n\
             This is turn {turn} of {max_turns}.\n\
             \n\
             {directive}\n\
             \n\
             Be concise but insightful. Advance the solution forward meaningfully.",
            me = self.label(speaker),
            task = task,
            history = self.render_history(transcript),
            turn = turn,
            max_turns = max_turns,
            directive = directive,
        )
    }

    /// Report instruction sent to the primary once the loop is done.
    pub fn summary_prompt(&self, task: &str, transcript: &Transcript) -> String {
        format!(
            "Review this conversation between two AI agents collaborating on the task: \"{task}\"\n\
             \n\
             Full conversation:\n\
             {history}\n\
             \n\
             Provide:\n\
             1. A concise summary of the key insights and ideas generated\n\
             2. The final solution or approach recommended\n\
             3. How the collaboration between agents enhanced the result\n\
             \n\
             Format your response as a structured final report.",
            task = task,
            history = self.render_history(transcript),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn builder() -> PromptBuilder {
        PromptBuilder::new("Gemini", "Deepseek")
    }

    fn sample_transcript() -> Transcript {
        let mut transcript = Transcript::new();
        transcript.push(Speaker::Primary, "Let's start with the itinerary.", false);
        transcript.push(Speaker::Partner, "Agreed, day one: Fushimi Inari.", false);
        transcript
    }

    #[test]
    fn test_labels() {
        let prompts = builder();
        assert_eq!(prompts.label(Speaker::Primary), "Agent 1 (Gemini)");
        assert_eq!(prompts.label(Speaker::Partner), "Agent 2 (Deepseek)");
    }

    #[test]
    fn test_render_history_uses_recorded_speaker() {
        let prompts = builder();
        let mut transcript = Transcript::new();
        // Out-of-order authorship must still be labelled correctly
        transcript.push(Speaker::Partner, "b first", false);
        transcript.push(Speaker::Partner, "b again", false);

        assert_eq!(
            prompts.render_history(&transcript),
            "Agent 2 (Deepseek): b first\n\nAgent 2 (Deepseek): b again"
        );
    }

    #[test]
    fn test_opening_prompts_have_no_history() {
        let prompts = builder();
        let primary = prompts.opening_prompt(Speaker::Primary, "Plan a trip");
        let partner = prompts.opening_prompt(Speaker::Partner, "Plan a trip");

        assert!(primary.starts_with(
            "You are Agent 1 (Gemini), working collaboratively with Agent 2 (Deepseek)"
        ));
        assert!(primary.contains("\"Plan a trip\""));
        assert!(primary.contains("- Structured planning"));
        assert!(primary.contains("introducing yourself"));
        assert!(!primary.contains("Conversation history"));

        assert!(partner.contains("- Technical precision"));
        assert!(partner.contains("Wait for Agent 1's initial thoughts"));
        assert!(!partner.contains("Conversation history"));
    }

    #[test]
    fn test_opening_response_prompt_quotes_primary() {
        let prompts = builder();
        let prompt = prompts.opening_response_prompt("Plan a trip", "Hello, I'm Agent 1.");

        assert!(prompt.starts_with(&prompts.opening_prompt(Speaker::Partner, "Plan a trip")));
        assert!(prompt.ends_with("\n\nAgent 1 said: Hello, I'm Agent 1."));
    }

    #[test]
    fn test_follow_up_continue_directive() {
        let prompts = builder();
        let transcript = sample_transcript();

        for turn in 2..5 {
            let prompt = prompts.follow_up_prompt(Speaker::Primary, "t", &transcript, turn, 5);
            assert!(prompt.contains(CONTINUE_DIRECTIVE));
            assert!(!prompt.contains(CONCLUDE_DIRECTIVE_LEAD));
            assert!(prompt.contains(&format!("This is turn {} of 5.", turn)));
        }
    }

    #[test]
    fn test_follow_up_final_turn_directive() {
        let prompts = builder();
        let transcript = sample_transcript();

        let primary = prompts.follow_up_prompt(Speaker::Primary, "t", &transcript, 5, 5);
        let partner = prompts.follow_up_prompt(Speaker::Partner, "t", &transcript, 5, 5);

        assert!(primary.contains(
            "As this is the final turn, work with Agent 2 to conclude and present a final solution or recommendation."
        ));
        assert!(partner.contains("As this is the final turn, work with Agent 1 to conclude"));
        assert!(!primary.contains(CONTINUE_DIRECTIVE));
    }

    #[test]
    fn test_follow_up_embeds_history() {
        let prompts = builder();
        let prompt = prompts.follow_up_prompt(Speaker::Partner, "t", &sample_transcript(), 2, 4);

        assert!(prompt.starts_with("You are Agent 2 (Deepseek). Review the conversation"));
        assert!(prompt.contains(
            "Conversation history:\nAgent 1 (Gemini): Let's start with the itinerary.\n\nAgent 2 (Deepseek): Agreed, day one: Fushimi Inari.\n"
        ));
    }

    #[test]
    fn test_summary_prompt() {
        let prompts = builder();
        let prompt = prompts.summary_prompt("Plan a trip", &sample_transcript());

        assert!(prompt.contains("collaborating on the task: \"Plan a trip\""));
        assert!(prompt.contains("Agent 2 (Deepseek): Agreed, day one: Fushimi Inari."));
        assert!(prompt.contains("1. A concise summary of the key insights"));
        assert!(prompt.ends_with("Format your response as a structured final report."));
    }
}
