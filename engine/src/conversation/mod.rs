//! Conversation System
//!
//! Turn planning, prompt rendering, the two-agent turn loop and the final
//! summary.

pub mod events;
pub mod planner;
pub mod prompts;
pub mod session;
pub mod summarizer;

pub use events::{CollaborationEvent, CollaborationObserver, SilentObserver};
pub use planner::{planning_prompt, TurnBudget, TurnPlanner};
pub use prompts::{PromptBuilder, CONCLUDE_DIRECTIVE_LEAD, CONTINUE_DIRECTIVE};
pub use session::Collaboration;
pub use summarizer::Summarizer;
