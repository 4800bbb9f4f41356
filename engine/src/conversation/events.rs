//! Progress notifications from a running collaboration
//!
//! The loop itself never prints. Front ends implement
//! [`CollaborationObserver`] to show progress as it happens.

use sdk::types::{Speaker, TranscriptEntry};

/// Something that happened during a run, in order of occurrence
#[derive(Debug, Clone, Copy)]
pub enum CollaborationEvent<'a> {
    /// The turn planner call is about to be made
    PlanningStarted,

    /// The turn budget is fixed
    TurnsPlanned { turns: u32 },

    /// A turn begins (1-based)
    TurnStarted { turn: u32, max_turns: u32 },

    /// A model call for `speaker` is in flight
    AgentThinking { speaker: Speaker },

    /// The reply has been appended to the transcript
    AgentReplied { entry: &'a TranscriptEntry },

    /// The summary call is about to be made
    SummaryStarted,

    /// Summary text is available
    SummaryReady { summary: &'a str },
}

/// Receives [`CollaborationEvent`]s synchronously from the loop
pub trait CollaborationObserver: Send + Sync {
    fn on_event(&self, event: &CollaborationEvent<'_>);
}

/// Observer that ignores everything
pub struct SilentObserver;

impl CollaborationObserver for SilentObserver {
    fn on_event(&self, _event: &CollaborationEvent<'_>) {}
}
