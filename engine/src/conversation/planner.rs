//! Turn Planner
//!
//! Asks the primary model how many turns a task deserves and turns whatever
//! comes back into a bounded [`TurnBudget`].

use crate::llm::{LLMProvider, Reply};
use std::fmt;
use std::num::IntErrorKind;
use std::sync::Arc;

/// Planned number of turns for one run, always within
/// [`TurnBudget::MIN`]..=[`TurnBudget::MAX`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct TurnBudget(u32);

impl TurnBudget {
    pub const MIN: u32 = 3;
    pub const MAX: u32 = 10;
    pub const FALLBACK: u32 = 5;

    /// Pull any integer into range. Out-of-range values go to the nearest bound.
    pub fn clamped(turns: i64) -> Self {
        Self(turns.clamp(Self::MIN as i64, Self::MAX as i64) as u32)
    }

    /// Used when the planner reply cannot be read as a number
    pub fn fallback() -> Self {
        Self(Self::FALLBACK)
    }

    /// Parse a planner reply. `None` for anything that is not a bare integer.
    ///
    /// Integers too large for `i64` still count as numbers and clamp.
    pub fn parse(reply: &str) -> Option<Self> {
        match reply.trim().parse::<i64>() {
            Ok(n) => Some(Self::clamped(n)),
            Err(e) => match e.kind() {
                IntErrorKind::PosOverflow => Some(Self(Self::MAX)),
                IntErrorKind::NegOverflow => Some(Self(Self::MIN)),
                _ => None,
            },
        }
    }

    pub fn get(self) -> u32 {
        self.0
    }
}

impl fmt::Display for TurnBudget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Fixed planning instruction
pub fn planning_prompt(task: &str) -> String {
    format!(
        "You are tasked with determining the optimal number of conversation turns needed for two AI agents\n\
         to solve this task: \"{task}\"\n\
         \n\
         Consider:\n\
         1. Task complexity (simple tasks need fewer turns)\n\
         2. Need for brainstorming (creative tasks may need more turns)\n\
         3. Need for refinement (tasks requiring precision may need more turns)\n\
         \n\
         Return only a number between {min} and {max} representing the optimal number of turns.",
        task = task,
        min = TurnBudget::MIN,
        max = TurnBudget::MAX,
    )
}

pub struct TurnPlanner {
    llm: Arc<dyn LLMProvider>,
}

impl TurnPlanner {
    pub fn new(llm: Arc<dyn LLMProvider>) -> Self {
        Self { llm }
    }

    /// One model call, never fails. Unreadable replies fall back to
    /// [`TurnBudget::FALLBACK`].
    pub async fn plan(&self, task: &str) -> TurnBudget {
        let reply = self.llm.invoke(&planning_prompt(task)).await;
        budget_from_reply(&reply)
    }
}

fn budget_from_reply(reply: &Reply) -> TurnBudget {
    if let Some(error) = reply.error() {
        tracing::warn!(
            error = %error,
            "Turn planning call failed, using {} turns",
            TurnBudget::FALLBACK
        );
        return TurnBudget::fallback();
    }

    match TurnBudget::parse(reply.text()) {
        Some(budget) => budget,
        None => {
            tracing::warn!(
                reply = reply.text(),
                "Turn planner reply is not a number, using {} turns",
                TurnBudget::FALLBACK
            );
            TurnBudget::fallback()
        }
    }
}
