//! Conversation data types
//!
//! The transcript and result records shared between the conversation loop,
//! the result store and anything that reads saved collaborations.

use serde::{Deserialize, Serialize};

/// Which of the two agents produced a transcript entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Speaker {
    /// Agent 1, the strategic/creative model. Always speaks first in a turn.
    Primary,

    /// Agent 2, the technical/pragmatic model.
    Partner,
}

impl Speaker {
    /// 1-based agent number used in prompts ("Agent 1", "Agent 2")
    pub fn number(self) -> u8 {
        match self {
            Speaker::Primary => 1,
            Speaker::Partner => 2,
        }
    }

    /// The agent on the other side of the conversation
    pub fn other(self) -> Speaker {
        match self {
            Speaker::Primary => Speaker::Partner,
            Speaker::Partner => Speaker::Primary,
        }
    }

    /// Speaker that the loop writes at a given transcript position.
    ///
    /// Only used when rebuilding a transcript from the flat saved format,
    /// which does not record authorship.
    pub fn at_position(index: usize) -> Speaker {
        if index % 2 == 0 {
            Speaker::Primary
        } else {
            Speaker::Partner
        }
    }
}

/// One reply in the transcript
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscriptEntry {
    /// Agent that produced this reply
    pub speaker: Speaker,

    /// Reply text exactly as shown and saved (error text for failed calls)
    pub text: String,

    /// True when the model call failed and `text` is the tagged error message
    pub failed: bool,
}

/// Append-only log of replies for a single collaboration run
///
/// Persisted as a flat JSON array of reply strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "Vec<String>", from = "Vec<String>")]
pub struct Transcript {
    entries: Vec<TranscriptEntry>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a reply. Entries are never reordered or removed.
    pub fn push(&mut self, speaker: Speaker, text: impl Into<String>, failed: bool) {
        self.entries.push(TranscriptEntry {
            speaker,
            text: text.into(),
            failed,
        });
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[TranscriptEntry] {
        &self.entries
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TranscriptEntry> {
        self.entries.iter()
    }

    pub fn last(&self) -> Option<&TranscriptEntry> {
        self.entries.last()
    }

    /// Number of entries whose model call failed
    pub fn failure_count(&self) -> usize {
        self.entries.iter().filter(|e| e.failed).count()
    }

    /// Reply texts in order
    pub fn texts(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.text.as_str()).collect()
    }
}

impl<'a> IntoIterator for &'a Transcript {
    type Item = &'a TranscriptEntry;
    type IntoIter = std::slice::Iter<'a, TranscriptEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl From<Transcript> for Vec<String> {
    fn from(transcript: Transcript) -> Self {
        transcript.entries.into_iter().map(|e| e.text).collect()
    }
}

impl From<Vec<String>> for Transcript {
    fn from(texts: Vec<String>) -> Self {
        let entries = texts
            .into_iter()
            .enumerate()
            .map(|(i, text)| TranscriptEntry {
                speaker: Speaker::at_position(i),
                text,
                failed: false,
            })
            .collect();
        Self { entries }
    }
}

/// Outcome of one collaboration run
///
/// Serialized field names match the saved result file:
/// `{task, conversation_turns, conversation, summary}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollaborationResult {
    /// The user's task, unchanged
    pub task: String,

    /// Planned number of turns
    #[serde(rename = "conversation_turns")]
    pub turn_count: u32,

    /// Every reply in the order it was produced
    #[serde(rename = "conversation")]
    pub transcript: Transcript,

    /// Final report produced by the primary agent
    pub summary: String,
}
