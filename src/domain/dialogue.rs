use serde::{Deserialize, Serialize};

/// One scripted turn of speech. `speaker` names a personality; order within
/// a transcript is read order, synthesis order and stitch order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DialogueSegment {
    pub speaker: String,
    pub line: String,
}

impl DialogueSegment {
    pub fn new(speaker: impl Into<String>, line: impl Into<String>) -> Self {
        Self {
            speaker: speaker.into(),
            line: line.into(),
        }
    }

    /// A segment with no spoken text yields no audio.
    pub fn is_silent(&self) -> bool {
        self.line.trim().is_empty()
    }
}
