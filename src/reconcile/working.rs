/*!
 * Mutable working copy of a cue sequence.
 *
 * Every cue carries a tagged text: either live text or a tombstone marking it
 * for removal at compaction. Global indices stay stable until compaction.
 */

use crate::subtitle_processor::SubtitleEntry;

/// Text slot of a working cue
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CueText {
    /// Text that will be written out
    Live(String),
    /// Cue merged into a predecessor, removed at compaction
    Tombstoned,
}

impl CueText {
    /// Live text, or `None` for a tombstone
    pub fn as_live(&self) -> Option<&str> {
        match self {
            Self::Live(text) => Some(text),
            Self::Tombstoned => None,
        }
    }
}

/// One cue of the working copy
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkingCue {
    /// 0-based position in the sequence the copy was made from
    pub index: usize,
    /// Start time in ms
    pub start_time_ms: u64,
    /// End time in ms, may be extended by the consolidator
    pub end_time_ms: u64,
    /// Current text or tombstone
    pub text: CueText,
}

impl WorkingCue {
    /// True once the cue has been tombstoned
    pub fn is_tombstoned(&self) -> bool {
        matches!(self.text, CueText::Tombstoned)
    }

    /// Replace the text; a tombstoned cue stays tombstoned
    pub fn set_text(&mut self, text: String) -> bool {
        if self.is_tombstoned() {
            return false;
        }
        self.text = CueText::Live(text);
        true
    }

    /// Mark the cue for removal, returning false if it already was
    pub fn tombstone(&mut self) -> bool {
        if self.is_tombstoned() {
            return false;
        }
        self.text = CueText::Tombstoned;
        true
    }
}

/// Copy a loaded sequence into working cues
pub fn working_copy(entries: &[SubtitleEntry]) -> Vec<WorkingCue> {
    entries
        .iter()
        .enumerate()
        .map(|(index, entry)| WorkingCue {
            index,
            start_time_ms: entry.start_time_ms,
            end_time_ms: entry.end_time_ms,
            text: CueText::Live(entry.text.clone()),
        })
        .collect()
}
