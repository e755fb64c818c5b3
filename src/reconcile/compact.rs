use log::debug;

use crate::subtitle_processor::SubtitleEntry;

use super::working::{CueText, WorkingCue, working_copy};

/// Result of a compaction pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Compaction {
    /// Surviving cues in their original relative order, renumbered from 1
    pub entries: Vec<SubtitleEntry>,
    /// Number of tombstoned cues dropped
    pub removed: usize,
}

/// Drop every tombstoned cue and renumber the survivors
pub fn compact(cues: Vec<WorkingCue>) -> Compaction {
    let total = cues.len();
    let entries: Vec<SubtitleEntry> = cues
        .into_iter()
        .filter_map(|cue| match cue.text {
            CueText::Live(text) => Some((cue.start_time_ms, cue.end_time_ms, text)),
            CueText::Tombstoned => None,
        })
        .enumerate()
        .map(|(position, (start, end, text))| SubtitleEntry::new(position + 1, start, end, text))
        .collect();

    let removed = total - entries.len();
    debug!("Compaction kept {} of {} cues", entries.len(), total);
    Compaction { entries, removed }
}

/// Compact an already persisted sequence; a saved file holds no tombstones
pub fn recompact(entries: &[SubtitleEntry]) -> Compaction {
    compact(working_copy(entries))
}
