/*!
 * Correspondence consolidation for the alignment mode.
 *
 * One round's raw pairs are validated against both windows, folded into the
 * two one-to-many maps and applied to the reference working copy:
 * - every reference cue receives the joined text of its source cues
 * - reference cues sharing one source cue collapse into the lowest of them,
 *   which takes over the end time of the highest, the rest are tombstoned
 */

use std::collections::BTreeMap;

use log::debug;

use crate::errors::ReconcileError;
use crate::subtitle_processor::SubtitleEntry;

use super::prompts::AlignmentPayload;
use super::window::Window;
use super::working::WorkingCue;

/// One validated oracle pair, 1-based and local to the round's windows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CorrespondencePair {
    /// Local index in the reference window
    pub a: usize,
    /// Local index in the source window
    pub b: usize,
}

impl CorrespondencePair {
    /// Validate every raw pair of `payload` against the windows
    ///
    /// A single bad pair rejects the whole round so that a malformed answer
    /// never leaves a half-applied window behind.
    pub fn from_payload(
        payload: &AlignmentPayload,
        window_a: &Window,
        window_b: &Window,
    ) -> Result<Vec<Self>, ReconcileError> {
        payload
            .corresponding_subtitles
            .iter()
            .map(|raw| match raw.as_slice() {
                [a, b] => Ok(Self {
                    a: window_a.check_local(*a, "reference")?,
                    b: window_b.check_local(*b, "source")?,
                }),
                other => Err(ReconcileError::MalformedPayload(format!(
                    "correspondence pair must hold 2 indices, got {:?}",
                    other
                ))),
            })
            .collect()
    }
}

/// Both directions of one round's correspondence relation, keyed by local index
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CorrespondenceMap {
    /// Reference index to the source indices it matches, ascending
    pub a_to_b: BTreeMap<usize, Vec<usize>>,
    /// Source index to the reference indices it matches, ascending
    pub b_to_a: BTreeMap<usize, Vec<usize>>,
}

impl CorrespondenceMap {
    pub fn from_pairs(pairs: &[CorrespondencePair]) -> Self {
        let mut map = Self::default();
        for pair in pairs {
            map.a_to_b.entry(pair.a).or_default().push(pair.b);
            map.b_to_a.entry(pair.b).or_default().push(pair.a);
        }
        for targets in map.a_to_b.values_mut().chain(map.b_to_a.values_mut()) {
            targets.sort_unstable();
            targets.dedup();
        }
        map
    }

    pub fn is_empty(&self) -> bool {
        self.a_to_b.is_empty()
    }

    /// Greatest reference index reported in the round
    pub fn max_a(&self) -> usize {
        self.a_to_b.keys().next_back().copied().unwrap_or(0)
    }

    /// Greatest source index reported in the round
    pub fn max_b(&self) -> usize {
        self.b_to_a.keys().next_back().copied().unwrap_or(0)
    }
}

/// Edits applied by consolidation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConsolidationStats {
    /// Reference cues whose text was replaced
    pub texts_replaced: usize,
    /// Reference cues whose end time was extended over a group
    pub spans_extended: usize,
    /// Reference cues newly tombstoned
    pub tombstoned: usize,
}

impl ConsolidationStats {
    pub fn absorb(&mut self, other: ConsolidationStats) {
        self.texts_replaced += other.texts_replaced;
        self.spans_extended += other.spans_extended;
        self.tombstoned += other.tombstoned;
    }
}

/// Apply one round's correspondence map onto the reference working copy
pub fn consolidate(
    result: &mut [WorkingCue],
    source: &[SubtitleEntry],
    window_a: &Window,
    window_b: &Window,
    map: &CorrespondenceMap,
) -> ConsolidationStats {
    let mut stats = ConsolidationStats::default();

    // One reference phrase, several source phrases: merge the source text
    for (&a, targets) in &map.a_to_b {
        let merged = targets
            .iter()
            .map(|&b| source[window_b.global(b)].text.as_str())
            .collect::<Vec<_>>()
            .join(" ");
        if result[window_a.global(a)].set_text(merged.trim().to_string()) {
            stats.texts_replaced += 1;
        }
    }

    // Several reference phrases, one source phrase: collapse into the first
    for group in map.b_to_a.values().filter(|group| group.len() > 1) {
        let (first, rest) = match group.split_first() {
            Some(split) => split,
            None => continue,
        };
        let last = rest.last().copied().unwrap_or(*first);

        let end_time_ms = result[window_a.global(last)].end_time_ms;
        result[window_a.global(*first)].end_time_ms = end_time_ms;
        stats.spans_extended += 1;

        for &a in rest {
            if result[window_a.global(a)].tombstone() {
                stats.tombstoned += 1;
            }
        }
    }

    debug!(
        "Consolidated window A[{}..{}) B[{}..{}): {} texts, {} spans, {} tombstones",
        window_a.start, window_a.end, window_b.start, window_b.end,
        stats.texts_replaced, stats.spans_extended, stats.tombstoned
    );
    stats
}
