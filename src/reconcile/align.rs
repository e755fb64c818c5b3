/*!
 * Alignment loop.
 *
 * Walks the reference and source sequences with two cursors, asks the oracle
 * which phrases correspond inside the current pair of windows and consolidates
 * each answer into a working copy of the reference. The loop stops when a
 * cursor runs off its sequence, the oracle reports no matches, or a round fails;
 * in every case the working copy is compacted and returned.
 */

use log::{error, info};

use crate::errors::ReconcileError;
use crate::subtitle_processor::SubtitleEntry;

use super::compact::compact;
use super::consolidate::{ConsolidationStats, CorrespondenceMap, CorrespondencePair, consolidate};
use super::oracle::Oracle;
use super::outcome::{AlignmentOutcome, Termination};
use super::prompts::{AlignmentContract, OracleContract};
use super::window::{AlignmentCursor, Window, WindowConfig};
use super::working::{WorkingCue, working_copy};

/// Applied round: greatest local indices and the edits made
struct RoundReport {
    max_a: usize,
    max_b: usize,
    stats: ConsolidationStats,
}

/// Re-times the source text onto the reference cues
pub struct SubtitleAligner<'a> {
    oracle: &'a dyn Oracle,
    config: WindowConfig,
}

impl<'a> SubtitleAligner<'a> {
    pub fn new(oracle: &'a dyn Oracle, config: WindowConfig) -> Self {
        Self { oracle, config }
    }

    /// Run the alignment loop to termination
    ///
    /// `progress` receives the reference cursor and the reference length after
    /// every applied round.
    pub async fn align<F>(
        &self,
        reference: &[SubtitleEntry],
        source: &[SubtitleEntry],
        progress: F,
    ) -> AlignmentOutcome
    where
        F: Fn(usize, usize),
    {
        let (len_a, len_b) = (reference.len(), source.len());
        let mut result = working_copy(reference);
        let mut cursor = AlignmentCursor::default();
        let mut stats = ConsolidationStats::default();
        let mut rounds = 0;

        let termination = loop {
            if !cursor.is_active(len_a, len_b) {
                break Termination::Completed;
            }

            let (window_a, window_b) = cursor.windows(&self.config, len_a, len_b);
            info!(
                "Matching reference range {}..{} of {} with source range {}..{} of {}",
                window_a.start, window_a.end, len_a, window_b.start, window_b.end, len_b
            );

            match self.round(&mut result, reference, source, &window_a, &window_b).await {
                Ok(Some(report)) => {
                    rounds += 1;
                    stats.absorb(report.stats);
                    cursor = cursor.advance(report.max_a, report.max_b, self.config.overlap);
                    progress(cursor.pos_a.min(len_a), len_a);
                }
                Ok(None) => {
                    info!("Oracle returned no matches, finishing");
                    break Termination::EmptyResponse;
                }
                Err(e) if e.is_transport_failure() => {
                    error!("Subtitle matching failed: {}", e);
                    break Termination::Aborted(e);
                }
                Err(e) => {
                    error!("Oracle answer rejected, window left untouched: {}", e);
                    break Termination::Aborted(e);
                }
            }
        };

        AlignmentOutcome {
            compaction: compact(result),
            rounds,
            termination,
            stats,
        }
    }

    /// One oracle round; `None` when the oracle reports no matches
    async fn round(
        &self,
        result: &mut [WorkingCue],
        reference: &[SubtitleEntry],
        source: &[SubtitleEntry],
        window_a: &Window,
        window_b: &Window,
    ) -> Result<Option<RoundReport>, ReconcileError> {
        let texts_a: Vec<&str> = reference[window_a.range()].iter().map(|e| e.text.as_str()).collect();
        let texts_b: Vec<&str> = source[window_b.range()].iter().map(|e| e.text.as_str()).collect();
        let prompt = AlignmentContract::render_prompt(&texts_a, &texts_b);

        let answer = self.oracle.complete(&prompt, &AlignmentContract::schema()).await?;
        let payload = AlignmentContract::parse(answer)?;
        if payload.corresponding_subtitles.is_empty() {
            return Ok(None);
        }

        let pairs = CorrespondencePair::from_payload(&payload, window_a, window_b)?;
        let map = CorrespondenceMap::from_pairs(&pairs);
        let stats = consolidate(result, source, window_a, window_b, &map);

        Ok(Some(RoundReport {
            max_a: map.max_a(),
            max_b: map.max_b(),
            stats,
        }))
    }
}
