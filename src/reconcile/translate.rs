/*!
 * Translation loop.
 *
 * Shows the oracle one window of cue texts per round and writes the returned
 * strings back position by position. Cue count and timings never change.
 */

use log::{error, info};

use crate::errors::ReconcileError;
use crate::subtitle_processor::SubtitleEntry;

use super::compact::compact;
use super::oracle::Oracle;
use super::outcome::{Termination, TranslationOutcome};
use super::prompts::{OracleContract, TranslationContract};
use super::rewrite::apply_translations;
use super::window::{TranslationCursor, Window, WindowConfig};
use super::working::{WorkingCue, working_copy};

/// Translates a sequence window by window
pub struct SubtitleTranslator<'a> {
    oracle: &'a dyn Oracle,
    config: WindowConfig,
    // @field: Free-form description of the content, e.g. "series Castle, season 1"
    content_description: String,
    // @field: Language name rendered into the prompt
    target_language: String,
}

impl<'a> SubtitleTranslator<'a> {
    pub fn new(
        oracle: &'a dyn Oracle,
        config: WindowConfig,
        content_description: impl Into<String>,
        target_language: impl Into<String>,
    ) -> Self {
        Self {
            oracle,
            config,
            content_description: content_description.into(),
            target_language: target_language.into(),
        }
    }

    /// Run the translation loop to termination
    ///
    /// `progress` receives the cursor and the sequence length after every
    /// applied round.
    pub async fn translate<F>(&self, entries: &[SubtitleEntry], progress: F) -> TranslationOutcome
    where
        F: Fn(usize, usize),
    {
        let total = entries.len();
        let mut result = working_copy(entries);
        let mut cursor = TranslationCursor::default();
        let mut rounds = 0;
        let mut translated = 0;

        let termination = loop {
            if !cursor.is_active(total) {
                break Termination::Completed;
            }

            let window = cursor.window(&self.config, total);
            info!("Translating range {}..{} of {}", window.start, window.end, total);

            match self.round(&mut result, entries, &window).await {
                Ok(0) => {
                    info!("Oracle returned no translations, finishing");
                    break Termination::EmptyResponse;
                }
                Ok(returned) => {
                    rounds += 1;
                    translated += returned;
                    cursor = cursor.advance(returned, self.config.overlap);
                    progress(cursor.pos.min(total), total);
                }
                Err(e) if e.is_transport_failure() => {
                    error!("Translating subtitles failed: {}", e);
                    break Termination::Aborted(e);
                }
                Err(e) => {
                    error!("Oracle answer rejected, window left untouched: {}", e);
                    break Termination::Aborted(e);
                }
            }
        };

        TranslationOutcome {
            compaction: compact(result),
            rounds,
            termination,
            translated,
        }
    }

    async fn round(
        &self,
        result: &mut [WorkingCue],
        entries: &[SubtitleEntry],
        window: &Window,
    ) -> Result<usize, ReconcileError> {
        let texts: Vec<&str> = entries[window.range()].iter().map(|e| e.text.as_str()).collect();
        let prompt = TranslationContract::render_prompt(&self.content_description, &self.target_language, &texts);

        let answer = self.oracle.complete(&prompt, &TranslationContract::schema()).await?;
        let payload = TranslationContract::parse(answer)?;
        apply_translations(result, window, payload.translated_subtitles)
    }
}
