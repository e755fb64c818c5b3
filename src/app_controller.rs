use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use log::{info, warn};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use crate::app_config::Config;
use crate::file_utils::FileManager;
use crate::language_utils;
use crate::reconcile::{Oracle, OracleService, SubtitleAligner, SubtitleTranslator, Termination};
use crate::subtitle_processor::{SubtitleCollection, SubtitleEntry};

// @module: Application controller for subtitle reconciliation

/// Result of one run, reported after the output has been written
#[derive(Debug)]
pub struct RunSummary {
    // @field: Written subtitle file
    pub output_path: PathBuf,
    // @field: Oracle rounds applied
    pub rounds: usize,
    // @field: Why the loop stopped
    pub termination: Termination,
    // @field: Cues written
    pub cues_written: usize,
    // @field: Tombstoned cues dropped by compaction
    pub cues_removed: usize,
    // @field: Wall time of the run
    pub elapsed: Duration,
}

/// Main application controller
pub struct Controller {
    // @field: App configuration
    config: Config,
    // @field: Oracle used for every window
    oracle: Box<dyn Oracle>,
}

impl Controller {
    // @method: Create a new controller with the given configuration
    pub fn with_config(config: Config) -> Result<Self> {
        config.validate()?;
        let oracle = OracleService::new(&config.oracle)?;
        info!("Oracle: {} - {}", oracle.provider().display_name(), oracle.model());

        Ok(Self {
            config,
            oracle: Box::new(oracle),
        })
    }

    /// Create a controller around an already built oracle
    pub fn with_oracle(config: Config, oracle: Box<dyn Oracle>) -> Self {
        Self { config, oracle }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Re-time `source` onto the cue timings of `reference`
    ///
    /// The output defaults to `<source stem>.<suffix>.srt` next to the source.
    /// An oracle failure ends the loop early but the partial result is still
    /// written and the run succeeds.
    pub async fn run_alignment(
        &self,
        reference_file: &Path,
        source_file: &Path,
        output_file: Option<PathBuf>,
        force_overwrite: bool,
    ) -> Result<RunSummary> {
        let start_time = Instant::now();
        let window = self.config.alignment.window()?;
        let output_path = output_file.unwrap_or_else(|| {
            FileManager::alignment_output_path(source_file, &self.config.alignment.output_suffix)
        });

        FileManager::require_input(reference_file)?;
        FileManager::require_input(source_file)?;
        FileManager::prepare_output(&output_path, force_overwrite)?;

        let reference = self.load(reference_file)?;
        let source = self.load(source_file)?;
        info!(
            "Aligning {} source cues onto {} reference cues",
            source.entries.len(),
            reference.entries.len()
        );

        let progress_bar = Self::progress_bar(reference.entries.len(), "Aligning");
        let pb = progress_bar.clone();
        let aligner = SubtitleAligner::new(self.oracle.as_ref(), window);
        let outcome = aligner
            .align(&reference.entries, &source.entries, move |position, _total| {
                pb.set_position(position as u64);
            })
            .await;
        progress_bar.finish_and_clear();

        info!(
            "Consolidation: {} texts replaced, {} spans extended, {} cues merged away",
            outcome.stats.texts_replaced, outcome.stats.spans_extended, outcome.stats.tombstoned
        );

        self.finish(
            outcome.compaction.entries,
            output_path,
            outcome.rounds,
            outcome.termination,
            outcome.compaction.removed,
            start_time,
        )
    }

    /// Translate `input_file` window by window into `output_file`
    pub async fn run_translation(
        &self,
        content_description: &str,
        target_language: &str,
        input_file: &Path,
        output_file: &Path,
        force_overwrite: bool,
    ) -> Result<RunSummary> {
        let start_time = Instant::now();
        let window = self.config.translation.window()?;
        let language_name = language_utils::resolve_language_name(target_language)?;

        FileManager::require_input(input_file)?;
        FileManager::prepare_output(output_file, force_overwrite)?;

        let subtitles = self.load(input_file)?;
        info!("Translating {} cues to {}", subtitles.entries.len(), language_name);

        let progress_bar = Self::progress_bar(subtitles.entries.len(), "Translating");
        let pb = progress_bar.clone();
        let translator = SubtitleTranslator::new(
            self.oracle.as_ref(),
            window,
            content_description,
            language_name,
        );
        let outcome = translator
            .translate(&subtitles.entries, move |position, _total| {
                pb.set_position(position as u64);
            })
            .await;
        progress_bar.finish_and_clear();

        info!("{} strings translated", outcome.translated);

        self.finish(
            outcome.compaction.entries,
            output_file.to_path_buf(),
            outcome.rounds,
            outcome.termination,
            outcome.compaction.removed,
            start_time,
        )
    }

    fn load(&self, path: &Path) -> Result<SubtitleCollection> {
        SubtitleCollection::load(path, &self.config.subtitles.fallback_encoding)
            .with_context(|| format!("Failed to load subtitles from {:?}", path))
    }

    /// Persist the compacted sequence and report the run
    fn finish(
        &self,
        entries: Vec<SubtitleEntry>,
        output_path: PathBuf,
        rounds: usize,
        termination: Termination,
        cues_removed: usize,
        start_time: Instant,
    ) -> Result<RunSummary> {
        let cues_written = entries.len();
        let collection = SubtitleCollection::from_entries(output_path.clone(), entries);
        collection
            .write_to_srt(&output_path)
            .with_context(|| format!("Failed to write subtitles to {:?}", output_path))?;
        info!("Wrote \"{}\"", output_path.display());

        if termination.is_aborted() {
            warn!("Run stopped early ({}), partial results were saved", termination);
        }

        let elapsed = start_time.elapsed();
        info!(
            "{} rounds, {} cues written, {} removed, {} in {}",
            rounds,
            cues_written,
            cues_removed,
            termination,
            Self::format_duration(elapsed)
        );

        Ok(RunSummary {
            output_path,
            rounds,
            termination,
            cues_written,
            cues_removed,
            elapsed,
        })
    }

    fn progress_bar(total: usize, message: &'static str) -> ProgressBar {
        let progress_bar = ProgressBar::new(total as u64);
        let template_result = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} cues ({percent}%) {msg}")
            .or_else(|_| ProgressStyle::default_bar().template("{spinner} [{elapsed_precise}] [{bar:40}] {pos}/{len} ({percent}%) {msg}"))
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        progress_bar.set_style(template_result.progress_chars("█▓▒░"));
        progress_bar.set_message(message);
        progress_bar
    }

    // Format duration in a human-readable format (HH:MM:SS)
    fn format_duration(duration: Duration) -> String {
        let total_seconds = duration.as_secs();
        let hours = total_seconds / 3600;
        let minutes = (total_seconds % 3600) / 60;
        let seconds = total_seconds % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}.{:03}s", seconds, duration.subsec_millis())
        }
    }
}
