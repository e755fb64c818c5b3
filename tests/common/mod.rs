/*!
 * Common test utilities for the yasrai test suite
 */

use anyhow::Result;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use yasrai::app_config::Config;
use yasrai::app_controller::Controller;
use yasrai::providers::mock::MockProvider;
use yasrai::subtitle_processor::{SubtitleCollection, SubtitleEntry};

/// Route library logs to the test output, once per process
pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Creates a temporary directory for test files
pub fn create_temp_dir() -> Result<TempDir> {
    Ok(TempDir::new()?)
}

/// Creates a test file with the given content in the specified directory
pub fn create_test_file(dir: &Path, filename: &str, content: &str) -> Result<PathBuf> {
    let file_path = dir.join(filename);
    fs::write(&file_path, content)?;
    Ok(file_path)
}

/// `count` one-second cues with texts `<prefix>1..=<prefix>count`
pub fn numbered_entries(prefix: &str, count: usize) -> Vec<SubtitleEntry> {
    (0..count)
        .map(|i| {
            SubtitleEntry::new(
                i + 1,
                i as u64 * 1000,
                (i as u64 + 1) * 1000,
                format!("{}{}", prefix, i + 1),
            )
        })
        .collect()
}

/// Writes `entries` as a UTF-8 SRT file
pub fn write_srt(dir: &Path, filename: &str, entries: Vec<SubtitleEntry>) -> Result<PathBuf> {
    let path = dir.join(filename);
    SubtitleCollection::from_entries(path.clone(), entries).write_to_srt(&path)?;
    Ok(path)
}

/// Loads an SRT file written by the controller
pub fn read_srt(path: &Path) -> Result<Vec<SubtitleEntry>> {
    Ok(SubtitleCollection::load(path, "windows-1251")?.entries)
}

/// Controller with default configuration around a mock oracle
pub fn controller_with(config: Config, oracle: MockProvider) -> Controller {
    Controller::with_oracle(config, Box::new(oracle))
}
