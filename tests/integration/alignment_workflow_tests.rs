/*!
 * End-to-end alignment runs through the controller with a scripted oracle
 */

use anyhow::Result;
use serde_json::json;
use std::cell::RefCell;

use yasrai::app_config::Config;
use yasrai::errors::{ProviderError, ReconcileError};
use yasrai::providers::mock::{MockProvider, MockReply};
use yasrai::reconcile::{SubtitleAligner, Termination, WindowConfig, recompact};
use yasrai::subtitle_processor::SubtitleEntry;
use crate::common;

fn config_with_window(size: usize, overlap: usize) -> Config {
    let mut config = Config::default();
    config.alignment.window_size = size;
    config.alignment.overlap = overlap;
    config
}

fn pairs(values: &[[i64; 2]]) -> MockReply {
    MockReply::json(json!({ "corresponding_subtitles": values }))
}

/// Oracle failing on the third round keeps the first two rounds
#[tokio::test]
async fn test_runAlignment_withFailureOnThirdRound_shouldWritePartialResult() -> Result<()> {
    common::init_logger();
    let temp_dir = common::create_temp_dir()?;
    let reference = common::write_srt(temp_dir.path(), "reference.srt", common::numbered_entries("R", 10))?;
    let source = common::write_srt(temp_dir.path(), "source.srt", common::numbered_entries("S", 10))?;

    let oracle = MockProvider::with_responder(|call, _| match call {
        0 | 1 => pairs(&[[1, 1], [2, 2]]),
        _ => MockReply::connection_error("connection reset"),
    });
    let controller = common::controller_with(config_with_window(2, 0), oracle);

    let summary = controller.run_alignment(&reference, &source, None, false).await?;

    assert_eq!(summary.rounds, 2);
    assert!(matches!(
        summary.termination,
        Termination::Aborted(ReconcileError::Provider(ProviderError::ConnectionError(_)))
    ));
    assert_eq!(summary.output_path, temp_dir.path().join("source.autofixed.srt"));

    let written = common::read_srt(&summary.output_path)?;
    let texts: Vec<&str> = written.iter().map(|e| e.text.as_str()).collect();
    assert_eq!(texts, vec!["S1", "S2", "S3", "S4", "R5", "R6", "R7", "R8", "R9", "R10"]);
    assert_eq!(written[9].start_time_ms, 9000);
    Ok(())
}

/// N:M answer merges reference cues and drops the absorbed ones
#[tokio::test]
async fn test_runAlignment_withManyToManyAnswer_shouldMergeCues() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let reference = common::write_srt(temp_dir.path(), "reference.srt", vec![
        SubtitleEntry::new(1, 0, 1000, "R1"),
        SubtitleEntry::new(2, 1000, 2000, "R2"),
        SubtitleEntry::new(3, 2000, 3000, "R3"),
    ])?;
    let source = common::write_srt(temp_dir.path(), "source.srt", vec![
        SubtitleEntry::new(1, 0, 1500, "S1"),
        SubtitleEntry::new(2, 1500, 3000, "S2"),
    ])?;

    let oracle = MockProvider::with_responder(|call, _| match call {
        0 => pairs(&[[1, 1], [2, 1], [2, 2], [3, 2]]),
        _ => pairs(&[]),
    });
    let controller = common::controller_with(Config::default(), oracle);
    let output = temp_dir.path().join("merged.srt");

    let summary = controller.run_alignment(&reference, &source, Some(output.clone()), false).await?;

    assert!(matches!(summary.termination, Termination::EmptyResponse));
    assert_eq!(summary.rounds, 1);
    assert_eq!(summary.cues_written, 1);
    assert_eq!(summary.cues_removed, 2);

    let written = common::read_srt(&output)?;
    assert_eq!(written, vec![SubtitleEntry::new(1, 0, 2000, "S1")]);
    Ok(())
}

/// No matches in the first round leaves the reference untouched
#[tokio::test]
async fn test_runAlignment_withEmptyFirstAnswer_shouldCopyReference() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let entries = common::numbered_entries("R", 4);
    let reference = common::write_srt(temp_dir.path(), "reference.srt", entries.clone())?;
    let source = common::write_srt(temp_dir.path(), "source.srt", common::numbered_entries("S", 4))?;

    let oracle = MockProvider::scripted(vec![pairs(&[])]);
    let controller = common::controller_with(Config::default(), oracle);

    let summary = controller.run_alignment(&reference, &source, None, false).await?;

    assert!(matches!(summary.termination, Termination::EmptyResponse));
    assert_eq!(summary.rounds, 0);
    assert_eq!(common::read_srt(&summary.output_path)?, entries);
    Ok(())
}

/// Index outside the window aborts without touching the window
#[tokio::test]
async fn test_runAlignment_withOutOfWindowIndex_shouldAbortAsMalformed() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let entries = common::numbered_entries("R", 3);
    let reference = common::write_srt(temp_dir.path(), "reference.srt", entries.clone())?;
    let source = common::write_srt(temp_dir.path(), "source.srt", common::numbered_entries("S", 3))?;

    let oracle = MockProvider::scripted(vec![pairs(&[[1, 1], [2, 7]])]);
    let controller = common::controller_with(Config::default(), oracle);

    let summary = controller.run_alignment(&reference, &source, None, false).await?;

    let error = summary.termination.error().expect("run should be aborted");
    assert!(!error.is_transport_failure());
    assert!(matches!(error, ReconcileError::IndexOutOfWindow { side: "source", index: 7, .. }));
    assert_eq!(common::read_srt(&summary.output_path)?, entries);
    Ok(())
}

/// Written output is already compact: reloading and compacting changes nothing
#[tokio::test]
async fn test_runAlignment_outputReloaded_shouldBeStableUnderCompaction() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let reference = common::write_srt(temp_dir.path(), "reference.srt", common::numbered_entries("R", 6))?;
    let source = common::write_srt(temp_dir.path(), "source.srt", common::numbered_entries("S", 4))?;

    let oracle = MockProvider::scripted(vec![
        pairs(&[[1, 1], [2, 1], [3, 2], [4, 3], [5, 4], [6, 4]]),
        pairs(&[]),
    ]);
    let controller = common::controller_with(Config::default(), oracle);

    let summary = controller.run_alignment(&reference, &source, None, false).await?;
    let written = common::read_srt(&summary.output_path)?;
    let again = recompact(&written);

    assert_eq!(again.removed, 0);
    assert_eq!(again.entries, written);
    let numbers: Vec<usize> = written.iter().map(|e| e.seq_num).collect();
    assert_eq!(numbers, (1..=written.len()).collect::<Vec<_>>());
    Ok(())
}

#[tokio::test]
async fn test_runAlignment_withExistingOutput_shouldRefuseWithoutForce() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let reference = common::write_srt(temp_dir.path(), "reference.srt", common::numbered_entries("R", 2))?;
    let source = common::write_srt(temp_dir.path(), "source.srt", common::numbered_entries("S", 2))?;
    let existing = common::create_test_file(temp_dir.path(), "source.autofixed.srt", "keep me")?;

    let oracle = MockProvider::failing();
    let controller = common::controller_with(Config::default(), oracle);

    assert!(controller.run_alignment(&reference, &source, None, false).await.is_err());
    assert_eq!(std::fs::read_to_string(&existing)?, "keep me");

    let summary = controller.run_alignment(&reference, &source, None, true).await?;
    assert!(summary.termination.is_aborted());
    assert_eq!(common::read_srt(&existing)?.len(), 2);
    Ok(())
}

#[tokio::test]
async fn test_runAlignment_withMissingReference_shouldFail() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let source = common::write_srt(temp_dir.path(), "source.srt", common::numbered_entries("S", 2))?;
    let controller = common::controller_with(Config::default(), MockProvider::failing());

    let result = controller
        .run_alignment(&temp_dir.path().join("missing.srt"), &source, None, false)
        .await;

    assert!(result.is_err());
    Ok(())
}

/// Matches stuck at the window start still advance one cue per round
#[tokio::test]
async fn test_align_withFirstMatchOnly_shouldReportProgressEveryRound() {
    let reference = common::numbered_entries("R", 10);
    let source = common::numbered_entries("S", 10);
    let oracle = MockProvider::with_responder(|_, _| pairs(&[[1, 1]]));
    let aligner = SubtitleAligner::new(&oracle, WindowConfig::new(3, 0).unwrap());
    let positions = RefCell::new(Vec::new());

    let outcome = aligner
        .align(&reference, &source, |position, total| {
            assert_eq!(total, 10);
            positions.borrow_mut().push(position);
        })
        .await;

    assert!(matches!(outcome.termination, Termination::Completed));
    assert_eq!(outcome.rounds, 10);
    assert_eq!(positions.into_inner(), (1..=10).collect::<Vec<_>>());
    assert_eq!(oracle.call_count(), 10);
}
