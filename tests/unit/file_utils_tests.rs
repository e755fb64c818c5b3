/*!
 * Tests for file utility functions
 */

use anyhow::Result;
use std::path::PathBuf;

use yasrai::file_utils::FileManager;
use crate::common;

#[test]
fn test_alignmentOutputPath_shouldInsertSuffixBeforeExtension() {
    let output = FileManager::alignment_output_path("/movies/Castle.S01E01.ru.srt", "autofixed");
    assert_eq!(output, PathBuf::from("/movies/Castle.S01E01.ru.autofixed.srt"));

    let relative = FileManager::alignment_output_path("bad.srt", "fixed");
    assert_eq!(relative, PathBuf::from("bad.fixed.srt"));
}

#[test]
fn test_prepareOutput_withExistingFile_shouldRequireForce() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let existing = common::create_test_file(temp_dir.path(), "out.srt", "x")?;

    assert!(FileManager::prepare_output(&existing, false).is_err());
    assert!(FileManager::prepare_output(&existing, true).is_ok());
    Ok(())
}

#[test]
fn test_prepareOutput_withMissingParent_shouldCreateIt() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let nested = temp_dir.path().join("a").join("b").join("out.srt");

    FileManager::prepare_output(&nested, false)?;

    assert!(temp_dir.path().join("a").join("b").is_dir());
    assert!(!FileManager::file_exists(&nested));
    Ok(())
}

#[test]
fn test_requireInput_withDirectoryOrMissingFile_shouldFail() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    assert!(FileManager::require_input(temp_dir.path()).is_err());
    assert!(FileManager::require_input(temp_dir.path().join("nope.srt")).is_err());

    let file = common::create_test_file(temp_dir.path(), "in.srt", "x")?;
    assert!(FileManager::require_input(&file).is_ok());
    Ok(())
}
