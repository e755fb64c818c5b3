/*!
 * Tests for subtitle processing functionality
 */

use anyhow::Result;
use encoding_rs::WINDOWS_1251;

use yasrai::errors::SubtitleError;
use yasrai::subtitle_processor::{SubtitleCollection, SubtitleEntry};
use crate::common;

#[test]
fn test_parseTimestamp_withValidAndInvalidInput_shouldConvert() {
    assert_eq!(SubtitleEntry::parse_timestamp("01:02:03,456").unwrap(), 3_723_456);
    assert_eq!(SubtitleEntry::parse_timestamp("00:00:00.001").unwrap(), 1);
    assert!(SubtitleEntry::parse_timestamp("00:61:00,000").is_err());
    assert!(SubtitleEntry::parse_timestamp("garbage").is_err());
    assert_eq!(SubtitleEntry::format_timestamp(3_723_456), "01:02:03,456");
}

#[test]
fn test_parseSrtString_shouldKeepFileOrderAndRenumber() {
    let content = "7\n00:00:05,000 --> 00:00:06,000\nSecond in time\n\n3\n00:00:01,000 --> 00:00:02,000\nFirst in time\n";

    let entries = SubtitleCollection::parse_srt_string(content).unwrap();

    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].seq_num, 1);
    assert_eq!(entries[0].text, "Second in time");
    assert_eq!(entries[1].seq_num, 2);
    assert_eq!(entries[1].start_time_ms, 1000);
}

#[test]
fn test_parseSrtString_withNoCues_shouldFail() {
    assert!(matches!(
        SubtitleCollection::parse_srt_string("just some text\n"),
        Err(SubtitleError::Parse(_))
    ));
}

#[test]
fn test_writeAndLoad_shouldPreserveMultilineText() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let entries = vec![
        SubtitleEntry::new(1, 1000, 2500, "Line one\nLine two"),
        SubtitleEntry::new(2, 3000, 4000, "<i>Styled</i>"),
    ];
    let path = common::write_srt(temp_dir.path(), "multi.srt", entries.clone())?;

    let loaded = SubtitleCollection::load(&path, "windows-1251")?;

    assert_eq!(loaded.entries, entries);
    assert_eq!(loaded.source_file, path);
    Ok(())
}

#[test]
fn test_load_withCp1251File_shouldFallBack() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let (bytes, _, _) = WINDOWS_1251.encode("1\n00:00:01,000 --> 00:00:02,000\nПривет, мир\n");
    let path = temp_dir.path().join("legacy.srt");
    std::fs::write(&path, &bytes)?;

    let loaded = SubtitleCollection::load(&path, "cp1251")?;

    assert_eq!(loaded.entries[0].text, "Привет, мир");
    Ok(())
}

#[test]
fn test_load_withUnknownFallback_shouldFailBeforeReading() {
    let result = SubtitleCollection::load("does-not-matter.srt", "klingon");
    assert!(matches!(result, Err(SubtitleError::UnknownEncoding(_))));
}

#[test]
fn test_saveWithEncoding_shouldWriteLegacyBytes() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = temp_dir.path().join("out.srt");
    let collection = SubtitleCollection::from_entries(
        path.clone(),
        vec![SubtitleEntry::new(1, 0, 1000, "Да")],
    );

    collection.save(&path, WINDOWS_1251)?;

    let bytes = std::fs::read(&path)?;
    assert!(std::str::from_utf8(&bytes).is_err());
    assert_eq!(SubtitleCollection::load(&path, "windows-1251")?.entries[0].text, "Да");
    Ok(())
}
