/*!
 * Integration tests for the SRT to ASS file workflow
 */

use std::fs;
use anyhow::Result;

use dashmerge::date_utils::DateFormatter;
use dashmerge::subtitle_processor::{self, ASS_HEADER};
use crate::common;

fn dialogue_lines(document: &str) -> Vec<&str> {
    document.lines().filter(|line| line.starts_with("Dialogue:")).collect()
}

/// Test a full conversion of the dashcam fixture
#[test]
fn test_transform_file_withDashcamFixture_shouldWriteAss() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let source = common::test_resource_path("FILE0001.srt");
    let destination = temp_dir.path().join("FILE0001.ass");

    let summary = subtitle_processor::transform_file(&source, &destination, &DateFormatter::Fallback)?
        .expect("fixture exists");

    assert_eq!(summary.cue_count, 3);
    assert_eq!(summary.destination, destination);

    let written = fs::read_to_string(&destination)?;
    assert!(written.starts_with(ASS_HEADER));

    let lines = dialogue_lines(&written);
    assert_eq!(lines.len(), 3);
    assert_eq!(
        lines[0],
        "Dialogue: 0,00:00:00.000,00:00:01.000,Default,,0,0,0,,marți, 7 ianuarie 2020, 8:56:45"
    );
    assert_eq!(
        lines[2],
        "Dialogue: 0,00:00:02.000,00:00:03.000,Default,,0,0,0,,marți, 7 ianuarie 2020, 8:56:47 12KM/H\\NGPS lost"
    );

    Ok(())
}

/// Test a dashcam file written with a UTF-8 byte order mark
#[test]
fn test_transform_file_withByteOrderMark_shouldConvertEveryCue() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let dir = temp_dir.path().to_path_buf();
    let fixture = fs::read_to_string(common::test_resource_path("FILE0001.srt"))?;
    let source = common::create_test_file(&dir, "BOM0001.srt", &format!("\u{feff}{}", fixture))?;
    let destination = dir.join("BOM0001.ass");

    let summary = subtitle_processor::transform_file(&source, &destination, &DateFormatter::Fallback)?
        .expect("source exists");
    assert_eq!(summary.cue_count, 3);

    let written = fs::read_to_string(&destination)?;
    let lines = dialogue_lines(&written);
    assert_eq!(
        lines[0],
        "Dialogue: 0,00:00:00.000,00:00:01.000,Default,,0,0,0,,marți, 7 ianuarie 2020, 8:56:45"
    );

    Ok(())
}

/// Test that converting twice gives byte-identical output
#[test]
fn test_transform_file_twice_shouldBeDeterministic() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let source = common::test_resource_path("FILE0001.srt");
    let first = temp_dir.path().join("first.ass");
    let second = temp_dir.path().join("second.ass");
    let formatter = DateFormatter::default();

    subtitle_processor::transform_file(&source, &first, &formatter)?;
    subtitle_processor::transform_file(&source, &second, &formatter)?;

    assert_eq!(fs::read(&first)?, fs::read(&second)?);

    Ok(())
}

/// Test that dialogue count matches retained blocks
#[test]
fn test_transform_file_withPlainSubtitle_shouldEmitOneLinePerBlock() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let dir = temp_dir.path().to_path_buf();
    let source = common::create_test_subtitle(&dir, "plain.srt")?;
    let destination = dir.join("plain.ass");

    subtitle_processor::transform_file(&source, &destination, &DateFormatter::Fallback)?;

    let written = fs::read_to_string(&destination)?;
    let lines = dialogue_lines(&written);
    assert_eq!(lines.len(), 3);
    assert_eq!(
        lines[1],
        "Dialogue: 0,00:00:05.000,00:00:09.000,Default,,0,0,0,,It contains multiple entries."
    );

    Ok(())
}

/// Test that an empty source still produces a header-only document
#[test]
fn test_transform_file_withEmptySource_shouldWriteHeaderOnly() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let dir = temp_dir.path().to_path_buf();
    let source = common::create_test_file(&dir, "empty.srt", "\n\n  \n")?;
    let destination = dir.join("empty.ass");

    let summary = subtitle_processor::transform_file(&source, &destination, &DateFormatter::Fallback)?;

    assert_eq!(summary.map(|s| s.cue_count), Some(0));
    assert_eq!(fs::read_to_string(&destination)?, ASS_HEADER);

    Ok(())
}

/// Test that a missing source is a silent no-op
#[test]
fn test_transform_file_withMissingSource_shouldNotCreateDestination() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let source = temp_dir.path().join("missing.srt");
    let destination = temp_dir.path().join("missing.ass");

    let summary = subtitle_processor::transform_file(&source, &destination, &DateFormatter::Fallback)?;

    assert!(summary.is_none());
    assert!(!destination.exists());

    // A directory is not a regular file either
    let summary = subtitle_processor::transform_file(temp_dir.path(), &destination, &DateFormatter::Fallback)?;
    assert!(summary.is_none());
    assert!(!destination.exists());

    Ok(())
}

/// Test that an existing destination is fully replaced
#[test]
fn test_transform_file_withExistingDestination_shouldReplaceIt() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let dir = temp_dir.path().to_path_buf();
    let source = common::create_test_subtitle(&dir, "a.srt")?;
    let destination = common::create_test_file(&dir, "a.ass", "STALE CONTENT\n")?;

    subtitle_processor::transform_file(&source, &destination, &DateFormatter::Fallback)?;

    let written = fs::read_to_string(&destination)?;
    assert!(!written.contains("STALE CONTENT"));
    assert!(written.starts_with("[Script Info]"));

    Ok(())
}

/// Test that a malformed file fails without writing output
#[test]
fn test_transform_file_withMalformedCue_shouldFailWithoutOutput() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let dir = temp_dir.path().to_path_buf();
    let source = common::create_test_file(&dir, "bad.srt", "1\nno times here\ntext\n")?;
    let destination = dir.join("bad.ass");

    let result = subtitle_processor::transform_file(&source, &destination, &DateFormatter::Fallback);

    assert!(result.is_err());
    assert!(!destination.exists());

    Ok(())
}

/// Test that missing destination directories are created
#[test]
fn test_transform_file_withNestedDestination_shouldCreateParents() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let dir = temp_dir.path().to_path_buf();
    let source = common::create_test_subtitle(&dir, "a.srt")?;
    let destination = dir.join("x").join("y").join("a.ass");

    subtitle_processor::transform_file(&source, &destination, &DateFormatter::Fallback)?;

    assert!(destination.is_file());

    Ok(())
}
