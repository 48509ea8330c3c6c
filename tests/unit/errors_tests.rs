/*!
 * Tests for error types and conversions
 */

use std::path::PathBuf;
use dashmerge::errors::{AppError, MediaError, SubtitleError};

#[test]
fn test_subtitleError_malformedCue_shouldDisplayBlockAndLine() {
    let error = SubtitleError::MalformedCue {
        block: 3,
        line: "garbage".to_string(),
    };
    let display = format!("{}", error);
    assert!(display.contains("block 3"));
    assert!(display.contains("garbage"));
}

#[test]
fn test_subtitleError_destinationWrite_shouldKeepSource() {
    let error = SubtitleError::DestinationWrite {
        path: PathBuf::from("/ro/out.ass"),
        source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
    };
    let display = format!("{}", error);
    assert!(display.contains("out.ass"));
    assert!(display.contains("denied"));
    assert!(std::error::Error::source(&error).is_some());
}

#[test]
fn test_mediaError_timeout_shouldDisplayStageAndSeconds() {
    let error = MediaError::Timeout {
        stage: "Transcode".to_string(),
        secs: 30,
    };
    assert_eq!(format!("{}", error), "Transcode timed out after 30 seconds");
}

#[test]
fn test_mediaError_toolMissing_shouldNameTool() {
    let error = MediaError::ToolMissing("ffmpeg".to_string());
    assert!(format!("{}", error).contains("ffmpeg"));
}

#[test]
fn test_appError_fromSubtitleError_shouldWrapCorrectly() {
    let error: AppError = SubtitleError::SourceUnreadable(PathBuf::from("a.srt")).into();
    assert!(matches!(error, AppError::Subtitle(_)));
    assert!(format!("{}", error).contains("Subtitle error"));
}

#[test]
fn test_appError_fromMediaError_shouldWrapCorrectly() {
    let error: AppError = MediaError::ToolMissing("ffmpeg".to_string()).into();
    assert!(matches!(error, AppError::Media(_)));
}

#[test]
fn test_appError_fromIoError_shouldBecomeFileError() {
    let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
    let error: AppError = io.into();
    assert!(matches!(error, AppError::File(ref msg) if msg.contains("gone")));
}

#[test]
fn test_appError_fromAnyhow_shouldBecomeUnknown() {
    let error: AppError = anyhow::anyhow!("boom").into();
    assert!(matches!(error, AppError::Unknown(ref msg) if msg == "boom"));
}
