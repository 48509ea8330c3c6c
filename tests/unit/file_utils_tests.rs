/*!
 * Tests for file utility functions
 */

use std::path::Path;
use anyhow::Result;
use dashmerge::file_utils::{FileManager, FileType};
use crate::common;

fn extensions() -> Vec<String> {
    vec!["mp4".to_string(), "mov".to_string()]
}

/// Test that file_exists returns true for existing files
#[test]
fn test_file_exists_withExistingFile_shouldReturnTrue() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let test_file = common::create_test_file(&temp_dir.path().to_path_buf(), "test_file_exists.tmp", "test content")?;

    assert!(FileManager::file_exists(&test_file));
    assert!(!FileManager::file_exists(temp_dir.path()));

    Ok(())
}

/// Test that generate_output_path keeps the whole file name and appends the extension
#[test]
fn test_generate_output_path_withValidInputs_shouldCreateCorrectPath() {
    let output_path = FileManager::generate_output_path(
        Path::new("/tmp/input/FILE0001.MP4"),
        Path::new("/tmp/work"),
        "ass",
    );

    assert_eq!(output_path, Path::new("/tmp/work/FILE0001.MP4.ass"));

    let output_path = FileManager::generate_output_path(
        Path::new("clip.mov"),
        Path::new("/tmp/work"),
        ".mp4",
    );
    assert_eq!(output_path, Path::new("/tmp/work/clip.mov.mp4"));
}

/// Test that clips sharing a stem get distinct output paths
#[test]
fn test_generate_output_path_withSharedStem_shouldNotCollide() {
    let work = Path::new("/tmp/work");

    let from_mp4 = FileManager::generate_output_path(Path::new("/in/A.mp4"), work, "mp4");
    let from_mov = FileManager::generate_output_path(Path::new("/in/A.mov"), work, "mp4");

    assert_ne!(from_mp4, from_mov);
}

/// Test that clips are found in name order, ignoring other files and subfolders
#[test]
fn test_find_media_files_withMixedFolder_shouldReturnSortedClips() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let dir = temp_dir.path().to_path_buf();

    common::create_test_clip(&dir, "FILE0002.MP4")?;
    common::create_test_clip(&dir, "FILE0001.mp4")?;
    common::create_test_clip(&dir, "FILE0003.mov")?;
    common::create_test_subtitle(&dir, "FILE0001.srt")?;
    common::create_test_file(&dir, "notes.txt", "x")?;

    let nested = dir.join("output");
    FileManager::ensure_dir(&nested)?;
    common::create_test_clip(&nested, "merged.mp4")?;

    let clips = FileManager::find_media_files(&dir, &extensions())?;
    let names: Vec<String> = clips
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
        .collect();

    assert_eq!(names, vec!["FILE0001.mp4", "FILE0002.MP4", "FILE0003.mov"]);

    Ok(())
}

/// Test companion subtitle lookup
#[test]
fn test_companion_subtitle_withMatchingSrt_shouldFindIt() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let dir = temp_dir.path().to_path_buf();

    let with_sub = common::create_test_clip(&dir, "A.mp4")?;
    common::create_test_subtitle(&dir, "A.srt")?;
    let without_sub = common::create_test_clip(&dir, "B.mp4")?;

    assert_eq!(
        FileManager::companion_subtitle(&with_sub, "srt"),
        Some(dir.join("A.srt"))
    );
    assert_eq!(FileManager::companion_subtitle(&without_sub, "srt"), None);

    Ok(())
}

/// Test that ensure_dir and remove_dir manage directory trees
#[test]
fn test_ensure_dir_and_remove_dir_shouldCreateThenDelete() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let nested = temp_dir.path().join("a").join("b");

    FileManager::ensure_dir(&nested)?;
    assert!(FileManager::dir_exists(&nested));

    FileManager::remove_dir(temp_dir.path().join("a"))?;
    assert!(!FileManager::dir_exists(&nested));

    // Removing twice is fine
    FileManager::remove_dir(temp_dir.path().join("a"))?;

    Ok(())
}

/// Test file type detection by extension
#[test]
fn test_detect_file_type_withKnownExtensions_shouldClassify() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let dir = temp_dir.path().to_path_buf();

    let srt = common::create_test_subtitle(&dir, "x.SRT")?;
    let clip = common::create_test_clip(&dir, "x.mov")?;
    let other = common::create_test_file(&dir, "x.txt", "")?;

    assert_eq!(FileManager::detect_file_type(&srt, &extensions())?, FileType::Subtitle);
    assert_eq!(FileManager::detect_file_type(&clip, &extensions())?, FileType::Video);
    assert_eq!(FileManager::detect_file_type(&other, &extensions())?, FileType::Unknown);
    assert!(FileManager::detect_file_type(dir.join("missing.mp4"), &extensions()).is_err());

    Ok(())
}
