use anyhow::{Result, Context};
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

// @module: File and directory utilities

// @struct: File operations utility
pub struct FileManager;

impl FileManager {
    // @checks: File existence
    pub fn file_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().exists() && path.as_ref().is_file()
    }

    // @checks: Directory existence
    pub fn dir_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().exists() && path.as_ref().is_dir()
    }

    // @creates: Directory and parents if needed
    pub fn ensure_dir<P: AsRef<Path>>(path: P) -> Result<()> {
        let path = path.as_ref();
        if !path.exists() {
            fs::create_dir_all(path)
                .with_context(|| format!("Failed to create directory: {:?}", path))?;
        }
        Ok(())
    }

    // @generates: Output path named after the whole input file name
    // @params: input_file, output_dir, extension
    // Clips sharing a stem (A.mp4, A.mov) keep distinct outputs
    pub fn generate_output_path<P1: AsRef<Path>, P2: AsRef<Path>>(
        input_file: P1,
        output_dir: P2,
        extension: &str,
    ) -> PathBuf {
        let file_name = input_file.as_ref().file_name().unwrap_or_default();

        let mut output_filename = file_name.to_string_lossy().to_string();
        output_filename.push('.');
        output_filename.push_str(extension.trim_start_matches('.'));

        output_dir.as_ref().join(output_filename)
    }

    /// Find clips directly inside `dir` whose extension is in `extensions`
    ///
    /// Subdirectories are not descended into, so a previous run's output
    /// folder is never picked up. Results are sorted by file name, which for
    /// dashcams is recording order.
    pub fn find_media_files<P: AsRef<Path>>(dir: P, extensions: &[String]) -> Result<Vec<PathBuf>> {
        let mut result = Vec::new();

        for entry in WalkDir::new(dir.as_ref()).min_depth(1).max_depth(1).follow_links(true) {
            let entry = entry.context("Failed to read directory entry")?;
            let path = entry.path();

            if path.is_file() && Self::has_extension(path, extensions) {
                result.push(path.to_path_buf());
            }
        }

        result.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
        Ok(result)
    }

    /// Locate the subtitle companion of a clip (same stem, any case of `extension`)
    pub fn companion_subtitle<P: AsRef<Path>>(video: P, extension: &str) -> Option<PathBuf> {
        let video = video.as_ref();
        let extension = extension.trim_start_matches('.');

        [extension.to_lowercase(), extension.to_uppercase()]
            .iter()
            .map(|ext| video.with_extension(ext))
            .find(|candidate| Self::file_exists(candidate))
    }

    /// Remove a directory tree if it exists
    pub fn remove_dir<P: AsRef<Path>>(path: P) -> Result<()> {
        let path = path.as_ref();
        if path.exists() {
            fs::remove_dir_all(path)
                .with_context(|| format!("Failed to remove directory: {:?}", path))?;
        }
        Ok(())
    }

    /// Detect if a file is a subtitle file (SRT) or a dashcam clip
    pub fn detect_file_type<P: AsRef<Path>>(path: P, video_extensions: &[String]) -> Result<FileType> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(anyhow::anyhow!("File does not exist: {:?}", path));
        }

        if Self::has_extension(path, &["srt".to_string()]) {
            return Ok(FileType::Subtitle);
        }

        if Self::has_extension(path, video_extensions) {
            return Ok(FileType::Video);
        }

        Ok(FileType::Unknown)
    }

    fn has_extension(path: &Path, extensions: &[String]) -> bool {
        path.extension()
            .map(|ext| ext.to_string_lossy())
            .is_some_and(|ext| {
                extensions
                    .iter()
                    .any(|wanted| wanted.trim_start_matches('.').eq_ignore_ascii_case(&ext))
            })
    }
}

/// Enum representing different file types
#[derive(Debug, PartialEq, Eq)]
pub enum FileType {
    /// Subtitle file (SRT)
    Subtitle,
    /// Dashcam clip
    Video,
    /// Unknown file type
    Unknown,
}
