use serde::{Deserialize, Serialize};
use std::default::Default;
use std::path::{Path, PathBuf};

use crate::date_utils::DEFAULT_DATE_LOCALE;
use crate::errors::AppError;

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Config {
    /// Directory receiving the merged file (defaults to `<input>/output`)
    #[serde(default)]
    pub output_dir: Option<PathBuf>,

    /// File name of the merged clip
    #[serde(default = "default_output_file_name")]
    pub output_file_name: String,

    /// Scale factor applied to every clip
    #[serde(default = "default_resize_ratio")]
    pub resize_ratio: f64,

    /// Extensions treated as dashcam clips (case-insensitive)
    #[serde(default = "default_video_extensions")]
    pub video_extensions: Vec<String>,

    /// Extension of the subtitle companion next to each clip
    #[serde(default = "default_subtitle_extension")]
    pub subtitle_extension: String,

    /// Locale used to render overlay dates
    #[serde(default = "default_date_locale")]
    pub date_locale: String,

    /// Keep the work directory with intermediate files
    #[serde(default)]
    pub keep_intermediates: bool,

    /// External tool settings
    #[serde(default)]
    pub media: MediaConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// External media tool configuration
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct MediaConfig {
    // @field: ffmpeg executable name or path
    #[serde(default = "default_ffmpeg_path")]
    pub ffmpeg_path: String,

    // @field: Timeout per ffmpeg invocation
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for MediaConfig {
    fn default() -> Self {
        Self {
            ffmpeg_path: default_ffmpeg_path(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    // @returns: Matching filter for the log crate
    pub fn to_level_filter(&self) -> log::LevelFilter {
        match self {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

fn default_output_file_name() -> String {
    "merged.mp4".to_string()
}

fn default_resize_ratio() -> f64 {
    0.5
}

fn default_video_extensions() -> Vec<String> {
    ["mp4", "mov", "avi", "mkv", "ts"]
        .iter()
        .map(|ext| ext.to_string())
        .collect()
}

fn default_subtitle_extension() -> String {
    "srt".to_string()
}

fn default_date_locale() -> String {
    DEFAULT_DATE_LOCALE.to_string()
}

fn default_ffmpeg_path() -> String {
    "ffmpeg".to_string()
}

fn default_timeout_secs() -> u64 {
    // Long clips at full resolution can take a while
    1800
}

impl Config {
    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<(), AppError> {
        if !self.resize_ratio.is_finite() || self.resize_ratio <= 0.0 || self.resize_ratio > 4.0 {
            return Err(AppError::Config(format!(
                "resize_ratio must be in (0, 4], got {}",
                self.resize_ratio
            )));
        }

        if self.output_file_name.trim().is_empty() {
            return Err(AppError::Config("output_file_name must not be empty".to_string()));
        }

        if self.video_extensions.iter().all(|ext| ext.trim().is_empty()) {
            return Err(AppError::Config("video_extensions must list at least one extension".to_string()));
        }

        if self.subtitle_extension.trim().is_empty() {
            return Err(AppError::Config("subtitle_extension must not be empty".to_string()));
        }

        if self.media.ffmpeg_path.trim().is_empty() {
            return Err(AppError::Config("media.ffmpeg_path must not be empty".to_string()));
        }

        if self.media.timeout_secs == 0 {
            return Err(AppError::Config("media.timeout_secs must be positive".to_string()));
        }

        Ok(())
    }

    /// Directory for the merged output of `input_dir`
    pub fn resolve_output_dir(&self, input_dir: &Path) -> PathBuf {
        self.output_dir
            .clone()
            .unwrap_or_else(|| input_dir.join("output"))
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            output_dir: None,
            output_file_name: default_output_file_name(),
            resize_ratio: default_resize_ratio(),
            video_extensions: default_video_extensions(),
            subtitle_extension: default_subtitle_extension(),
            date_locale: default_date_locale(),
            keep_intermediates: false,
            media: MediaConfig::default(),
            log_level: LogLevel::default(),
        }
    }
}
