/*!
 * External media tool integration.
 *
 * Scaling, subtitle burn-in and concatenation are delegated to ffmpeg.
 * The [`MediaToolkit`] trait is the seam the controller talks to, so the
 * orchestration can be exercised without ffmpeg installed.
 */

use std::fmt::Debug;
use std::path::{Path, PathBuf};
use std::process::Output;
use std::time::Duration;

use async_trait::async_trait;
use log::{debug, error};
use tokio::process::Command;

use crate::errors::MediaError;

/// One clip to rescale, optionally with a subtitle track burned in
#[derive(Debug, Clone, PartialEq)]
pub struct TranscodeJob {
    /// Source clip
    pub input: PathBuf,

    /// ASS track to burn in, if the clip has one
    pub subtitle: Option<PathBuf>,

    /// Scale factor applied to both dimensions
    pub scale_ratio: f64,

    /// Where the transcoded clip goes
    pub output: PathBuf,
}

/// Operations the controller needs from a media tool
#[async_trait]
pub trait MediaToolkit: Send + Sync + Debug {
    /// Verify the tool can be executed
    async fn check_available(&self) -> Result<(), MediaError>;

    /// Rescale one clip, burning in its subtitle track when present
    async fn transcode(&self, job: &TranscodeJob) -> Result<(), MediaError>;

    /// Join clips in the given order into `output` without re-encoding
    async fn concat(&self, inputs: &[PathBuf], output: &Path) -> Result<(), MediaError>;
}

/// ffmpeg-backed toolkit
#[derive(Debug, Clone)]
pub struct Ffmpeg {
    // @field: Executable name or path
    program: String,

    // @field: Per-invocation timeout
    timeout: Duration,
}

impl Ffmpeg {
    /// Create a toolkit running `program` with the given timeout per invocation
    pub fn new(program: impl Into<String>, timeout_secs: u64) -> Self {
        Ffmpeg {
            program: program.into(),
            timeout: Duration::from_secs(timeout_secs),
        }
    }

    /// Build the `-vf` filter chain for a job
    pub fn filter_chain(job: &TranscodeJob) -> String {
        // Even dimensions keep yuv420p encoders happy
        let mut filters = format!(
            "scale=trunc(iw*{ratio}/2)*2:trunc(ih*{ratio}/2)*2",
            ratio = job.scale_ratio
        );

        if let Some(subtitle) = &job.subtitle {
            filters.push_str(",subtitles=");
            filters.push_str(&escape_filter_path(subtitle));
        }

        filters
    }

    /// Arguments for a transcode invocation
    pub fn transcode_args(job: &TranscodeJob) -> Vec<String> {
        vec![
            "-y".to_string(),
            "-hide_banner".to_string(),
            "-i".to_string(),
            job.input.to_string_lossy().into_owned(),
            "-vf".to_string(),
            Self::filter_chain(job),
            "-c:a".to_string(),
            "copy".to_string(),
            job.output.to_string_lossy().into_owned(),
        ]
    }

    /// Arguments for a concat invocation reading `list_file`
    pub fn concat_args(list_file: &Path, output: &Path) -> Vec<String> {
        vec![
            "-y".to_string(),
            "-hide_banner".to_string(),
            "-f".to_string(),
            "concat".to_string(),
            "-safe".to_string(),
            "0".to_string(),
            "-i".to_string(),
            list_file.to_string_lossy().into_owned(),
            "-c".to_string(),
            "copy".to_string(),
            output.to_string_lossy().into_owned(),
        ]
    }

    async fn run(&self, stage: &str, args: &[String]) -> Result<Output, MediaError> {
        debug!("{}: {} {}", stage, self.program, args.join(" "));

        let ffmpeg_future = Command::new(&self.program)
            .args(args)
            .kill_on_drop(true)
            .output();

        let output = tokio::select! {
            result = ffmpeg_future => {
                result.map_err(|e| match e.kind() {
                    std::io::ErrorKind::NotFound => MediaError::ToolMissing(self.program.clone()),
                    _ => MediaError::Spawn { tool: self.program.clone(), source: e },
                })?
            },
            _ = tokio::time::sleep(self.timeout) => {
                return Err(MediaError::Timeout {
                    stage: stage.to_string(),
                    secs: self.timeout.as_secs(),
                });
            }
        };

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let filtered = filter_ffmpeg_stderr(&stderr);
            error!("{} failed: {}", stage, filtered);
            return Err(MediaError::Failed {
                stage: stage.to_string(),
                stderr: filtered,
            });
        }

        Ok(output)
    }
}

impl Default for Ffmpeg {
    fn default() -> Self {
        Self::new("ffmpeg", 600)
    }
}

#[async_trait]
impl MediaToolkit for Ffmpeg {
    async fn check_available(&self) -> Result<(), MediaError> {
        self.run("ffmpeg version check", &["-version".to_string()]).await?;
        Ok(())
    }

    async fn transcode(&self, job: &TranscodeJob) -> Result<(), MediaError> {
        let args = Self::transcode_args(job);
        self.run("Transcode", &args).await?;
        Ok(())
    }

    async fn concat(&self, inputs: &[PathBuf], output: &Path) -> Result<(), MediaError> {
        let list_file = output.with_extension("concat.txt");
        tokio::fs::write(&list_file, concat_list(inputs)).await?;

        let args = Self::concat_args(&list_file, output);
        let result = self.run("Concat", &args).await;

        let _ = tokio::fs::remove_file(&list_file).await;
        result.map(|_| ())
    }
}

/// Render an ffmpeg concat demuxer list for `inputs`
pub fn concat_list(inputs: &[PathBuf]) -> String {
    inputs
        .iter()
        .map(|path| {
            let quoted = path.to_string_lossy().replace('\'', "'\\''");
            format!("file '{}'\n", quoted)
        })
        .collect()
}

/// Escape a path for use as a filter option value
///
/// The value is single-quoted for the filtergraph parser; backslashes,
/// colons and quotes inside it still need escaping for the option parser.
pub fn escape_filter_path(path: &Path) -> String {
    let raw = path.to_string_lossy();
    let mut escaped = String::with_capacity(raw.len() + 2);
    escaped.push('\'');
    for c in raw.chars() {
        match c {
            '\\' => escaped.push_str("\\\\"),
            ':' => escaped.push_str("\\:"),
            '\'' => escaped.push_str("'\\\\\\''"),
            _ => escaped.push(c),
        }
    }
    escaped.push('\'');
    escaped
}

/// Filter ffmpeg stderr to only show meaningful error lines, stripping the
/// version banner, build configuration, and stream metadata noise.
pub fn filter_ffmpeg_stderr(stderr: &str) -> String {
    let noise_prefixes = [
        "ffmpeg version",
        "built with",
        "configuration:",
        "lib",
        "Input #",
        "Metadata:",
        "Duration:",
        "Chapter",
        "Stream #",
        "Output #",
        "Stream mapping:",
        "Press [q]",
        "frame=",
        "size=",
    ];

    let meaningful: Vec<&str> = stderr
        .lines()
        .filter(|line| {
            let trimmed = line.trim();
            if trimmed.is_empty() {
                return false;
            }
            !noise_prefixes.iter().any(|p| trimmed.starts_with(p))
        })
        .collect();

    if meaningful.is_empty() {
        "unknown ffmpeg error (stderr was empty after filtering)".to_string()
    } else {
        meaningful.join("\n")
    }
}
