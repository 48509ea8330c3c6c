use anyhow::{Result, Context, anyhow};
use log::{warn, info, debug};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use futures::future::join_all;
use indicatif::{ProgressBar, ProgressStyle};

use crate::app_config::Config;
use crate::date_utils::DateFormatter;
use crate::file_utils::FileManager;
use crate::media::{Ffmpeg, MediaToolkit, TranscodeJob};
use crate::subtitle_processor::{self, TransformSummary};

// @module: Application controller for dashcam folder merging

/// Name of the work directory created inside the output directory
pub const WORK_DIR_NAME: &str = ".dashmerge-work";

/// One clip of the current run with its intermediate files
#[derive(Debug, Clone, PartialEq)]
pub struct ClipPlan {
    /// Source clip
    pub video: PathBuf,

    /// Converted ASS track, when the clip had a subtitle companion
    pub subtitle: Option<PathBuf>,

    /// Transcoded clip in the work directory
    pub transcoded: PathBuf,
}

/// Main application controller
#[derive(Debug)]
pub struct Controller {
    // @field: App configuration
    config: Config,

    // @field: Media tool used for transcode and concat
    toolkit: Arc<dyn MediaToolkit>,

    // @field: Overlay date renderer, chosen once
    formatter: DateFormatter,
}

impl Controller {
    // @method: Create a new controller driving ffmpeg
    pub fn with_config(config: Config) -> Result<Self> {
        let toolkit = Arc::new(Ffmpeg::new(
            config.media.ffmpeg_path.clone(),
            config.media.timeout_secs,
        ));
        Self::with_toolkit(config, toolkit)
    }

    // @method: Create a new controller with a custom media toolkit
    pub fn with_toolkit(config: Config, toolkit: Arc<dyn MediaToolkit>) -> Result<Self> {
        config.validate().context("Configuration validation failed")?;
        let formatter = DateFormatter::detect(&config.date_locale);

        Ok(Self {
            config,
            toolkit,
            formatter,
        })
    }

    /// Active configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Overlay date renderer in use
    pub fn formatter(&self) -> DateFormatter {
        self.formatter
    }

    /// Convert a single SRT file to ASS
    ///
    /// Returns `Ok(None)` when the source does not exist.
    pub fn convert_subtitle(&self, source: &Path, destination: &Path) -> Result<Option<TransformSummary>> {
        subtitle_processor::transform_file(source, destination, &self.formatter)
            .with_context(|| format!("Failed to convert subtitle {:?}", source))
    }

    /// Merge every clip in `input_dir` into one file
    ///
    /// Returns the merged file path, or `None` when nothing was produced
    /// (no clips, or the output exists and `force_overwrite` is off).
    pub async fn run_folder(&self, input_dir: PathBuf, force_overwrite: bool) -> Result<Option<PathBuf>> {
        let start_time = std::time::Instant::now();

        if !FileManager::dir_exists(&input_dir) {
            return Err(anyhow!("Input directory does not exist: {:?}", input_dir));
        }

        let output_dir = self.config.resolve_output_dir(&input_dir);
        FileManager::ensure_dir(&output_dir)?;

        let final_output = output_dir.join(&self.config.output_file_name);
        if final_output.exists() && !force_overwrite {
            warn!("Skipping, output already exists: {:?} (use -f to force overwrite)", final_output);
            return Ok(None);
        }

        let clips = FileManager::find_media_files(&input_dir, &self.config.video_extensions)?;
        if clips.is_empty() {
            warn!("No clips found in {:?}", input_dir);
            return Ok(None);
        }
        info!("Found {} clip(s) in {:?}", clips.len(), input_dir);

        self.toolkit
            .check_available()
            .await
            .context("ffmpeg is required to merge clips")?;

        let work_dir = output_dir.join(WORK_DIR_NAME);
        FileManager::ensure_dir(&work_dir)?;
        // Concat lists resolve relative entries against the list's directory
        let work_dir = work_dir.canonicalize().unwrap_or(work_dir);

        let result = self.merge_clips(&clips, &work_dir, &final_output).await;

        if self.config.keep_intermediates {
            info!("Keeping intermediate files in {:?}", work_dir);
        } else if let Err(e) = FileManager::remove_dir(&work_dir) {
            warn!("Failed to clean up work directory: {}", e);
        }

        result?;

        info!(
            "Merged {} clip(s) into {:?} in {:.1}s",
            clips.len(),
            final_output,
            start_time.elapsed().as_secs_f64()
        );
        Ok(Some(final_output))
    }

    async fn merge_clips(&self, clips: &[PathBuf], work_dir: &Path, final_output: &Path) -> Result<()> {
        let plans = self.prepare_subtitles(clips, work_dir).await?;

        let progress_bar = ProgressBar::new(plans.len() as u64);
        let template_result = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} clips ({percent}%) {msg} {eta}")
            .or_else(|_| ProgressStyle::default_bar().template("{spinner} [{elapsed_precise}] [{bar:40}] {pos}/{len} ({percent}%) {msg}"))
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        progress_bar.set_style(template_result.progress_chars("█▓▒░"));

        for plan in &plans {
            let name = plan.video.file_name().unwrap_or_default().to_string_lossy().to_string();
            progress_bar.set_message(name.clone());

            let job = TranscodeJob {
                input: plan.video.clone(),
                subtitle: plan.subtitle.clone(),
                scale_ratio: self.config.resize_ratio,
                output: plan.transcoded.clone(),
            };

            if let Err(e) = self.toolkit.transcode(&job).await {
                progress_bar.abandon_with_message(format!("failed on {}", name));
                return Err(e).with_context(|| format!("Failed to transcode {:?}", plan.video));
            }

            progress_bar.inc(1);
        }
        progress_bar.finish_with_message("transcoded");

        let transcoded: Vec<PathBuf> = plans.into_iter().map(|plan| plan.transcoded).collect();
        self.toolkit
            .concat(&transcoded, final_output)
            .await
            .with_context(|| format!("Failed to concatenate clips into {:?}", final_output))?;

        Ok(())
    }

    /// Convert each clip's subtitle companion, one blocking worker per file
    pub async fn prepare_subtitles(&self, clips: &[PathBuf], work_dir: &Path) -> Result<Vec<ClipPlan>> {
        let tasks = clips.iter().map(|video| {
            let video = video.clone();
            let companion = FileManager::companion_subtitle(&video, &self.config.subtitle_extension);
            let destination = FileManager::generate_output_path(&video, work_dir, "ass");
            let transcoded = FileManager::generate_output_path(&video, work_dir, "mp4");
            let formatter = self.formatter;

            tokio::task::spawn_blocking(move || -> Result<ClipPlan> {
                let subtitle = match companion {
                    Some(source) => subtitle_processor::transform_file(&source, &destination, &formatter)
                        .with_context(|| format!("Failed to convert subtitle {:?}", source))?
                        .map(|summary| {
                            debug!("{:?}: {} cue(s)", summary.destination, summary.cue_count);
                            summary.destination
                        }),
                    None => {
                        debug!("No subtitle companion for {:?}", video);
                        None
                    }
                };

                Ok(ClipPlan {
                    video,
                    subtitle,
                    transcoded,
                })
            })
        });

        join_all(tasks)
            .await
            .into_iter()
            .map(|joined| joined.map_err(|e| anyhow!("Subtitle worker panicked: {}", e))?)
            .collect()
    }
}
