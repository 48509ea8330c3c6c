// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Result, anyhow, Context};
use log::{warn, info, LevelFilter, Log, Metadata, Record, Level, SetLoggerError};
use std::path::{Path, PathBuf};
use std::io::Write;
use std::fs::File;
use std::io::BufReader;
use clap::{Args, Parser, ValueEnum, CommandFactory, Subcommand};
use clap_complete::{generate, Shell};

use dashmerge::app_config::{self, Config};
use dashmerge::app_controller::Controller;
use dashmerge::file_utils::{FileManager, FileType};

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for app_config::LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => app_config::LogLevel::Error,
            CliLogLevel::Warn => app_config::LogLevel::Warn,
            CliLogLevel::Info => app_config::LogLevel::Info,
            CliLogLevel::Debug => app_config::LogLevel::Debug,
            CliLogLevel::Trace => app_config::LogLevel::Trace,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Convert subtitles, transcode and merge every clip of a folder (default command)
    Merge(MergeArgs),

    /// Convert a single SRT file to ASS without touching any video
    Convert {
        /// SRT file to convert
        #[arg(value_name = "SOURCE")]
        source: PathBuf,

        /// Destination ASS file (defaults to SOURCE with an .ass extension)
        #[arg(value_name = "DESTINATION")]
        destination: Option<PathBuf>,

        #[command(flatten)]
        options: CommonOptions,
    },

    /// Generate shell completions for dashmerge
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Parser, Debug)]
struct MergeArgs {
    /// Folder holding the dashcam clips and their SRT files
    #[arg(value_name = "INPUT_DIR")]
    input_dir: PathBuf,

    #[command(flatten)]
    merge: MergeOptions,
}

#[derive(Args, Debug, Clone)]
struct MergeOptions {
    /// Force overwrite of an existing merged file
    #[arg(short, long)]
    force_overwrite: bool,

    /// Directory for the merged file (defaults to INPUT_DIR/output)
    #[arg(short = 'd', long)]
    output_dir: Option<PathBuf>,

    /// File name of the merged clip
    #[arg(short, long)]
    output_file: Option<String>,

    /// Scale factor applied to every clip (e.g. 0.5 halves width and height)
    #[arg(short, long)]
    resize_ratio: Option<f64>,

    /// Keep converted subtitles and transcoded clips
    #[arg(short, long)]
    keep_intermediates: bool,

    #[command(flatten)]
    common: CommonOptions,
}

#[derive(Args, Debug, Clone)]
struct CommonOptions {
    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,
}

/// dashmerge - merge a folder of dashcam clips into one video
///
/// Converts each clip's SRT overlay track to a styled ASS track, burns it
/// into a downscaled copy of the clip with ffmpeg and joins all clips.
#[derive(Parser, Debug)]
#[command(name = "dashmerge")]
#[command(version)]
#[command(about = "Dashcam clip merger with subtitle burn-in")]
#[command(args_conflicts_with_subcommands = true)]
#[command(long_about = "dashmerge converts dashcam SRT overlays to ASS, burns them into downscaled clips and concatenates the clips.

EXAMPLES:
    dashmerge /media/dashcam/2020-01-07          # Merge every clip of a folder
    dashmerge -r 0.75 -o trip.mp4 ./clips        # Custom scale and output name
    dashmerge -f -k ./clips                      # Overwrite output, keep intermediates
    dashmerge convert FILE0001.srt               # Convert one SRT file to ASS
    dashmerge completions bash > dashmerge.bash  # Generate bash completions

CONFIGURATION:
    Configuration is stored in conf.json by default. You can specify a different
    config file with --config-path. If the config file doesn't exist, a default one
    will be created automatically.

REQUIREMENTS:
    ffmpeg with libass (subtitles filter) must be on PATH, or set media.ffmpeg_path.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Folder holding the dashcam clips and their SRT files
    #[arg(value_name = "INPUT_DIR")]
    input_dir: Option<PathBuf>,

    #[command(flatten)]
    merge: MergeOptions,
}

// @struct: Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    // @creates: New logger with specified level
    fn new(level: LevelFilter) -> Self {
        CustomLogger { level }
    }

    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        let logger = Box::new(CustomLogger::new(level));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: Emoji for log level
    fn get_emoji_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "❌ ",
            Level::Warn => "🚧 ",
            Level::Info => " ",
            Level::Debug => "🔍 ",
            Level::Trace => "📋 ",
        }
    }

    // @returns: ANSI color for log level
    fn get_color_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "\x1B[1;31m",
            Level::Warn => "\x1B[1;33m",
            Level::Info => "\x1B[1;32m",
            Level::Debug => "\x1B[1;36m",
            Level::Trace => "\x1B[1;35m",
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let level = record.level();

            let mut stderr = std::io::stderr();
            let _ = writeln!(
                stderr,
                "{}{} {} {}\x1B[0m",
                Self::get_color_for_level(level),
                now,
                Self::get_emoji_for_level(level),
                record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // The logger accepts everything; the effective level is set through max_level
    CustomLogger::init(LevelFilter::Trace)?;
    log::set_max_level(LevelFilter::Info);

    let cli = CommandLineOptions::parse();

    match cli.command {
        Some(Commands::Completions { shell }) => {
            let mut cmd = CommandLineOptions::command();
            generate(shell, &mut cmd, "dashmerge", &mut std::io::stdout());
            Ok(())
        }
        Some(Commands::Convert { source, destination, options }) => {
            run_convert(source, destination, options)
        }
        Some(Commands::Merge(args)) => run_merge(args).await,
        None => {
            let input_dir = cli.input_dir.ok_or_else(|| {
                anyhow!("INPUT_DIR is required when no subcommand is specified")
            })?;

            // A lone SRT file is converted rather than merged
            if input_dir.is_file() {
                let config = load_config(&cli.merge.common)?;
                if FileManager::detect_file_type(&input_dir, &config.video_extensions)? == FileType::Subtitle {
                    return run_convert(input_dir, None, cli.merge.common);
                }
                return Err(anyhow!("INPUT_DIR must be a folder of clips: {:?}", input_dir));
            }

            run_merge(MergeArgs { input_dir, merge: cli.merge }).await
        }
    }
}

async fn run_merge(args: MergeArgs) -> Result<()> {
    let options = args.merge;
    let mut config = load_config(&options.common)?;

    // Override config with CLI options if provided
    if let Some(output_dir) = options.output_dir {
        config.output_dir = Some(output_dir);
    }
    if let Some(output_file) = options.output_file {
        config.output_file_name = output_file;
    }
    if let Some(ratio) = options.resize_ratio {
        config.resize_ratio = ratio;
    }
    if options.keep_intermediates {
        config.keep_intermediates = true;
    }

    let controller = Controller::with_config(config)?;

    match controller.run_folder(args.input_dir, options.force_overwrite).await? {
        Some(output) => info!("Success: {:?}", output),
        None => warn!("Nothing was produced"),
    }

    Ok(())
}

fn run_convert(source: PathBuf, destination: Option<PathBuf>, options: CommonOptions) -> Result<()> {
    let config = load_config(&options)?;
    let controller = Controller::with_config(config)?;

    let destination = destination.unwrap_or_else(|| source.with_extension("ass"));

    match controller.convert_subtitle(&source, &destination)? {
        Some(summary) => info!("Success: {:?} ({} cues)", summary.destination, summary.cue_count),
        None => warn!("Subtitle file not found, nothing to convert: {:?}", source),
    }

    Ok(())
}

/// Load or create the configuration, applying the CLI log level
fn load_config(options: &CommonOptions) -> Result<Config> {
    let config_path = &options.config_path;

    let mut config = if Path::new(config_path).exists() {
        let file = File::open(config_path)
            .context(format!("Failed to open config file: {}", config_path))?;

        let reader = BufReader::new(file);
        serde_json::from_reader(reader)
            .context(format!("Failed to parse config file: {}", config_path))?
    } else {
        warn!("Config file not found at '{}', creating default config.", config_path);

        let config = Config::default();
        let config_json = serde_json::to_string_pretty(&config)
            .context("Failed to serialize default config to JSON")?;

        std::fs::write(config_path, config_json)
            .context(format!("Failed to write default config to file: {}", config_path))?;

        config
    };

    if let Some(log_level) = &options.log_level {
        config.log_level = log_level.clone().into();
    }
    log::set_max_level(config.log_level.to_level_filter());

    Ok(config)
}
