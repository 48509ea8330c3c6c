/*!
 * # dashmerge - dashcam clip merger
 *
 * A Rust library and CLI that consolidates a folder of dashcam footage into
 * a single video.
 *
 * ## Features
 *
 * - Convert the SRT track dashcams write next to each clip into an ASS track
 * - Rewrite the overlay date stamp (e.g. `[07.01.2020 08:56:45]`) as a long
 *   Romanian date and drop speed readouts such as `0KM/H`
 * - Downscale each clip with ffmpeg, burning the converted track in
 * - Concatenate the processed clips in recording order
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `app_config`: Configuration management
 * - `subtitle_processor`: SRT parsing and ASS emission
 * - `date_utils`: Overlay date parsing and rendering
 * - `overlay_text`: Annotation replacement and speed readout stripping
 * - `media`: ffmpeg integration behind the `MediaToolkit` trait
 * - `file_utils`: File system operations
 * - `app_controller`: Main application controller
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod file_utils;
pub mod subtitle_processor;
pub mod date_utils;
pub mod overlay_text;
pub mod media;
pub mod app_controller;
pub mod errors;

// Re-export main types for easier usage
pub use app_config::Config;
pub use subtitle_processor::{Cue, SubtitleDocument, transform_file};
pub use date_utils::DateFormatter;
pub use media::{Ffmpeg, MediaToolkit, TranscodeJob};
pub use errors::{AppError, MediaError, SubtitleError};
