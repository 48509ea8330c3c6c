use std::fmt;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use regex::Regex;
use once_cell::sync::Lazy;
use log::{debug, warn};
use tempfile::NamedTempFile;

use crate::date_utils::DateFormatter;
use crate::errors::SubtitleError;
use crate::overlay_text;

// @module: SRT to ASS subtitle transformation

// @const: Blank line between cue blocks
static BLANK_LINE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\n\s*\n").unwrap()
});

// @const: Optional sequence index line
static INDEX_LINE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\d+$").unwrap()
});

// @const: SRT timestamp with one delimiter character on each side
static TIMESTAMP_TOKEN_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\D\d+:\d+:\d+,\d+\D").unwrap()
});

/// Line break marker understood by ASS renderers
pub const ASS_LINE_BREAK: &str = "\\N";

/// Fixed ASS header: script info, the single Default style and the events format
pub const ASS_HEADER: &str = "[Script Info]
ScriptType: v4.00+
WrapStyle: 0
ScaledBorderAndShadow: yes
PlayResX: 384
PlayResY: 288

[V4+ Styles]
Format: Name, Fontname, Fontsize, PrimaryColour, SecondaryColour, OutlineColour, BackColour, Bold, Italic, Underline, StrikeOut, ScaleX, ScaleY, Spacing, Angle, BorderStyle, Outline, Shadow, Alignment, MarginL, MarginR, MarginV, Encoding
Style: Default,Arial,16,&H00FFFFFF,&H000000FF,&H00000000,&H80000000,0,0,0,0,100,100,0,0,1,1,0,2,10,10,10,1

[Events]
Format: Layer, Start, End, Style, Name, MarginL, MarginR, MarginV, Effect, Text
";

// @struct: Single SRT cue
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cue {
    // @field: Index line value, display only
    pub sequence_index: Option<usize>,

    // @field: Start token as matched, delimiters included
    pub start_time: String,

    // @field: End token as matched, delimiters included
    pub end_time: String,

    // @field: Text lines joined with \N
    pub text: String,
}

impl Cue {
    /// Creates a cue from already matched timestamp tokens
    pub fn new(sequence_index: Option<usize>, start_time: String, end_time: String, text: String) -> Self {
        Cue {
            sequence_index,
            start_time,
            end_time,
            text,
        }
    }

    /// Parse one non-empty cue block
    ///
    /// `block_number` is only used for error reporting.
    pub fn parse_block(block: &str, block_number: usize) -> Result<Self, SubtitleError> {
        let mut lines: Vec<&str> = block.lines().collect();

        let mut sequence_index = None;
        if let Some(first) = lines.first() {
            let first = first.trim();
            if INDEX_LINE_REGEX.is_match(first) {
                sequence_index = first.parse().ok();
                lines.remove(0);
            }
        }

        let times_line = lines.first().copied().unwrap_or("");
        let (start_time, end_time) = Self::extract_time_tokens(times_line)
            .ok_or_else(|| SubtitleError::MalformedCue {
                block: block_number,
                line: times_line.to_string(),
            })?;

        let text = lines
            .iter()
            .skip(1)
            .copied()
            .collect::<Vec<_>>()
            .join(ASS_LINE_BREAK);

        Ok(Cue::new(sequence_index, start_time, end_time, text))
    }

    /// Pull the first two timestamp tokens out of a times line
    fn extract_time_tokens(times_line: &str) -> Option<(String, String)> {
        // Pad so tokens at either edge of the line still carry a delimiter
        let padded = format!(" {} ", times_line);
        let mut tokens = TIMESTAMP_TOKEN_REGEX
            .find_iter(&padded)
            .map(|m| m.as_str().to_string());

        let start = tokens.next()?;
        let end = tokens.next()?;
        Some((start, end))
    }

    /// Re-encode a matched SRT token for ASS
    ///
    /// Character-positional: the comma becomes a period and the delimiter
    /// character on each side of the token is dropped. Byte counts are kept
    /// exactly as in the source, nothing is re-parsed numerically.
    pub fn reencode_timestamp(token: &str) -> String {
        let replaced = token.replacen(',', ".", 1);
        let mut chars = replaced.chars();
        chars.next();
        chars.next_back();
        chars.as_str().to_string()
    }

    /// Start time in ASS form
    pub fn format_start_time(&self) -> String {
        Self::reencode_timestamp(&self.start_time)
    }

    /// End time in ASS form
    pub fn format_end_time(&self) -> String {
        Self::reencode_timestamp(&self.end_time)
    }

    /// Render the cue as an ASS dialogue line, overlay text cleaned up
    pub fn to_dialogue_line(&self, formatter: &DateFormatter) -> String {
        format!(
            "Dialogue: 0,{},{},Default,,0,0,0,,{}",
            self.format_start_time(),
            self.format_end_time(),
            overlay_text::clean_cue_text(&self.text, formatter)
        )
    }
}

impl fmt::Display for Cue {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if let Some(index) = self.sequence_index {
            writeln!(f, "{}", index)?;
        }
        writeln!(f, "{} --> {}", self.start_time.trim(), self.end_time.trim())?;
        writeln!(f, "{}", self.text.replace(ASS_LINE_BREAK, "\n"))
    }
}

/// Split SRT content into its non-empty cue blocks, in source order
pub fn split_cue_blocks(content: &str) -> impl Iterator<Item = &str> {
    BLANK_LINE_REGEX
        .split(content)
        .map(str::trim)
        .filter(|block| !block.is_empty())
}

/// Parse SRT format string into cues
pub fn parse_srt_string(content: &str) -> Result<Vec<Cue>, SubtitleError> {
    let normalized = content
        .strip_prefix('\u{feff}')
        .unwrap_or(content)
        .replace("\r\n", "\n");
    split_cue_blocks(&normalized)
        .enumerate()
        .map(|(i, block)| Cue::parse_block(block, i + 1))
        .collect()
}

/// An ASS document: fixed header plus one dialogue line per cue
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubtitleDocument {
    /// Dialogue lines in source order
    pub dialogue_lines: Vec<String>,
}

impl SubtitleDocument {
    /// Build the document from parsed cues
    pub fn from_cues(cues: &[Cue], formatter: &DateFormatter) -> Self {
        SubtitleDocument {
            dialogue_lines: cues
                .iter()
                .map(|cue| cue.to_dialogue_line(formatter))
                .collect(),
        }
    }

    /// Number of dialogue lines
    pub fn len(&self) -> usize {
        self.dialogue_lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dialogue_lines.is_empty()
    }

    /// Write the document, replacing whatever is at `path`
    ///
    /// The content goes to a temporary file in the same directory which is
    /// then renamed over the destination.
    pub fn write_to_ass<P: AsRef<Path>>(&self, path: P) -> Result<(), SubtitleError> {
        let path = path.as_ref();
        let write_error = |source: std::io::Error| SubtitleError::DestinationWrite {
            path: path.to_path_buf(),
            source,
        };

        let parent = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        fs::create_dir_all(&parent).map_err(write_error)?;

        let mut file = NamedTempFile::new_in(&parent).map_err(write_error)?;
        file.write_all(self.to_string().as_bytes()).map_err(write_error)?;
        file.flush().map_err(write_error)?;
        file.persist(path).map_err(|e| write_error(e.error))?;

        Ok(())
    }
}

impl fmt::Display for SubtitleDocument {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", ASS_HEADER)?;
        for line in &self.dialogue_lines {
            writeln!(f, "{}", line)?;
        }
        Ok(())
    }
}

/// Outcome of a successful file transform
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransformSummary {
    /// Where the ASS file was written
    pub destination: PathBuf,

    /// Number of dialogue lines written
    pub cue_count: usize,
}

/// Convert one SRT file into an ASS file
///
/// A missing source, or one that is not a regular file, is not an error:
/// nothing is written and `Ok(None)` is returned. Dashcams do not always
/// produce a subtitle companion for every clip.
pub fn transform_file<P1: AsRef<Path>, P2: AsRef<Path>>(
    source: P1,
    destination: P2,
    formatter: &DateFormatter,
) -> Result<Option<TransformSummary>, SubtitleError> {
    let source = source.as_ref();
    let destination = destination.as_ref();

    let content = match read_source(source) {
        Ok(content) => content,
        Err(SubtitleError::SourceUnreadable(path)) => {
            debug!("No subtitle source at {:?}, skipping", path);
            return Ok(None);
        }
        Err(e) => return Err(e),
    };

    let cues = parse_srt_string(&content)?;
    if cues.is_empty() {
        warn!("No cues found in {:?}, writing header only", source);
    }

    let document = SubtitleDocument::from_cues(&cues, formatter);
    document.write_to_ass(destination)?;

    debug!("Converted {:?} -> {:?} ({} cues)", source, destination, document.len());

    Ok(Some(TransformSummary {
        destination: destination.to_path_buf(),
        cue_count: document.len(),
    }))
}

fn read_source(source: &Path) -> Result<String, SubtitleError> {
    if !source.is_file() {
        return Err(SubtitleError::SourceUnreadable(source.to_path_buf()));
    }

    fs::read_to_string(source).map_err(|e| SubtitleError::Read {
        path: source.to_path_buf(),
        source: e,
    })
}
