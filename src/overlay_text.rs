use once_cell::sync::Lazy;
use regex::Regex;
use log::trace;

use crate::date_utils::{self, DateFormatter};

// @module: Cleanup of dashcam overlay text inside cue lines

// @const: First bracketed annotation, e.g. "[07.01.2020 08:56:45]"
static ANNOTATION_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\[([^\]]*)\]").unwrap()
});

// @const: Speed readouts such as " 0MPH", " 0KM/H", " MPH"
static SPEED_ARTIFACT_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\s+0?K?MP?/?H").unwrap()
});

/// Replace the first bracketed date/time annotation with its long form
///
/// Text without an annotation, or with one that cannot be parsed as a
/// date even after reordering its fields, is returned unchanged.
pub fn normalize_annotation(text: &str, formatter: &DateFormatter) -> String {
    let Some(caps) = ANNOTATION_REGEX.captures(text) else {
        return text.to_string();
    };

    // Group 0 always exists on a successful capture
    let whole = caps.get(0).map_or(0..0, |m| m.range());
    let content = caps.get(1).map_or("", |m| m.as_str());

    match date_utils::parse_overlay_stamp(content) {
        Some(datetime) => {
            let formatted = formatter.format(&datetime);
            let mut result = String::with_capacity(text.len() + formatted.len());
            result.push_str(&text[..whole.start]);
            result.push_str(&formatted);
            result.push_str(&text[whole.end..]);
            result
        }
        None => {
            trace!("Leaving unrecognized annotation as is: [{}]", content);
            text.to_string()
        }
    }
}

/// Remove speed overlay tokens together with the whitespace before them
pub fn strip_speed_artifacts(text: &str) -> String {
    SPEED_ARTIFACT_REGEX.replace_all(text, "").into_owned()
}

/// Full overlay cleanup applied to a cue's text
pub fn clean_cue_text(text: &str, formatter: &DateFormatter) -> String {
    strip_speed_artifacts(&normalize_annotation(text, formatter))
}
