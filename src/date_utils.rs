/*!
 * Date/time utilities for dashcam overlay stamps.
 *
 * Dashcams burn a wall-clock stamp into their subtitle track, usually in
 * a day-first order such as `07.01.2020 08:56:45`. This module parses those
 * stamps and renders them as a long-form Romanian date.
 *
 * Parsing happens in two steps:
 * - a general parser that understands RFC 3339, RFC 2822 and year-first
 *   `Y-M-D H:M:S` stamps
 * - a fallback that reverses the date fields (`DD.MM.YYYY` becomes
 *   `YYYY-MM-DD`) and retries the general parser
 */

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, Timelike};
use log::{debug, warn};
use once_cell::sync::Lazy;
use regex::Regex;

// @const: Year-first stamp, date separators '-', '/' or '.', optional time part
static YEAR_FIRST_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^(\d{4})[-/.](\d{1,2})[-/.](\d{1,2})(?:(?:T|\s+)(\d{1,2}):(\d{1,2})(?::(\d{1,2})(?:[.,](\d{1,9}))?)?)?$",
    )
    .unwrap()
});

// @const: Separator between date fields
static NON_DIGIT_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"\D+").unwrap());

/// Romanian weekday names, indexed from Sunday = 0
pub const WEEKDAY_NAMES_RO: [&str; 7] = [
    "duminică", "luni", "marți", "miercuri", "joi", "vineri", "sâmbătă",
];

/// Romanian month names, indexed from January = 0
pub const MONTH_NAMES_RO: [&str; 12] = [
    "ianuarie",
    "februarie",
    "martie",
    "aprilie",
    "mai",
    "iunie",
    "iulie",
    "august",
    "septembrie",
    "octombrie",
    "noiembrie",
    "decembrie",
];

/// Locale tag used for overlay dates unless configured otherwise
pub const DEFAULT_DATE_LOCALE: &str = "ro-RO";

/// Parse a stamp with the general-purpose parser only
pub fn parse_general(input: &str) -> Option<NaiveDateTime> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Some(dt.naive_local());
    }

    if let Ok(dt) = DateTime::parse_from_rfc2822(input) {
        return Some(dt.naive_local());
    }

    let caps = YEAR_FIRST_REGEX.captures(input)?;
    let number = |idx: usize| -> Option<u32> {
        caps.get(idx).map_or(Some(0), |m| m.as_str().parse().ok())
    };

    let year: i32 = caps.get(1)?.as_str().parse().ok()?;
    let date = NaiveDate::from_ymd_opt(year, number(2)?, number(3)?)?;

    // Fractional seconds are right-padded to nanoseconds
    let nanos = match caps.get(7) {
        Some(frac) => format!("{:0<9}", frac.as_str()).parse().ok()?,
        None => 0,
    };

    date.and_hms_nano_opt(number(4)?, number(5)?, number(6)?, nanos)
}

/// Rewrite a day-first stamp into year-first order
///
/// The date token is the content up to the first whitespace. Its numeric
/// fields are reversed and joined with '-', then the remainder (usually the
/// time of day) is reattached.
pub fn reorder_date_fields(input: &str) -> Option<String> {
    let trimmed = input.trim();
    let (date_token, remainder) = match trimmed.split_once(char::is_whitespace) {
        Some((date, rest)) => (date, rest.trim()),
        None => (trimmed, ""),
    };

    let mut fields: Vec<&str> = NON_DIGIT_REGEX
        .split(date_token)
        .filter(|field| !field.is_empty())
        .collect();

    if fields.len() < 2 {
        return None;
    }

    fields.reverse();
    let reordered = fields.join("-");

    if remainder.is_empty() {
        Some(reordered)
    } else {
        Some(format!("{} {}", reordered, remainder))
    }
}

/// Parse an overlay stamp, retrying with reversed date fields when needed
pub fn parse_overlay_stamp(input: &str) -> Option<NaiveDateTime> {
    if let Some(parsed) = parse_general(input) {
        return Some(parsed);
    }

    let reordered = reorder_date_fields(input)?;
    debug!("Retrying stamp '{}' as '{}'", input, reordered);
    parse_general(&reordered)
}

/// Renders parsed overlay dates
///
/// Chosen once at startup: the locale-backed variant is only available
/// when the crate is built with the `locales` feature and the requested
/// locale is one chrono ships tables for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateFormatter {
    /// chrono's localized formatting for ro-RO
    Locale,
    /// Built-in Romanian name tables
    Fallback,
}

impl DateFormatter {
    /// Probe locale support for the given tag (e.g. "ro-RO")
    pub fn detect(locale_tag: &str) -> Self {
        if Self::locale_supported(locale_tag) {
            debug!("Using locale-backed date formatting for {}", locale_tag);
            DateFormatter::Locale
        } else {
            warn!(
                "Locale '{}' is not available, using built-in Romanian date names",
                locale_tag
            );
            DateFormatter::Fallback
        }
    }

    /// Whether this build can render the given locale natively
    pub fn locale_supported(locale_tag: &str) -> bool {
        cfg!(feature = "locales") && is_romanian_tag(locale_tag)
    }

    /// Render a date as "<weekday>, <day> <month> <year>, <hour>:<minute>:<second>"
    pub fn format(&self, datetime: &NaiveDateTime) -> String {
        match self {
            DateFormatter::Locale => format_with_locale(datetime),
            DateFormatter::Fallback => format_with_tables(datetime),
        }
    }
}

impl Default for DateFormatter {
    fn default() -> Self {
        Self::detect(DEFAULT_DATE_LOCALE)
    }
}

fn is_romanian_tag(tag: &str) -> bool {
    tag.trim().replace('_', "-").eq_ignore_ascii_case(DEFAULT_DATE_LOCALE)
}

/// Fixed-table rendering, independent of any locale data
pub fn format_with_tables(datetime: &NaiveDateTime) -> String {
    let weekday = WEEKDAY_NAMES_RO[datetime.weekday().num_days_from_sunday() as usize];
    let month = MONTH_NAMES_RO[datetime.month0() as usize];

    format!(
        "{}, {} {} {}, {}:{:02}:{:02}",
        weekday,
        datetime.day(),
        month,
        datetime.year(),
        datetime.hour(),
        datetime.minute(),
        datetime.second()
    )
}

#[cfg(feature = "locales")]
fn format_with_locale(datetime: &NaiveDateTime) -> String {
    datetime
        .and_utc()
        .format_localized("%A, %-d %B %Y, %-H:%M:%S", chrono::Locale::ro_RO)
        .to_string()
}

#[cfg(not(feature = "locales"))]
fn format_with_locale(datetime: &NaiveDateTime) -> String {
    format_with_tables(datetime)
}
