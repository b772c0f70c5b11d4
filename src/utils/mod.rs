//! Utility functions and helpers.

pub mod url;

use std::sync::LazyLock;

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use regex::Regex;
use unicode_segmentation::UnicodeSegmentation;

static DATE_PREFIX_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{4})-(\d{2})-(\d{2})").expect("date prefix regex"));

/// Cut text to at most `max_chars` characters without splitting a grapheme.
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    let mut out = String::new();
    let mut count = 0;
    for grapheme in text.graphemes(true) {
        let len = grapheme.chars().count();
        if count + len > max_chars {
            break;
        }
        out.push_str(grapheme);
        count += len;
    }
    out
}

/// Parse a `YYYY-MM-DD` prefix, pinned to 15:00 UTC (midnight JST).
pub fn date_prefix(name: &str) -> Option<DateTime<Utc>> {
    let caps = DATE_PREFIX_RE.captures(name)?;
    let date = NaiveDate::from_ymd_opt(
        caps[1].parse().ok()?,
        caps[2].parse().ok()?,
        caps[3].parse().ok()?,
    )?;
    let at = date.and_hms_opt(15, 0, 0)?;
    Some(Utc.from_utc_datetime(&at))
}

/// Strip the `.html` extension from a file name.
pub fn slug_from_file_name(file_name: &str) -> &str {
    file_name.strip_suffix(".html").unwrap_or(file_name)
}

/// Escape text for use inside a double-quoted HTML attribute.
pub fn escape_attr(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('"', "&quot;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
