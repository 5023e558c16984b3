//! Classification of raw log lines.
//!
//! Two independent pattern checks drive everything the extractor does:
//! - a timestamp prefix (`YYYY-MM-DD HH:MM:SS`) marks a line that moves the clock
//! - a tab followed by `at` marks a stack-frame line

use regex::Regex;
use std::sync::LazyLock;

/// Matches a date and time at the beginning of a line.
static TIMESTAMP_PREFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[0-9]{4}-[0-9]{2}-[0-9]{2}\s[0-9]{2}:[0-9]{2}:[0-9]{2}")
        .expect("timestamp pattern is valid")
});

/// Matches a Java stack-frame line.
static FRAME_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\tat").expect("frame pattern is valid"));

/// Kind of a single log line
///
/// **Public** - consumed by the trace extractor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind<'a> {
    /// Line starting with a timestamp; carries the matched prefix
    Timestamped(&'a str),

    /// Stack-frame line (`\tat ...`)
    Frame,

    /// Empty line
    Blank,

    /// Anything else
    Other,
}

impl<'a> LineKind<'a> {
    /// Timestamp text carried by this line, if any
    pub fn timestamp(&self) -> Option<&'a str> {
        match *self {
            LineKind::Timestamped(text) => Some(text),
            _ => None,
        }
    }

    pub fn is_frame(&self) -> bool {
        matches!(self, LineKind::Frame)
    }

    pub fn is_blank(&self) -> bool {
        matches!(self, LineKind::Blank)
    }
}

/// Classify a log line with its terminator already stripped
///
/// **Public** - main entry point for line classification
///
/// # Example
/// ```ignore
/// assert_eq!(classify_line("\tat com.foo.Bar.baz(Bar.java:10)"), LineKind::Frame);
/// ```
pub fn classify_line(line: &str) -> LineKind<'_> {
    if line.is_empty() {
        return LineKind::Blank;
    }

    if FRAME_PREFIX.is_match(line) {
        return LineKind::Frame;
    }

    match TIMESTAMP_PREFIX.find(line) {
        Some(m) => LineKind::Timestamped(m.as_str()),
        None => LineKind::Other,
    }
}
