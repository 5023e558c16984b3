//! Stack-trace extraction state machine.
//!
//! Turns an unstructured stream of log lines into completed trace blocks.
//! A block is the line that announced the exception followed by its
//! contiguous `\tat` frame lines:
//!
//! ```text
//! 2016-04-20 10:00:00 ERROR Something failed      <- header
//!     at com.foo.Bar.baz(Bar.java:10)              <- frames
//!     at com.foo.Bar.qux(Bar.java:20)
//! 2016-04-20 10:00:05 INFO next                   <- closes the block
//! ```

use super::line::classify_line;
use crate::utils::config::{CONTINUATION_PREFIX, TIMESTAMP_FORMAT};
use crate::utils::error::ParseError;
use chrono::{NaiveDate, NaiveDateTime};
use log::debug;
use std::io::BufRead;

/// A completed stack trace: one header line plus its frame lines
///
/// **Public** - handed from the extractor to the aggregator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraceBlock {
    /// Header first, then frames (with empty separator lines for `java` continuations)
    lines: Vec<String>,

    /// Timestamp text governing the block's last frame line
    timestamp: Option<String>,
}

impl TraceBlock {
    /// Create a block from its lines and completion timestamp
    ///
    /// **Public** - constructor
    pub fn new(lines: Vec<String>, timestamp: Option<String>) -> Self {
        Self { lines, timestamp }
    }

    /// Header line (the line preceding the first frame)
    pub fn header(&self) -> &str {
        self.lines.first().map(String::as_str).unwrap_or("")
    }

    /// Lines after the header
    pub fn body_lines(&self) -> &[String] {
        self.lines.get(1..).unwrap_or(&[])
    }

    /// Body text used as the grouping key
    pub fn body(&self) -> String {
        self.body_lines().join("\n")
    }

    pub fn timestamp(&self) -> Option<&str> {
        self.timestamp.as_deref()
    }

    /// Full block text, header included
    pub fn text(&self) -> String {
        self.lines.join("\n")
    }
}

/// Counters collected while extracting
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExtractStats {
    /// Lines fed to the extractor
    pub lines_read: usize,

    /// Lines ignored because they were blank or before the cutoff
    pub lines_skipped: usize,

    /// Completed blocks handed out
    pub blocks_emitted: usize,
}

/// Line-by-line trace block extractor
///
/// **Public** - feed lines with `push_line`, then call `finish`
///
/// # Example
/// ```ignore
/// let mut extractor = TraceExtractor::new(cutoff);
/// for line in lines {
///     if let Some(block) = extractor.push_line(line)? {
///         state.register(&block)?;
///     }
/// }
/// if let Some(block) = extractor.finish() {
///     state.register(&block)?;
/// }
/// ```
#[derive(Debug)]
pub struct TraceExtractor {
    cutoff: NaiveDate,
    accumulated: Vec<String>,
    previous_line: Option<String>,
    in_block: bool,
    last_seen_timestamp: Option<NaiveDateTime>,
    last_seen_time: Option<String>,
    block_time: Option<String>,
    stats: ExtractStats,
}

impl TraceExtractor {
    /// Create an extractor ignoring activity before `cutoff` (midnight)
    pub fn new(cutoff: NaiveDate) -> Self {
        Self {
            cutoff,
            accumulated: Vec::new(),
            previous_line: None,
            in_block: false,
            last_seen_timestamp: None,
            last_seen_time: None,
            block_time: None,
            stats: ExtractStats::default(),
        }
    }

    /// Feed one line (terminator stripped)
    ///
    /// # Returns
    /// The block completed by this line, if any
    ///
    /// # Errors
    /// * `ParseError::MalformedTimestamp` - line looks timestamped but the date is invalid
    pub fn push_line(&mut self, line: &str) -> Result<Option<TraceBlock>, ParseError> {
        self.stats.lines_read += 1;
        let kind = classify_line(line);

        if let Some(text) = kind.timestamp() {
            let parsed = NaiveDateTime::parse_from_str(text, TIMESTAMP_FORMAT).map_err(|source| {
                ParseError::MalformedTimestamp {
                    line_number: self.stats.lines_read,
                    text: text.to_string(),
                    source,
                }
            })?;
            self.last_seen_timestamp = Some(parsed);
            self.last_seen_time = Some(text.to_string());
        }

        if self.before_cutoff() || kind.is_blank() {
            self.stats.lines_skipped += 1;
            return Ok(None);
        }

        let mut completed = None;

        if kind.is_frame() {
            if !self.in_block {
                self.in_block = true;
                let header = self.previous_line.take().unwrap_or_default();
                self.accumulated.push(header);
            }
            self.accumulated.push(line.to_string());
            self.block_time = self.last_seen_time.clone();
        } else if self.in_block {
            self.in_block = false;
            if line.starts_with(CONTINUATION_PREFIX) {
                // Same logical exception: keep the buffer, mark the break
                self.accumulated.push(String::new());
            } else {
                completed = Some(self.take_block());
            }
        }

        self.previous_line = Some(line.to_string());
        Ok(completed)
    }

    /// Flush at end of input
    ///
    /// Emits the open block with its last known timestamp. A buffer left
    /// behind by a `java` continuation without further frames is dropped.
    pub fn finish(mut self) -> Option<TraceBlock> {
        if self.in_block {
            return Some(self.take_block());
        }

        if !self.accumulated.is_empty() {
            debug!(
                "Dropping {} buffered lines with no frames after the last continuation",
                self.accumulated.len()
            );
        }

        None
    }

    pub fn stats(&self) -> ExtractStats {
        self.stats
    }

    /// Whether the governing timestamp lies before the cutoff date
    fn before_cutoff(&self) -> bool {
        self.last_seen_timestamp
            .is_some_and(|seen| seen.date() < self.cutoff)
    }

    fn take_block(&mut self) -> TraceBlock {
        self.stats.blocks_emitted += 1;
        TraceBlock::new(std::mem::take(&mut self.accumulated), self.block_time.take())
    }
}

/// Extract every block from an in-memory sequence of lines
///
/// **Public** - convenience wrapper around `TraceExtractor`
pub fn extract_blocks<I, S>(lines: I, cutoff: NaiveDate) -> Result<Vec<TraceBlock>, ParseError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut extractor = TraceExtractor::new(cutoff);
    let mut blocks = Vec::new();

    for line in lines {
        if let Some(block) = extractor.push_line(line.as_ref())? {
            blocks.push(block);
        }
    }
    blocks.extend(extractor.finish());

    Ok(blocks)
}

/// Extract every block from a reader
///
/// **Public** - main entry point used by the scan command
///
/// Lines are split on `\n`, a trailing `\r` is stripped and invalid UTF-8
/// is replaced rather than rejected.
///
/// # Errors
/// * `ParseError::ReadFailed` - I/O error while reading
/// * `ParseError::MalformedTimestamp` - see `TraceExtractor::push_line`
pub fn read_blocks(
    reader: impl BufRead,
    cutoff: NaiveDate,
) -> Result<(Vec<TraceBlock>, ExtractStats), ParseError> {
    let mut extractor = TraceExtractor::new(cutoff);
    let mut blocks = Vec::new();

    for raw in reader.split(b'\n') {
        let mut raw = raw?;
        if raw.last() == Some(&b'\r') {
            raw.pop();
        }
        let line = String::from_utf8_lossy(&raw);

        if let Some(block) = extractor.push_line(&line)? {
            blocks.push(block);
        }
    }

    let stats = extractor.stats();
    blocks.extend(extractor.finish());

    debug!(
        "Read {} lines ({} skipped), {} trace blocks",
        stats.lines_read,
        stats.lines_skipped,
        blocks.len()
    );

    Ok((blocks, stats))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn cutoff() -> NaiveDate {
        NaiveDate::from_ymd_opt(2016, 4, 19).unwrap()
    }

    #[test]
    fn test_single_block() {
        let lines = [
            "2016-04-20 10:00:00 ERROR Something failed",
            "\tat com.foo.Bar.baz(Bar.java:10)",
            "\tat com.foo.Bar.qux(Bar.java:20)",
            "2016-04-20 10:00:05 INFO next",
        ];

        let blocks = extract_blocks(lines, cutoff()).unwrap();

        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].header(), "2016-04-20 10:00:00 ERROR Something failed");
        assert_eq!(
            blocks[0].body(),
            "\tat com.foo.Bar.baz(Bar.java:10)\n\tat com.foo.Bar.qux(Bar.java:20)"
        );
        // The closing line's newer timestamp is not the block's
        assert_eq!(blocks[0].timestamp(), Some("2016-04-20 10:00:00"));
    }

    #[test]
    fn test_blank_lines_do_not_interrupt() {
        let lines = [
            "2016-04-20 10:00:00 ERROR boom",
            "\tat a.B.c(B.java:1)",
            "",
            "\tat a.B.d(B.java:2)",
            "done",
        ];

        let blocks = extract_blocks(lines, cutoff()).unwrap();

        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].body_lines().len(), 2);
    }

    #[test]
    fn test_blank_line_is_never_header() {
        let lines = ["header", "", "\tat a.B.c(B.java:1)", "end"];

        let blocks = extract_blocks(lines, cutoff()).unwrap();

        assert_eq!(blocks[0].header(), "header");
    }

    #[test]
    fn test_java_line_continues_block() {
        let lines = [
            "2016-04-20 10:00:00 ERROR boom",
            "\tat a.B.c(B.java:1)",
            "java.lang.IllegalStateException: nested",
            "\tat a.B.d(B.java:2)",
            "end",
        ];

        let blocks = extract_blocks(lines, cutoff()).unwrap();

        assert_eq!(blocks.len(), 1);
        assert_eq!(
            blocks[0].text(),
            "2016-04-20 10:00:00 ERROR boom\n\tat a.B.c(B.java:1)\n\n\
             java.lang.IllegalStateException: nested\n\tat a.B.d(B.java:2)"
        );
    }

    #[test]
    fn test_eof_flushes_open_block() {
        let lines = ["2016-04-20 10:00:00 ERROR boom", "\tat a.B.c(B.java:1)"];

        let blocks = extract_blocks(lines, cutoff()).unwrap();

        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].timestamp(), Some("2016-04-20 10:00:00"));
    }

    #[test]
    fn test_eof_drops_dangling_continuation() {
        let lines = [
            "2016-04-20 10:00:00 ERROR boom",
            "\tat a.B.c(B.java:1)",
            "java.lang.RuntimeException",
        ];

        let blocks = extract_blocks(lines, cutoff()).unwrap();

        assert!(blocks.is_empty());
    }

    #[test]
    fn test_lines_before_cutoff_are_skipped() {
        let lines = [
            "2016-04-18 23:59:59 ERROR old",
            "\tat a.B.c(B.java:1)",
            "2016-04-19 00:00:00 INFO new day",
            "2016-04-19 00:00:01 ERROR fresh",
            "\tat a.B.d(B.java:2)",
            "end",
        ];

        let mut extractor = TraceExtractor::new(cutoff());
        let mut blocks = Vec::new();
        for line in lines {
            blocks.extend(extractor.push_line(line).unwrap());
        }

        assert_eq!(extractor.stats().lines_skipped, 2);
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].header(), "2016-04-19 00:00:01 ERROR fresh");
    }

    #[test]
    fn test_frame_without_previous_line() {
        let blocks = extract_blocks(["\tat a.B.c(B.java:1)"], cutoff()).unwrap();

        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].header(), "");
        assert_eq!(blocks[0].timestamp(), None);
    }

    #[test]
    fn test_malformed_timestamp_is_fatal() {
        let result = extract_blocks(["ok", "2016-02-30 10:00:00 bad"], cutoff());

        match result {
            Err(ParseError::MalformedTimestamp { line_number, text, .. }) => {
                assert_eq!(line_number, 2);
                assert_eq!(text, "2016-02-30 10:00:00");
            }
            other => panic!("expected malformed timestamp, got {:?}", other),
        }
    }

    #[test]
    fn test_read_blocks_handles_crlf() {
        let input = "2016-04-20 10:00:00 ERROR boom\r\n\tat a.B.c(B.java:1)\r\n\r\nend\r\n";

        let (blocks, stats) = read_blocks(input.as_bytes(), cutoff()).unwrap();

        assert_eq!(stats.lines_read, 4);
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].body(), "\tat a.B.c(B.java:1)");
    }
}
