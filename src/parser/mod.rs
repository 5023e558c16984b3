//! Log line classification and stack-trace extraction.
//!
//! This module handles:
//! - Classifying raw lines (timestamped, frame, blank, other)
//! - Tracking the governing timestamp and the cutoff date
//! - Reassembling multi-line Java stack traces into blocks

pub mod extractor;
pub mod line;

// Re-export main types
pub use extractor::{extract_blocks, read_blocks, ExtractStats, TraceBlock, TraceExtractor};
pub use line::{classify_line, LineKind};
