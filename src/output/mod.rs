//! Output writers for exception reports.
//!
//! This module handles writing data to disk in two formats:
//! - Plain-text reports (one per scanned log file)
//! - JSON summaries

pub mod json;
pub mod report;

// Re-export main functions
pub use json::{write_summary, ExceptionSummary, SummaryEntry};
pub use report::{format_timestamps, render_report, report_file_name, report_path, write_report};
