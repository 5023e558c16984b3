//! Trace Digest
//!
//! Scans application log files for Java stack traces, groups recurring
//! exceptions by trace body, ranks them by frequency and writes a report
//! per log file.
//!
//! This crate provides the core implementation for the
//! `trace-digest` CLI tool.
//!
//! ## Library use
//!
//! ```ignore
//! let mut state = AggregateState::new();
//! let (blocks, _) = read_blocks(reader, cutoff)?;
//! state.register_all(&blocks)?;
//! let report = render_report(path, cutoff, &rank(&state));
//! ```

pub mod aggregator;
pub mod commands;
pub mod discovery;
pub mod mail;
pub mod output;
pub mod parser;
pub mod utils;
