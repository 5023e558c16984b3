//! Inspect command implementation.
//!
//! Scans a single log file and renders its ranked report in memory,
//! without writing files or sending mail.

use super::scan::scan_file;
use crate::aggregator::{rank, AggregateState};
use crate::output::render_report;
use anyhow::Result;
use chrono::NaiveDate;
use log::info;
use std::path::Path;

/// Render the exception report of one log file
///
/// **Public** - main entry point called from main.rs
pub fn execute_inspect(path: &Path, cutoff: NaiveDate) -> Result<String> {
    let mut state = AggregateState::new();
    let stats = scan_file(path, cutoff, &mut state)?;

    info!(
        "{}: {} lines read, {} trace blocks, {} distinct exceptions",
        path.display(),
        stats.lines_read,
        stats.blocks_emitted,
        state.len()
    );

    Ok(render_report(path, cutoff, &rank(&state)))
}
