//! Plain-text exception report writer.
//!
//! One report per scanned log file. Each ranked exception becomes an entry:
//!
//! ```text
//! log path: logs/server.log
//! 2016-04-19
//!
//! 2 found:
//! 2016-04-20 10:00:00 ERROR Something failed
//!     at com.foo.Bar.baz(Bar.java:10)
//! ['10:00:00', '10:02:13']
//!
//! ----------------------------------------------------------------------------------------------------
//! ```

use crate::aggregator::RankedException;
use crate::discovery::LogFile;
use crate::utils::config::{CUTOFF_FORMAT, REPORT_NAME_INFIX, REPORT_RULE_WIDTH};
use crate::utils::error::OutputError;
use chrono::NaiveDate;
use log::{debug, info};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Report file name for a log file: `<cutoff>_exceptions_<name>`
///
/// **Public** - used by the scan command
pub fn report_file_name(cutoff: NaiveDate, log: &LogFile) -> String {
    format!(
        "{}{}{}",
        cutoff.format(CUTOFF_FORMAT),
        REPORT_NAME_INFIX,
        log.flat_name()
    )
}

/// Full report path inside `output_dir`
pub fn report_path(output_dir: &Path, cutoff: NaiveDate, log: &LogFile) -> PathBuf {
    output_dir.join(report_file_name(cutoff, log))
}

/// Render ranked exceptions as report text
///
/// **Public** - shared by file output and the inspect command
///
/// # Arguments
/// * `log_path` - Scanned log file, echoed in every entry
/// * `cutoff` - Report date
/// * `ranked` - Groups from `aggregator::rank`
///
/// # Returns
/// Report text; empty when there is nothing to report
pub fn render_report(log_path: &Path, cutoff: NaiveDate, ranked: &[RankedException<'_>]) -> String {
    let date = cutoff.format(CUTOFF_FORMAT).to_string();
    let rule = "-".repeat(REPORT_RULE_WIDTH);
    let mut out = String::new();

    for entry in ranked {
        out.push_str(&format!(
            "log path: {}\n{}\n\n{} found:\n{}\n{}\n{}\n\n{}\n",
            log_path.display(),
            date,
            entry.group.count,
            entry.group.first_header().unwrap_or(""),
            entry.body,
            format_timestamps(&entry.group.timestamps),
            rule,
        ));
    }

    out
}

/// Format timestamp suffixes as a bracketed, quoted list
pub fn format_timestamps(timestamps: &[String]) -> String {
    let quoted: Vec<String> = timestamps.iter().map(|t| format!("'{}'", t)).collect();
    format!("[{}]", quoted.join(", "))
}

/// Write report text to a file
///
/// **Public** - main entry point for report output
///
/// # Errors
/// * `OutputError::InvalidPath` - path is empty, a directory, or its parent cannot be created
/// * `OutputError::WriteFailed` - I/O error during write
pub fn write_report(content: &str, output_path: impl AsRef<Path>) -> Result<(), OutputError> {
    let output_path = output_path.as_ref();

    debug!("Writing report to: {}", output_path.display());

    prepare_output_path(output_path)?;

    let file = File::create(output_path)?;
    let mut writer = BufWriter::new(file);
    writer.write_all(content.as_bytes())?;
    writer.flush()?;

    info!(
        "✓ Report written to: {} ({} bytes)",
        output_path.display(),
        content.len()
    );

    Ok(())
}

/// Validate that output path is writable
///
/// **Private** - internal validation
fn validate_output_path(path: &Path) -> Result<(), OutputError> {
    if path.as_os_str().is_empty() {
        return Err(OutputError::InvalidPath("Path is empty".to_string()));
    }

    if path.is_dir() {
        return Err(OutputError::InvalidPath(format!(
            "Path is a directory: {}",
            path.display()
        )));
    }

    Ok(())
}

/// Validate an output path and create its missing parent directories
///
/// **Private** - shared by the report and JSON writers
pub(crate) fn prepare_output_path(path: &Path) -> Result<(), OutputError> {
    validate_output_path(path)?;

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            debug!("Creating output directory: {}", parent.display());
            std::fs::create_dir_all(parent).map_err(|e| {
                OutputError::InvalidPath(format!(
                    "Cannot create directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }
    }

    Ok(())
}
