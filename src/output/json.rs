//! JSON exception summary writer.
//!
//! Machine-readable sibling of the text report, written with `--json`.

use super::report::prepare_output_path;
use crate::aggregator::RankedException;
use crate::utils::error::OutputError;
use chrono::{NaiveDate, Utc};
use log::{debug, info};
use serde::Serialize;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

/// Ranked exceptions of one log file
#[derive(Debug, Clone, Serialize)]
pub struct ExceptionSummary {
    pub log_path: String,
    pub cutoff: NaiveDate,

    /// RFC 3339 generation time
    pub generated_at: String,

    pub exceptions: Vec<SummaryEntry>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SummaryEntry {
    pub count: usize,
    pub header: String,
    pub body: String,
    pub timestamps: Vec<String>,
}

impl ExceptionSummary {
    /// Build a summary from ranked groups
    ///
    /// **Public** - constructor
    pub fn new(log_path: &Path, cutoff: NaiveDate, ranked: &[RankedException<'_>]) -> Self {
        let exceptions = ranked
            .iter()
            .map(|entry| SummaryEntry {
                count: entry.group.count,
                header: entry.group.first_header().unwrap_or("").to_string(),
                body: entry.body.to_string(),
                timestamps: entry.group.timestamps.clone(),
            })
            .collect();

        Self {
            log_path: log_path.display().to_string(),
            cutoff,
            generated_at: Utc::now().to_rfc3339(),
            exceptions,
        }
    }
}

/// Write a summary to a JSON file
///
/// **Public** - main entry point for JSON output
///
/// # Errors
/// * `OutputError::WriteFailed` - I/O error during write
/// * `OutputError::SerializationFailed` - JSON serialization error
/// * `OutputError::InvalidPath` - Path is empty, a directory, or its parent cannot be created
pub fn write_summary(
    summary: &ExceptionSummary,
    output_path: impl AsRef<Path>,
) -> Result<(), OutputError> {
    let output_path = output_path.as_ref();

    debug!("Writing JSON summary to: {}", output_path.display());

    prepare_output_path(output_path)?;

    let file = File::create(output_path).map_err(OutputError::WriteFailed)?;
    let writer = BufWriter::new(file);

    serde_json::to_writer_pretty(writer, summary).map_err(OutputError::SerializationFailed)?;

    info!(
        "✓ JSON summary written to: {} ({} exceptions)",
        output_path.display(),
        summary.exceptions.len()
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregator::ExceptionGroup;

    #[test]
    fn test_write_summary() {
        let group = ExceptionGroup {
            count: 1,
            timestamps: vec!["10:00:00".to_string()],
            headers: vec!["boom".to_string()],
        };
        let ranked = [RankedException {
            body: "\tat a.B.c(B.java:1)",
            group: &group,
        }];
        let cutoff = NaiveDate::from_ymd_opt(2016, 4, 19).unwrap();
        let summary = ExceptionSummary::new(Path::new("logs/app.log"), cutoff, &ranked);

        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("summary.json");
        write_summary(&summary, &path).unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["cutoff"], "2016-04-19");
        assert_eq!(value["log_path"], "logs/app.log");
        assert_eq!(value["exceptions"][0]["count"], 1);
        assert_eq!(value["exceptions"][0]["header"], "boom");
        assert_eq!(value["exceptions"][0]["timestamps"][0], "10:00:00");
    }

    #[test]
    fn test_write_summary_creates_parent_dirs() {
        let cutoff = NaiveDate::from_ymd_opt(2016, 4, 19).unwrap();
        let summary = ExceptionSummary::new(Path::new("logs/app.log"), cutoff, &[]);

        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("nested/deeper/summary.json");
        write_summary(&summary, &path).unwrap();

        assert!(path.exists());
    }

    #[test]
    fn test_write_summary_rejects_directory() {
        let cutoff = NaiveDate::from_ymd_opt(2016, 4, 19).unwrap();
        let summary = ExceptionSummary::new(Path::new("logs/app.log"), cutoff, &[]);

        let temp_dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            write_summary(&summary, temp_dir.path()),
            Err(OutputError::InvalidPath(_))
        ));
    }
}
