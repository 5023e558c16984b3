use crate::aggregator::AggregateScope;
use crate::mail::SmtpSettings;
use crate::utils::config::{DEFAULT_INPUT_DIR, DEFAULT_OUTPUT_DIR};
use chrono::{Local, NaiveDate};
use std::path::PathBuf;

/// Arguments for the scan command
///
/// **Public** - used by main.rs to construct from CLI args
#[derive(Debug, Clone)]
pub struct ScanArgs {
    /// Directory walked for log files
    pub input_dir: PathBuf,

    /// Directory receiving the reports (created if absent)
    pub output_dir: PathBuf,

    /// Substring a log file path must contain
    pub filter: String,

    /// Activity before this date is ignored
    pub cutoff: NaiveDate,

    /// Lifetime of the aggregate state
    pub scope: AggregateScope,

    /// Log and skip files that fail instead of aborting the run
    pub keep_going: bool,

    /// Also write a JSON summary next to each report
    pub write_json: bool,

    /// Mail delivery (None = reports are only written to disk)
    pub mail: Option<MailArgs>,
}

impl Default for ScanArgs {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from(DEFAULT_INPUT_DIR),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            filter: String::new(),
            cutoff: Local::now().date_naive(),
            scope: AggregateScope::default(),
            keep_going: false,
            write_json: false,
            mail: None,
        }
    }
}

/// Where and how to mail the reports
#[derive(Debug, Clone)]
pub struct MailArgs {
    pub recipients: Vec<String>,
    pub smtp: SmtpSettings,
}

/// Result of a scan run
#[derive(Debug, Clone, Default)]
pub struct ScanOutcome {
    /// Text reports written, in scan order
    pub reports: Vec<PathBuf>,

    /// JSON summaries written
    pub summaries: Vec<PathBuf>,

    /// Log files skipped because of an error (only with keep_going)
    pub failed: Vec<PathBuf>,

    /// Distinct exception groups at the end of the run
    pub groups: usize,
}
