//! Configuration and constants for the CLI.

use std::time::Duration;

/// Default directory scanned for log files
pub const DEFAULT_INPUT_DIR: &str = "logs";

/// Default directory receiving the generated reports
pub const DEFAULT_OUTPUT_DIR: &str = "exception_logs";

/// Infix between the cutoff date and the original file name
pub const REPORT_NAME_INFIX: &str = "_exceptions_";

/// Width of the dashed rule closing each report entry
pub const REPORT_RULE_WIDTH: usize = 100;

/// Format of the timestamp prefix on log lines
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Format used for the cutoff date in report names and bodies
pub const CUTOFF_FORMAT: &str = "%Y-%m-%d";

/// Number of trailing timestamp characters kept per occurrence (`HH:MM:SS`)
pub const TIMESTAMP_SUFFIX_LEN: usize = 8;

/// Suffix recorded when a block was emitted before any timestamp was seen
pub const UNKNOWN_TIMESTAMP: &str = "unknown";

// Lines closing a block with this prefix continue the same logical exception
pub const CONTINUATION_PREFIX: &str = "java";

// SMTP defaults
pub const DEFAULT_SMTP_HOST: &str = "smtp.gmail.com";
pub const DEFAULT_SMTP_PORT: u16 = 587;
pub const SMTP_TIMEOUT: Duration = Duration::from_secs(30);
pub const SMTP_PASSWORD_ENV: &str = "TRACE_DIGEST_SMTP_PASSWORD";
pub const MAIL_SUBJECT: &str = "Exception digest";
pub const MAIL_BODY: &str = "Exception reports for the scanned logs are attached.";
