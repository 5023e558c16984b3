//! CLI command implementations.
//!
//! Each command is implemented in its own module.
//! Commands orchestrate the various library components to perform user tasks.

pub mod inspect;
pub mod models;
pub mod scan;
pub mod utils;

// Re-export main command functions
pub use inspect::execute_inspect;
pub use models::{MailArgs, ScanArgs, ScanOutcome};
pub use scan::{deliver_reports, execute_scan, scan_file, validate_args};
pub use utils::display_version;
