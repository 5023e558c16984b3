//! Scan command implementation.
//!
//! The scan command:
//! 1. Discovers log files under the input directory
//! 2. Extracts trace blocks from each file
//! 3. Aggregates them into exception groups
//! 4. Writes one ranked report per file
//! 5. Optionally mails all reports

use super::models::{MailArgs, ScanArgs, ScanOutcome};
use crate::aggregator::{rank, AggregateScope, AggregateState};
use crate::discovery::{discover_logs, LogFile};
use crate::mail::Mailer;
use crate::output::{render_report, report_path, write_report, write_summary, ExceptionSummary};
use crate::parser::{read_blocks, ExtractStats};
use anyhow::{Context, Result};
use chrono::NaiveDate;
use log::{debug, error, info, warn};
use std::collections::HashSet;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Execute the scan command
///
/// **Public** - main entry point called from main.rs
///
/// Mail is not sent here; see `deliver_reports`.
///
/// # Errors
/// * Input directory missing or unreadable
/// * Output directory cannot be created
/// * Any per-file failure, unless `keep_going` is set
pub fn execute_scan(args: &ScanArgs) -> Result<ScanOutcome> {
    let start_time = Instant::now();

    info!(
        "Scanning {} for exceptions since {}",
        args.input_dir.display(),
        args.cutoff
    );

    let logs = discover_logs(&args.input_dir, &args.filter)
        .context("Failed to discover log files")?;

    std::fs::create_dir_all(&args.output_dir).with_context(|| {
        format!(
            "Failed to create output directory {}",
            args.output_dir.display()
        )
    })?;

    let mut state = AggregateState::new();
    let mut outcome = ScanOutcome::default();
    let mut used_reports = HashSet::new();

    for (i, log) in logs.iter().enumerate() {
        info!("[{}/{}] {}", i + 1, logs.len(), log.path.display());

        if args.scope == AggregateScope::File {
            state.clear();
        }

        let report = unique_report_path(
            report_path(&args.output_dir, args.cutoff, log),
            &mut used_reports,
        );

        // Groups of a file only reach `state` once its outputs are written
        let mut staged = state.clone();

        match process_log(log, args, &mut staged, &report) {
            Ok(summary) => {
                state = staged;
                outcome.reports.push(report);
                outcome.summaries.extend(summary);
            }
            Err(err) if args.keep_going => {
                warn!("Skipping {}: {:#}", log.path.display(), err);
                outcome.failed.push(log.path.clone());
            }
            Err(err) => {
                return Err(err.context(format!("Failed to process {}", log.path.display())))
            }
        }
    }

    outcome.groups = state.len();

    info!(
        "Scan completed in {:.2}s: {} reports, {} exception groups, {} failed files",
        start_time.elapsed().as_secs_f64(),
        outcome.reports.len(),
        outcome.groups,
        outcome.failed.len()
    );

    Ok(outcome)
}

/// Scan one file into `state`, then write its report (and JSON summary)
///
/// **Private** - internal helper for execute_scan
fn process_log(
    log: &LogFile,
    args: &ScanArgs,
    state: &mut AggregateState,
    report: &Path,
) -> Result<Option<PathBuf>> {
    let stats = scan_file(&log.path, args.cutoff, state)?;
    debug!(
        "{}: {} lines, {} skipped, {} trace blocks",
        log.path.display(),
        stats.lines_read,
        stats.lines_skipped,
        stats.blocks_emitted
    );

    let ranked = rank(state);
    write_report(&render_report(&log.path, args.cutoff, &ranked), report)
        .context("Failed to write report")?;

    let summary = if args.write_json {
        let mut name = report.as_os_str().to_os_string();
        name.push(".json");
        let path = PathBuf::from(name);

        write_summary(&ExceptionSummary::new(&log.path, args.cutoff, &ranked), &path)
            .context("Failed to write JSON summary")?;
        Some(path)
    } else {
        None
    };

    Ok(summary)
}

/// Give `path` a numeric suffix if an earlier file of this run already claimed it
///
/// Flattened names collide for e.g. `a/b.log` and `a_b.log`.
fn unique_report_path(path: PathBuf, used: &mut HashSet<PathBuf>) -> PathBuf {
    if used.insert(path.clone()) {
        return path;
    }

    let mut n = 2;
    loop {
        let mut name = path.as_os_str().to_os_string();
        name.push(format!("_{}", n));
        let candidate = PathBuf::from(name);
        if used.insert(candidate.clone()) {
            warn!(
                "Report name {} already used in this run, writing {}",
                path.display(),
                candidate.display()
            );
            return candidate;
        }
        n += 1;
    }
}

/// Extract and aggregate every trace block of one log file
///
/// **Public** - shared with the inspect command
///
/// Blocks are only registered once the whole file has been read, so a file
/// that fails half way leaves `state` untouched.
pub fn scan_file(path: &Path, cutoff: NaiveDate, state: &mut AggregateState) -> Result<ExtractStats> {
    let file = File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;

    let (blocks, stats) = read_blocks(BufReader::new(file), cutoff)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    state
        .register_all(&blocks)
        .context("Failed to aggregate trace blocks")?;

    Ok(stats)
}

/// Mail the written reports
///
/// **Public** - called from main.rs after execute_scan
///
/// A failure is logged and returned; reports already on disk stay there.
pub fn deliver_reports(mailer: &dyn Mailer, mail: &MailArgs, reports: &[PathBuf]) -> Result<()> {
    if reports.is_empty() {
        info!("No reports to mail");
        return Ok(());
    }

    mailer
        .send_reports(&mail.recipients, reports)
        .map_err(|err| {
            error!("Mail delivery failed: {}", err);
            err
        })
        .context("Failed to mail reports (reports remain on disk)")?;

    info!("✓ Mailed {} reports to {}", reports.len(), mail.recipients.join(", "));

    Ok(())
}

/// Validate scan arguments
///
/// **Public** - can be called before execute_scan for early validation
pub fn validate_args(args: &ScanArgs) -> Result<()> {
    if args.input_dir.as_os_str().is_empty() {
        anyhow::bail!("Input directory cannot be empty");
    }

    if args.output_dir.as_os_str().is_empty() {
        anyhow::bail!("Output directory cannot be empty");
    }

    if args.output_dir.starts_with(&args.input_dir) {
        warn!(
            "Output directory {} is inside the input directory; reports will be scanned on the next run",
            args.output_dir.display()
        );
    }

    if let Some(mail) = &args.mail {
        if mail.recipients.is_empty() {
            anyhow::bail!("At least one recipient is required to send mail");
        }

        if let Some(bad) = mail.recipients.iter().find(|r| !r.contains('@')) {
            anyhow::bail!("Invalid recipient address: {}", bad);
        }

        if !mail.smtp.sender.contains('@') {
            anyhow::bail!("Invalid sender address: {}", mail.smtp.sender);
        }

        if mail.smtp.host.is_empty() {
            anyhow::bail!("SMTP host cannot be empty");
        }
    }

    Ok(())
}
