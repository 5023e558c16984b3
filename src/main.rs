//! Trace Digest CLI
//!
//! Scans application logs for Java stack traces, groups recurring exceptions
//! and writes (and optionally mails) a ranked report per log file.

use anyhow::Result;
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use env_logger::Env;
use std::path::PathBuf;

use trace_digest::aggregator::AggregateScope;
use trace_digest::commands::{
    deliver_reports, display_version, execute_inspect, execute_scan, validate_args, MailArgs,
    ScanArgs,
};
use trace_digest::mail::{SmtpMailer, SmtpSettings};
use trace_digest::utils::config::{
    DEFAULT_INPUT_DIR, DEFAULT_OUTPUT_DIR, DEFAULT_SMTP_HOST, DEFAULT_SMTP_PORT, SMTP_PASSWORD_ENV,
};

/// Trace Digest - ranked Java exception reports from application logs
#[derive(Parser, Debug)]
#[command(name = "trace-digest")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Scan a log directory, write one report per file and mail them
    Scan {
        /// Directory searched (recursively) for log files
        #[arg(short, long, default_value = DEFAULT_INPUT_DIR)]
        input: PathBuf,

        /// Directory receiving the reports
        #[arg(short, long, default_value = DEFAULT_OUTPUT_DIR)]
        output: PathBuf,

        /// Only scan files whose path contains this text
        #[arg(short, long, default_value = "")]
        filter: String,

        /// Ignore activity before this date (YYYY-MM-DD, defaults to today)
        #[arg(long)]
        since: Option<NaiveDate>,

        /// Keep exception groups for the whole run or reset them per file
        #[arg(long, value_enum, default_value_t = AggregateScope::Run)]
        scope: AggregateScope,

        /// Skip files that fail to process instead of aborting
        #[arg(long)]
        keep_going: bool,

        /// Also write a JSON summary next to each report
        #[arg(long)]
        json: bool,

        /// Comma-separated list of report recipients
        #[arg(short, long, value_delimiter = ',')]
        receivers: Vec<String>,

        /// Sender address (also the SMTP login)
        #[arg(short, long, env = "TRACE_DIGEST_SENDER")]
        sender: Option<String>,

        /// SMTP relay host (STARTTLS)
        #[arg(long, env = "TRACE_DIGEST_SMTP_HOST", default_value = DEFAULT_SMTP_HOST)]
        smtp_host: String,

        /// SMTP relay port
        #[arg(long, env = "TRACE_DIGEST_SMTP_PORT", default_value_t = DEFAULT_SMTP_PORT)]
        smtp_port: u16,

        /// SMTP password
        #[arg(long, env = SMTP_PASSWORD_ENV, hide_env_values = true)]
        smtp_password: Option<String>,

        /// Write reports without mailing them
        #[arg(long)]
        no_mail: bool,
    },

    /// Print the exception report of a single log file
    Inspect {
        /// Log file to scan
        file: PathBuf,

        /// Ignore activity before this date (YYYY-MM-DD, defaults to today)
        #[arg(long)]
        since: Option<NaiveDate>,
    },

    /// Display version information
    Version,
}

fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Setup logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(log_level)).init();

    // Execute command
    match cli.command {
        Commands::Scan {
            input,
            output,
            filter,
            since,
            scope,
            keep_going,
            json,
            receivers,
            sender,
            smtp_host,
            smtp_port,
            smtp_password,
            no_mail,
        } => {
            let mail = match (no_mail || receivers.is_empty(), sender) {
                (true, _) => None,
                (false, None) => anyhow::bail!("--sender is required when mailing reports"),
                (false, Some(sender)) => Some(MailArgs {
                    recipients: receivers,
                    smtp: SmtpSettings {
                        host: smtp_host,
                        port: smtp_port,
                        sender,
                        password: smtp_password,
                    },
                }),
            };

            let args = ScanArgs {
                input_dir: input,
                output_dir: output,
                filter,
                cutoff: since.unwrap_or_else(today),
                scope,
                keep_going,
                write_json: json,
                mail,
            };

            // Validate args first
            validate_args(&args)?;

            // Build the mailer before scanning so a missing password fails fast
            let mailer = args
                .mail
                .as_ref()
                .map(|mail| SmtpMailer::new(mail.smtp.clone()))
                .transpose()?;

            let outcome = execute_scan(&args)?;

            if let (Some(mailer), Some(mail)) = (&mailer, &args.mail) {
                deliver_reports(mailer, mail, &outcome.reports)?;
            }

            if !outcome.failed.is_empty() {
                anyhow::bail!("{} log files could not be processed", outcome.failed.len());
            }
        }

        Commands::Inspect { file, since } => {
            let report = execute_inspect(&file, since.unwrap_or_else(today))?;
            if report.is_empty() {
                println!("No exceptions found in {}", file.display());
            } else {
                print!("{}", report);
            }
        }

        Commands::Version => {
            display_version();
        }
    }

    Ok(())
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}
