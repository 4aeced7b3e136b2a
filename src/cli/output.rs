//! Output formatting and progress indicators
//!
//! This module provides utilities for displaying progress spinners,
//! status messages and errors to the user. Everything except the dry-run
//! diff goes to stderr.

use indicatif::{ProgressBar, ProgressStyle};
use tracing_subscriber::EnvFilter;

use crate::core::requirements::Change;
use crate::core::update::PackageChange;

/// Create a spinner for operations with unknown duration
///
/// The spinner draws on stderr and stays hidden when stderr is not a terminal.
pub fn create_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner()
        .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏")
        .template("{spinner:.blue} {msg}")
    {
        pb.set_style(style);
    }
    pb.set_message(message.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(80));
    pb
}

/// Log filter for a `-v` count, unless `RUST_LOG` says otherwise
pub fn log_filter(verbose: u8) -> EnvFilter {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level))
}

/// Install the tracing subscriber writing to stderr
pub fn init_tracing(verbose: u8) {
    tracing_subscriber::fmt()
        .with_env_filter(log_filter(verbose))
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Print an error chain as a single `✗` line
pub fn display_error(error: &anyhow::Error) {
    eprintln!("{} {}", status::ERROR, format_error(error));
}

/// Error chain joined with `: `
pub fn format_error(error: &anyhow::Error) -> String {
    error
        .chain()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(": ")
}

/// One summary line for a reconciled package
pub fn format_change(change: &PackageChange) -> String {
    match &change.change {
        Change::Unchanged => format!(
            "{} {}=={} already up to date",
            status::INFO,
            change.name,
            change.version
        ),
        Change::Updated { old_version } if *old_version == change.version => format!(
            "{} {}=={} hashes updated",
            status::SUCCESS,
            change.name,
            change.version
        ),
        Change::Updated { old_version } => format!(
            "{} {} {old_version} -> {}",
            status::SUCCESS,
            change.name,
            change.version
        ),
        Change::Added => format!(
            "{} {}=={} added",
            status::SUCCESS,
            change.name,
            change.version
        ),
    }
}

/// Status message prefixes
pub mod status {
    /// Success prefix (green checkmark)
    pub const SUCCESS: &str = "✓";

    /// Error prefix (red X)
    pub const ERROR: &str = "✗";

    /// Info prefix (blue circle)
    pub const INFO: &str = "ℹ";
}
