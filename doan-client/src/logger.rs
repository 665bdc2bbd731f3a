//! Logging Infrastructure
//!
//! Structured logging setup. The console draws its menus on stdout, so when a
//! log directory exists all log output goes to a daily rolling file instead.

use std::path::Path;

use tracing_subscriber::EnvFilter;

/// Initialize the logger at `info`, writing to stderr
pub fn init_logger() {
    init_logger_with_file(None, None);
}

/// Initialize the logger with optional file output.
///
/// `RUST_LOG` takes precedence over `log_level`. Returns `false` when a
/// global subscriber was already installed.
pub fn init_logger_with_file(log_level: Option<&str>, log_dir: Option<&Path>) -> bool {
    let level = log_level.unwrap_or("info");
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_file(false)
        .with_line_number(false)
        .with_thread_ids(false)
        .with_target(false);

    if let Some(dir) = log_dir.filter(|d| d.exists()) {
        let file_appender = tracing_appender::rolling::daily(dir, "doan-admin.log");
        return subscriber
            .with_ansi(false)
            .with_writer(file_appender)
            .try_init()
            .is_ok();
    }

    subscriber.with_writer(std::io::stderr).try_init().is_ok()
}
