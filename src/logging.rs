//! Tracing setup.
//!
//! The TUI owns the terminal, so interactive runs log to a daily-rotating
//! file; one-shot subcommands log to stderr.

use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const LOG_ENV: &str = "ORDASH_LOG";

fn env_filter(default_level: &str) -> EnvFilter {
  EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default_level))
}

/// Log to `<log_dir>/ordash.log.<date>`.
///
/// Keep the returned guard alive for the life of the program, otherwise
/// buffered lines are lost on exit.
pub fn init_file(default_level: &str, log_dir: &Path) -> WorkerGuard {
  let file_appender = tracing_appender::rolling::daily(log_dir, "ordash.log");
  let (writer, guard) = tracing_appender::non_blocking(file_appender);

  tracing_subscriber::registry()
    .with(env_filter(default_level))
    .with(
      fmt::layer()
        .with_writer(writer)
        .with_ansi(false)
        .with_target(true),
    )
    .init();

  guard
}

pub fn init_stderr(default_level: &str) {
  tracing_subscriber::registry()
    .with(env_filter(default_level))
    .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
    .init();
}
