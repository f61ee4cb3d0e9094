//! Builds the logging handle handed to the client and the job.
//!
//! Events go to stdout and to a log file that is truncated on every run.
//! The handle is a [`Dispatch`], so callers decide whether it also becomes
//! the process-wide default.

use std::{fs::File, io, path::Path, sync::Mutex};

use tracing::Dispatch;
use tracing_subscriber::{fmt, layer::SubscriberExt, EnvFilter};

/// Filter used when `RUST_LOG` is unset or unparsable.
pub const DEFAULT_FILTER: &str = "debug";

fn env_filter(default_filter: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter))
}

/// Stdout plus `log_file`, which is created or truncated.
pub fn stdout_and_file(log_file: &Path, default_filter: &str) -> io::Result<Dispatch> {
    let file = File::create(log_file)?;
    let subscriber = tracing_subscriber::registry()
        .with(env_filter(default_filter))
        .with(fmt::layer().with_target(false))
        .with(
            fmt::layer()
                .with_target(false)
                .with_ansi(false)
                .with_writer(Mutex::new(file)),
        );
    Ok(Dispatch::new(subscriber))
}

/// Stdout only, for when the log file cannot be opened.
pub fn stdout_only(default_filter: &str) -> Dispatch {
    let subscriber = tracing_subscriber::registry()
        .with(env_filter(default_filter))
        .with(fmt::layer().with_target(false));
    Dispatch::new(subscriber)
}
