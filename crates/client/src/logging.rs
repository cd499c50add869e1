//! Logging to stderr and to a per-session file.
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::Result;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

const LOG_FILE: &str = "agent.log";

/// Installs the global subscriber.
///
/// `RUST_LOG` directives apply on top of the default level, which is `info`,
/// or `debug` when `verbose` is set.
pub fn setup_logging(session_id: Option<&str>, verbose: bool) -> Result<()> {
    let session_id = session_id.map(str::to_owned).unwrap_or_else(|| {
        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or_default();
        format!("session_{}", timestamp)
    });

    let session_log_dir = log_dir().join(&session_id);
    std::fs::create_dir_all(&session_log_dir)?;

    let file_appender = tracing_appender::rolling::never(&session_log_dir, LOG_FILE);
    let (non_blocking_file, guard) = tracing_appender::non_blocking(file_appender);

    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    let env_filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();

    let stderr_layer = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);
    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking_file)
        .with_ansi(false);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(stderr_layer)
        .with(file_layer)
        .try_init()?;

    // The writer thread lives for the whole process.
    std::mem::forget(guard);

    tracing::info!("Logging initialized: session={}", session_id);
    tracing::info!("Log file: {}", session_log_dir.join(LOG_FILE).display());

    Ok(())
}

/// Platform cache directory for logs, e.g. `~/.cache/learner/logs` on Linux.
fn log_dir() -> PathBuf {
    directories::ProjectDirs::from("", "", "learner")
        .map(|dirs| dirs.cache_dir().to_path_buf())
        .unwrap_or_else(|| std::env::temp_dir().join("learner"))
        .join("logs")
}
