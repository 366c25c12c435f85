use once_cell::sync::OnceCell;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use super::cleanup::cleanup_old_logs;
use crate::application::config::configuration::Configuration;

// Keeps the non-blocking writer flushing for the lifetime of the process.
static LOGGER_GUARD: OnceCell<WorkerGuard> = OnceCell::new();

const LOG_FILE_PREFIX: &str = "ghostwriter.log";
const CLEANUP_INTERVAL: Duration = Duration::from_secs(24 * 60 * 60);

/// Installs the global subscriber: an env-filtered stdout layer plus a daily
/// rolling file under the configured data directory. Returns false when the
/// log directory cannot be created or a subscriber is installed already.
pub fn tracing_subscribe(config: &Configuration) -> bool {
    let log_dir = config.log_dir();
    if let Err(err) = std::fs::create_dir_all(&log_dir) {
        warn!("failed to create the log directory {:?}: {}", log_dir, err);
        return false;
    }

    let (file_writer, guard) = tracing_appender::non_blocking(tracing_appender::rolling::daily(
        &log_dir,
        LOG_FILE_PREFIX,
    ));
    _ = LOGGER_GUARD.set(guard);

    let stdout_layer = fmt::layer()
        .with_filter(EnvFilter::from_default_env().add_directive("hyper=off".parse().unwrap()));
    let file_layer = fmt::layer().with_writer(file_writer).with_ansi(false);
    let installed = tracing_subscriber::registry()
        .with(file_layer)
        .with(stdout_layer)
        .try_init()
        .is_ok();

    if installed {
        spawn_cleanup_task(log_dir);
    }
    installed
}

fn spawn_cleanup_task(log_dir: PathBuf) {
    tokio::task::spawn(async move {
        loop {
            tokio::time::sleep(CLEANUP_INTERVAL).await;
            if let Err(err) = cleanup_old_logs(&log_dir).await {
                warn!("pruning old logs failed: {}", err);
            }
        }
    });
    debug!("log cleanup task started");
}
