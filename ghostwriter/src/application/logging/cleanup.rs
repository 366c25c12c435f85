use std::path::Path;
use std::time::{Duration, SystemTime};
use tokio::fs;
use tracing::{debug, warn};

const MAX_LOG_AGE_DAYS: u64 = 7;

/// Removes rotated log files which are older than a week, the daily
/// appender never deletes anything on its own.
pub async fn cleanup_old_logs(log_dir: impl AsRef<Path>) -> anyhow::Result<()> {
    let log_dir = log_dir.as_ref();
    if !log_dir.exists() {
        return Ok(());
    }

    let max_age = Duration::from_secs(MAX_LOG_AGE_DAYS * 24 * 60 * 60);
    let now = SystemTime::now();

    let mut read_dir = fs::read_dir(log_dir).await?;
    while let Ok(Some(entry)) = read_dir.next_entry().await {
        let path = entry.path();
        let modified_time = match fs::metadata(&path).await {
            Ok(metadata) => match metadata.modified() {
                Ok(modified_time) => modified_time,
                Err(_) => continue,
            },
            Err(_) => continue,
        };
        let age = match now.duration_since(modified_time) {
            Ok(age) => age,
            Err(_) => continue,
        };
        if age > max_age {
            match fs::remove_file(&path).await {
                Ok(_) => debug!("removed old log file: {:?}", path),
                Err(e) => warn!("failed to remove old log file {:?}: {}", path, e),
            }
        }
    }

    Ok(())
}
