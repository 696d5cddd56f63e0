use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};
use tokio::sync::watch;
use tokio::time::sleep;
use tracing::{info, warn};

/// Safety net for files whose scheduled deletion never ran: crashed
/// requests, orphaned multi-file inputs, process restarts. Sweeps the
/// upload directory for the lifetime of the process and removes anything
/// older than the retention threshold.
pub struct Reaper {
    root: PathBuf,
    retention: Duration,
    interval: Duration,
    shutdown: watch::Receiver<bool>,
}

impl Reaper {
    pub fn new(
        root: impl Into<PathBuf>,
        retention: Duration,
        interval: Duration,
        shutdown: watch::Receiver<bool>,
    ) -> Self {
        Self {
            root: root.into(),
            retention,
            interval,
            shutdown,
        }
    }

    pub async fn run(mut self) {
        info!(
            "reaper started: retention {}s, sweeping every {}s",
            self.retention.as_secs(),
            self.interval.as_secs()
        );

        loop {
            match sweep(&self.root, self.retention).await {
                Ok(0) => {}
                Ok(removed) => info!("reaper removed {} stale file(s)", removed),
                Err(e) => warn!("reaper sweep failed: {}", e),
            }

            tokio::select! {
                _ = self.shutdown.changed() => {
                    info!("reaper shutting down");
                    break;
                }
                _ = sleep(self.interval) => {}
            }
        }
    }
}

/// Remove every file in `root` whose mtime age exceeds `retention`.
/// Failures on individual entries are logged and skipped; the rest of the
/// sweep continues. Returns the number of files removed.
pub async fn sweep(root: &Path, retention: Duration) -> std::io::Result<usize> {
    let now = SystemTime::now();
    let mut removed = 0;

    let mut entries = tokio::fs::read_dir(root).await?;
    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();

        let metadata = match entry.metadata().await {
            Ok(m) => m,
            Err(e) => {
                warn!("reaper cannot stat {}: {}", path.display(), e);
                continue;
            }
        };
        if !metadata.is_file() {
            continue;
        }

        let age = metadata
            .modified()
            .ok()
            .and_then(|mtime| now.duration_since(mtime).ok())
            .unwrap_or_default();
        if age <= retention {
            continue;
        }

        match tokio::fs::remove_file(&path).await {
            Ok(()) => removed += 1,
            // Lost the race against a scheduled deletion; the file is gone either way.
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => warn!("reaper failed to remove {}: {}", path.display(), e),
        }
    }

    Ok(removed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_sweep_removes_only_stale_files() {
        let dir = tempfile::tempdir().unwrap();
        let stale = dir.path().join("stale.pdf");
        tokio::fs::write(&stale, b"old").await.unwrap();

        tokio::time::sleep(Duration::from_millis(50)).await;

        // With a one-hour threshold nothing qualifies.
        let removed = sweep(dir.path(), Duration::from_secs(3600)).await.unwrap();
        assert_eq!(removed, 0);
        assert!(stale.exists());

        // With a zero threshold the file is past retention.
        let removed = sweep(dir.path(), Duration::ZERO).await.unwrap();
        assert_eq!(removed, 1);
        assert!(!stale.exists());
    }

    #[tokio::test]
    async fn test_sweep_skips_directories() {
        let dir = tempfile::tempdir().unwrap();
        tokio::fs::create_dir(dir.path().join("nested")).await.unwrap();
        let file = dir.path().join("doc.pdf");
        tokio::fs::write(&file, b"x").await.unwrap();

        tokio::time::sleep(Duration::from_millis(50)).await;

        let removed = sweep(dir.path(), Duration::ZERO).await.unwrap();
        assert_eq!(removed, 1);
        assert!(dir.path().join("nested").exists());
    }

    #[tokio::test]
    async fn test_sweep_of_missing_root_errors() {
        let dir = tempfile::tempdir().unwrap();
        let gone = dir.path().join("never-created");
        assert!(sweep(&gone, Duration::ZERO).await.is_err());
    }

    #[tokio::test]
    async fn test_run_stops_on_shutdown() {
        let dir = tempfile::tempdir().unwrap();
        let (tx, rx) = watch::channel(false);
        let reaper = Reaper::new(
            dir.path(),
            Duration::from_secs(3600),
            Duration::from_secs(3600),
            rx,
        );

        let handle = tokio::spawn(reaper.run());
        tx.send(true).unwrap();
        tokio::time::timeout(Duration::from_secs(1), handle)
            .await
            .expect("reaper did not stop on shutdown signal")
            .unwrap();
    }
}
