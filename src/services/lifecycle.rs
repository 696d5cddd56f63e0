use std::io::ErrorKind;
use std::path::PathBuf;
use std::time::Duration;
use tokio::time::{Instant, sleep_until};
use tracing::{debug, warn};

/// A batch of paths queued for removal once `not_before` has passed.
#[derive(Debug)]
pub struct PendingDeletion {
    pub paths: Vec<PathBuf>,
    pub not_before: Instant,
}

/// Schedules delayed removal of request files on detached tasks, so the
/// response path never waits and a cancelled request cannot cancel cleanup.
#[derive(Debug, Clone)]
pub struct LifecycleTracker {
    delay: Duration,
}

impl LifecycleTracker {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    /// Queue removal of `paths` after the configured delay. Must only be
    /// called once the response body has been handed off, so the delay
    /// covers the remaining stream time.
    pub fn schedule_removal(&self, paths: Vec<PathBuf>) {
        if paths.is_empty() {
            return;
        }
        let pending = PendingDeletion {
            paths,
            not_before: Instant::now() + self.delay,
        };
        tokio::spawn(async move {
            sleep_until(pending.not_before).await;
            remove_batch(&pending.paths).await;
        });
    }
}

/// Delete each path, tolerating races: a file already gone counts as
/// deleted, any other failure is logged and the batch continues.
pub async fn remove_batch(paths: &[PathBuf]) {
    for path in paths {
        match tokio::fs::remove_file(path).await {
            Ok(()) => debug!("removed {}", path.display()),
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => warn!("failed to remove {}: {}", path.display(), e),
        }
    }
}
