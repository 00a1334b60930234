//! Deferred deletion of request artifacts.
//!
//! Each successful conversion schedules one [`CleanupTask`] owning the paths
//! of the uploaded video and the generated GIF. The task sleeps for the
//! configured delay on the Tokio timer, then removes every path it owns. It is
//! detached from the request: it runs even if the client disconnected, and it
//! is never cancelled, so a later upload reusing the same file name can have
//! its files removed by an earlier request's task.

use std::io::ErrorKind;
use std::path::PathBuf;
use std::time::Duration;

use metrics::counter;
use tokio::fs;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::metrics::names;

/// Files to delete once the delay has elapsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CleanupTask {
    pub paths: Vec<PathBuf>,
    pub delay: Duration,
}

impl CleanupTask {
    /// Remove every owned path. Missing files are not an error.
    pub async fn run(self) {
        tokio::time::sleep(self.delay).await;

        for path in &self.paths {
            match fs::remove_file(path).await {
                Ok(()) => {
                    counter!(names::CLEANUP_DELETIONS_TOTAL, "outcome" => "deleted").increment(1);
                    debug!(path = %path.display(), "Deleted artifact");
                }
                Err(e) if e.kind() == ErrorKind::NotFound => {
                    counter!(names::CLEANUP_DELETIONS_TOTAL, "outcome" => "missing").increment(1);
                }
                Err(e) => {
                    counter!(names::CLEANUP_DELETIONS_TOTAL, "outcome" => "error").increment(1);
                    warn!(path = %path.display(), error = %e, "Failed to delete artifact");
                }
            }
        }
    }
}

/// Schedules [`CleanupTask`]s with a fixed delay.
#[derive(Debug, Clone)]
pub struct CleanupScheduler {
    delay: Duration,
}

impl CleanupScheduler {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    /// Spawn deletion of `paths` after the delay.
    ///
    /// The returned handle may be dropped; the task keeps running.
    pub fn schedule<I>(&self, paths: I) -> JoinHandle<()>
    where
        I: IntoIterator<Item = PathBuf>,
    {
        let task = CleanupTask {
            paths: paths.into_iter().collect(),
            delay: self.delay,
        };
        debug!(paths = ?task.paths, delay_ms = self.delay.as_millis() as u64, "Scheduled cleanup");
        tokio::spawn(task.run())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_deletes_all_paths_after_delay() {
        let dir = TempDir::new().unwrap();
        let video = dir.path().join("clip.mov");
        let gif = dir.path().join("clip.gif");
        fs::write(&video, b"video").await.unwrap();
        fs::write(&gif, b"gif").await.unwrap();

        let scheduler = CleanupScheduler::new(Duration::from_millis(200));
        let handle = scheduler.schedule([video.clone(), gif.clone()]);

        // Still present right after scheduling.
        assert!(video.exists());
        assert!(gif.exists());

        handle.await.unwrap();
        assert!(!video.exists());
        assert!(!gif.exists());
    }

    #[tokio::test]
    async fn test_missing_files_are_ignored() {
        let dir = TempDir::new().unwrap();
        let present = dir.path().join("present.gif");
        fs::write(&present, b"gif").await.unwrap();

        let scheduler = CleanupScheduler::new(Duration::ZERO);
        scheduler
            .schedule([dir.path().join("absent.mov"), present.clone()])
            .await
            .unwrap();

        assert!(!present.exists());
    }

    #[tokio::test]
    async fn test_runs_when_handle_is_dropped() {
        let dir = TempDir::new().unwrap();
        let gif = dir.path().join("detached.gif");
        fs::write(&gif, b"gif").await.unwrap();

        drop(CleanupScheduler::new(Duration::from_millis(10)).schedule([gif.clone()]));

        for _ in 0..200 {
            if !gif.exists() {
                return;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        panic!("artifact was not deleted");
    }
}
