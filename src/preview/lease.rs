use std::time::Duration;

use tokio::task::JoinHandle;

/// A presented document whose resource is released after a grace delay.
///
/// The release runs on its own task; dropping the lease does not cancel it.
#[derive(Debug)]
pub struct PreviewLease {
    grace: Duration,
    release: JoinHandle<()>,
}

impl PreviewLease {
    /// Spawn the release of `handle` after `grace`.
    pub fn schedule<H: Send + 'static>(handle: H, grace: Duration) -> Self {
        let release = tokio::spawn(async move {
            tokio::time::sleep(grace).await;
            drop(handle);
            crate::debug!("preview"; "released after {}s", grace.as_secs());
        });
        Self { grace, release }
    }

    pub fn grace(&self) -> Duration {
        self.grace
    }

    /// Whether the resource has been released.
    pub fn is_released(&self) -> bool {
        self.release.is_finished()
    }

    /// Wait until the resource has been released.
    pub async fn released(self) {
        if let Err(e) = self.release.await {
            crate::debug!("preview"; "release task failed: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, Ordering};

    struct Flag(Arc<AtomicBool>);

    impl Drop for Flag {
        fn drop(&mut self) {
            self.0.store(true, Ordering::SeqCst);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_release_after_grace() {
        let dropped = Arc::new(AtomicBool::new(false));
        let lease = PreviewLease::schedule(Flag(dropped.clone()), Duration::from_secs(60));

        tokio::time::sleep(Duration::from_secs(59)).await;
        assert!(!dropped.load(Ordering::SeqCst));

        lease.released().await;
        assert!(dropped.load(Ordering::SeqCst));
    }

    #[tokio::test(start_paused = true)]
    async fn test_lease_debug_shows_grace() {
        let lease = PreviewLease::schedule((), Duration::from_secs(5));
        let shown = format!("{lease:?}");
        assert!(shown.starts_with("PreviewLease"));
        assert!(shown.contains("5s"));
        lease.released().await;
    }
}
