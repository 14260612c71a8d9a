//! Sweep Task
//!
//! Background task that periodically removes dead state from a cache or a
//! set of rate limiters.

use std::future::Future;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::cache::SharedCache;
use crate::ratelimit::RateLimiters;

// == Sweep Trait ==
/// Something whose expired state can be purged in one pass.
pub trait Sweep: Clone + Send + Sync + 'static {
    /// Removes expired state. Returns how many items were dropped.
    fn sweep(&self) -> impl Future<Output = usize> + Send;
}

impl<V> Sweep for SharedCache<V>
where
    V: Clone + Send + Sync + 'static,
{
    fn sweep(&self) -> impl Future<Output = usize> + Send {
        self.cleanup_expired()
    }
}

impl Sweep for RateLimiters {
    fn sweep(&self) -> impl Future<Output = usize> + Send {
        self.cleanup()
    }
}

// == Sweep Handle ==
/// Owner of a running sweep task.
#[derive(Debug)]
pub struct SweepHandle {
    label: &'static str,
    handle: JoinHandle<()>,
}

impl SweepHandle {
    /// Stops the sweep. A pass already in progress is cancelled at its next
    /// await point. Dropping the handle stops it too.
    pub fn stop(self) {
        debug!(task = self.label, "sweep task stopped");
    }

    pub fn label(&self) -> &'static str {
        self.label
    }
}

impl Drop for SweepHandle {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Spawns a task that sweeps `target` every `interval`.
///
/// The first pass runs one `interval` after spawning. The task loops until
/// its [`SweepHandle`] is stopped.
///
/// # Example
/// ```ignore
/// let handle = spawn_sweep_task(cache.clone(), Duration::from_secs(600), "cache");
/// // Later, during shutdown:
/// handle.stop();
/// ```
pub fn spawn_sweep_task<S: Sweep>(target: S, interval: Duration, label: &'static str) -> SweepHandle {
    let handle = tokio::spawn(async move {
        info!(task = label, interval_secs = interval.as_secs_f64(), "starting sweep task");

        loop {
            tokio::time::sleep(interval).await;

            let removed = target.sweep().await;

            if removed > 0 {
                info!(task = label, removed, "sweep removed expired items");
            } else {
                debug!(task = label, "sweep found nothing to remove");
            }
        }
    });

    SweepHandle { label, handle }
}
