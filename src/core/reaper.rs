//! # Timeout reaper: periodic eviction of finished or stale workers.
//!
//! ```text
//! every clean_interval:
//!   registry.evict(timeout, now)          (one critical section)
//!     ├─ acknowledged && !running  ─► Acknowledged
//!     └─ age > timeout             ─► TimedOut
//!   for each evicted: control.terminate()  (outside the lock)
//! ```
//!
//! ## Rules
//! - The first sweep happens one full interval after start.
//! - The task is bound to the manager's [`CancellationToken`]; it stops on
//!   `WorkerManager::shutdown` or when the manager is dropped, never on its own.

use std::sync::Arc;
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::select;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::core::registry::Registry;

/// Periodic sweeper over the registry.
pub(crate) struct Reaper {
    pub registry: Arc<Registry>,
    pub clean_interval: Duration,
    pub timeout: Duration,
}

impl Reaper {
    /// Spawns the sweep loop on `rt`; it runs until `token` is cancelled.
    pub fn spawn(self, rt: &Handle, token: CancellationToken) -> JoinHandle<()> {
        rt.spawn(self.run(token))
    }

    async fn run(self, token: CancellationToken) {
        let mut ticker = time::interval_at(Instant::now() + self.clean_interval, self.clean_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            select! {
                _ = token.cancelled() => break,
                _ = ticker.tick() => {
                    self.sweep();
                }
            }
        }
        debug!("reaper stopped");
    }

    /// Evicts and terminates every eligible worker; returns how many were evicted.
    pub fn sweep(&self) -> usize {
        let evicted = self.registry.evict(self.timeout, Instant::now());
        let count = evicted.len();
        for worker in evicted {
            worker.control.terminate();
            info!(worker = %worker.id, reason = worker.reason.as_label(), "worker reaped");
        }
        count
    }
}
