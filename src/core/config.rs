//! # Manager configuration.
//!
//! Provides [`ManagerConfig`] the reaper settings of a [`WorkerManager`](crate::WorkerManager).
//!
//! ## Eviction rules
//! On every `clean_interval` tick a worker is evicted when either holds:
//! - it was acknowledged and is no longer running;
//! - it is older than `timeout`, whatever its state.

use std::time::Duration;

/// Smallest tick accepted by the reaper (`tokio::time::interval` rejects zero).
const MIN_CLEAN_INTERVAL: Duration = Duration::from_millis(1);

/// Reaper configuration for the manager.
///
/// ## Field semantics
/// - `clean_interval`: Period of the reaper sweep (`0` is clamped to 1ms)
/// - `timeout`: Maximum age of a worker before it is terminated and removed
///
/// # Example
/// ```
/// use std::time::Duration;
/// use workvisor::ManagerConfig;
///
/// let mut cfg = ManagerConfig::default();
/// cfg.clean_interval = Duration::from_millis(100);
/// cfg.timeout = Duration::from_secs(60);
///
/// assert_eq!(cfg.clean_interval_clamped(), Duration::from_millis(100));
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ManagerConfig {
    /// Period of the reaper sweep.
    pub clean_interval: Duration,

    /// Maximum worker age, measured from creation.
    ///
    /// A worker older than this is force-terminated and removed on the next sweep,
    /// even if it is still running or was never acknowledged.
    pub timeout: Duration,
}

impl ManagerConfig {
    /// Returns the sweep period clamped to a minimum of 1ms.
    #[inline]
    pub fn clean_interval_clamped(&self) -> Duration {
        self.clean_interval.max(MIN_CLEAN_INTERVAL)
    }

    /// Returns a copy with the given sweep period.
    pub fn with_clean_interval(mut self, clean_interval: Duration) -> Self {
        self.clean_interval = clean_interval;
        self
    }

    /// Returns a copy with the given maximum age.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl Default for ManagerConfig {
    /// Default configuration:
    ///
    /// - `clean_interval = 10s`
    /// - `timeout = 25h` (a little over a day)
    fn default() -> Self {
        Self {
            clean_interval: Duration::from_secs(10),
            timeout: Duration::from_secs(25 * 60 * 60),
        }
    }
}
