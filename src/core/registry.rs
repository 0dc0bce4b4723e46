//! # Worker registry - single table of live workers.
//!
//! Each entry pairs the runtime's control handle with the worker's record, so the
//! two can never drift apart.
//!
//! ## Architecture
//! ```text
//! WorkerManager::create ──► insert(record, control)
//! Relay (per worker)    ──► update(id, |record| record.apply(event))
//! WorkerHandle          ──► update(id, |record| record.acknowledged = true)
//! Reaper (interval)     ──► evict(timeout, now) ──► terminate controls
//! WorkerManager::remove ──► remove(id)
//! Accessors             ──► snapshot / read / list (clones)
//! ```
//!
//! ## Rules
//! - Every operation is one critical section on one mutex: a transition and an
//!   eviction of the same worker never interleave.
//! - Nothing awaits or calls user code while the lock is held.
//! - Controls are returned out of the lock; callers terminate them afterwards.
//! - A removed id is gone for good; later updates for it return `None`.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::time::Instant;

use crate::core::record::WorkerRecord;
use crate::runtime::{WorkerControl, WorkerId};

/// One registered worker.
struct Entry {
    /// Runtime control handle.
    control: Arc<dyn WorkerControl>,
    /// Mutable metadata.
    record: WorkerRecord,
    /// Creation instant on the tokio clock (used for age checks).
    started_at: Instant,
}

/// Why the reaper evicted a worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum EvictReason {
    /// Acknowledged by the caller and no longer running.
    Acknowledged,
    /// Older than the configured timeout.
    TimedOut,
}

impl EvictReason {
    pub(crate) fn as_label(&self) -> &'static str {
        match self {
            EvictReason::Acknowledged => "acknowledged",
            EvictReason::TimedOut => "timed_out",
        }
    }
}

/// A worker removed by [`Registry::evict`], still to be terminated.
pub(crate) struct Evicted {
    pub id: WorkerId,
    pub control: Arc<dyn WorkerControl>,
    pub reason: EvictReason,
}

/// Synchronized table of live workers.
#[derive(Default)]
pub(crate) struct Registry {
    workers: Mutex<HashMap<WorkerId, Entry>>,
}

impl Registry {
    /// Creates an empty registry.
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Registers a worker. Returns false (and keeps the old entry) if `id` is taken.
    pub fn insert(&self, record: WorkerRecord, control: Arc<dyn WorkerControl>) -> bool {
        let mut workers = self.lock();
        if workers.contains_key(&record.id) {
            return false;
        }
        workers.insert(
            record.id,
            Entry {
                control,
                record,
                started_at: Instant::now(),
            },
        );
        true
    }

    /// Returns a copy of the record.
    pub fn snapshot(&self, id: WorkerId) -> Option<WorkerRecord> {
        self.read(id, WorkerRecord::clone)
    }

    /// Projects the record without copying all of it.
    pub fn read<R>(&self, id: WorkerId, f: impl FnOnce(&WorkerRecord) -> R) -> Option<R> {
        self.lock().get(&id).map(|e| f(&e.record))
    }

    /// Mutates the record in place; `None` if the worker is not registered.
    pub fn update<R>(&self, id: WorkerId, f: impl FnOnce(&mut WorkerRecord) -> R) -> Option<R> {
        self.lock().get_mut(&id).map(|e| f(&mut e.record))
    }

    /// Returns copies of all records, ordered by id.
    pub fn list(&self) -> Vec<WorkerRecord> {
        let mut records: Vec<WorkerRecord> =
            self.lock().values().map(|e| e.record.clone()).collect();
        records.sort_unstable_by_key(|r| r.id);
        records
    }

    /// Returns the control handle of a registered worker.
    pub fn control(&self, id: WorkerId) -> Option<Arc<dyn WorkerControl>> {
        self.lock().get(&id).map(|e| Arc::clone(&e.control))
    }

    /// Returns true if `id` is registered.
    pub fn contains(&self, id: WorkerId) -> bool {
        self.lock().contains_key(&id)
    }

    /// Atomically detaches a worker, returning its control handle.
    pub fn remove(&self, id: WorkerId) -> Option<Arc<dyn WorkerControl>> {
        self.lock().remove(&id).map(|e| e.control)
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Removes every acknowledged-and-stopped or expired worker in one critical section.
    pub fn evict(&self, timeout: Duration, now: Instant) -> Vec<Evicted> {
        let mut workers = self.lock();
        let doomed: Vec<(WorkerId, EvictReason)> = workers
            .iter()
            .filter_map(|(id, e)| {
                if e.record.acknowledged && !e.record.running {
                    Some((*id, EvictReason::Acknowledged))
                } else if now.saturating_duration_since(e.started_at) > timeout {
                    Some((*id, EvictReason::TimedOut))
                } else {
                    None
                }
            })
            .collect();

        doomed
            .into_iter()
            .filter_map(|(id, reason)| {
                workers.remove(&id).map(|e| Evicted {
                    id,
                    control: e.control,
                    reason,
                })
            })
            .collect()
    }

    /// Every critical section leaves the map consistent, so a poisoned lock is still usable.
    fn lock(&self) -> MutexGuard<'_, HashMap<WorkerId, Entry>> {
        self.workers.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
