//! # Caller-side worker handle.

use std::fmt;
use std::sync::{Arc, Weak};

use crate::core::registry::Registry;
use crate::runtime::{WorkerControl, WorkerId};

/// Reference to one created worker, returned by
/// [`WorkerManager::create`](crate::WorkerManager::create) and passed to every callback.
///
/// The handle never exposes the record itself; read state through the manager's
/// accessors. It holds the registry weakly, so it does not keep a dropped
/// manager's bookkeeping alive.
#[derive(Clone)]
pub struct WorkerHandle {
    id: WorkerId,
    registry: Weak<Registry>,
    control: Arc<dyn WorkerControl>,
}

impl WorkerHandle {
    pub(crate) fn new(id: WorkerId, registry: &Arc<Registry>, control: Arc<dyn WorkerControl>) -> Self {
        Self {
            id,
            registry: Arc::downgrade(registry),
            control,
        }
    }

    /// Returns the worker's id.
    pub fn id(&self) -> WorkerId {
        self.id
    }

    /// Signals that the worker's final state has been consumed.
    ///
    /// Once the worker is also no longer running, the reaper removes it on its
    /// next sweep. No-op if the worker was already removed.
    pub fn acknowledge(&self) {
        if let Some(registry) = self.registry.upgrade() {
            registry.update(self.id, |record| record.acknowledged = true);
        }
    }

    /// Force-stops the worker. Its record stays registered and receives the exit.
    pub fn terminate(&self) {
        self.control.terminate();
    }

    /// Returns true while the worker is still in the manager's registry.
    pub fn is_registered(&self) -> bool {
        self.registry
            .upgrade()
            .is_some_and(|registry| registry.contains(self.id))
    }
}

impl fmt::Debug for WorkerHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WorkerHandle").field("id", &self.id).finish_non_exhaustive()
    }
}
