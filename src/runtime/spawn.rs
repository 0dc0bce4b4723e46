//! # Worker runtime seam.
//!
//! The manager never executes worker code itself. It asks a [`WorkerRuntime`] to
//! spawn a unit and then only consumes what the runtime hands back:
//!
//! ```text
//! WorkerRuntime::spawn(run_file, data) ──► SpawnedWorker
//!                                            ├─ id       (registry key)
//!                                            ├─ control  (terminate / unref)
//!                                            └─ events   (Online … Exit)
//! ```
//!
//! ## Rules
//! - Ids are unique for the lifetime of the runtime and never reused.
//! - The event stream must end with exactly one [`RuntimeEvent::Exit`].
//! - `terminate` must be idempotent and safe to call after the worker exited.

use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use tokio::sync::mpsc;

use crate::error::SpawnError;
use crate::events::{Payload, RuntimeEvent};
use crate::runtime::RunFile;

/// Identifier assigned by a runtime at spawn time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct WorkerId(u64);

impl WorkerId {
    /// Wraps a raw id.
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Returns the raw id.
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for WorkerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Control handle of one spawned worker.
pub trait WorkerControl: Send + Sync + 'static {
    /// Force-stops the worker. The runtime still emits its `Exit` event.
    fn terminate(&self);

    /// Marks the worker as not keeping the host alive.
    ///
    /// Tokio tasks never hold the process open, so the default does nothing.
    fn unref(&self) {}
}

/// Everything a runtime returns for a freshly spawned worker.
pub struct SpawnedWorker {
    /// Runtime-assigned identifier.
    pub id: WorkerId,
    /// Terminate/unref handle.
    pub control: Arc<dyn WorkerControl>,
    /// Lifecycle events of this worker, in emission order.
    pub events: mpsc::UnboundedReceiver<RuntimeEvent>,
}

impl fmt::Debug for SpawnedWorker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SpawnedWorker").field("id", &self.id).finish_non_exhaustive()
    }
}

/// Something that can start isolated workers.
pub trait WorkerRuntime: Send + Sync + 'static {
    /// Starts `run_file` with `worker_data` and returns its id, control and events.
    fn spawn(
        &self,
        run_file: &RunFile,
        worker_data: Option<Payload>,
    ) -> Result<SpawnedWorker, SpawnError>;
}
