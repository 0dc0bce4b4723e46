//! # WorkerManager: creates workers, tracks their records, and reaps them.
//!
//! The [`WorkerManager`] owns the registry, the worker runtime, the diagnostic
//! sink and the reaper's cancellation token.
//!
//! ## Key responsibilities
//! - validate [`WorkerOptions`] and spawn workers through the [`WorkerRuntime`]
//! - allocate one [`WorkerRecord`] per worker and start its relay
//! - answer read accessors with independent copies
//! - stop the reaper on [`WorkerManager::shutdown`] or drop
//!
//! ## High-level architecture
//! ```text
//! create(options)
//!   ├─► options.run_file? ── None ──► Err(ConfigError::MissingRunFile)   (nothing spawned)
//!   ├─► runtime.spawn(run_file, worker_data) ──► SpawnedWorker{ id, control, events }
//!   ├─► control.unref()
//!   ├─► registry.insert(WorkerRecord::new(id), control)
//!   └─► Relay::spawn(events)           ◄── inserted first, so no event precedes its record
//!
//!       runtime events ──► Relay ──► registry.update(id, apply) ──► callbacks
//!
//! Reaper (every clean_interval) ──► registry.evict(timeout) ──► control.terminate()
//!
//! get / get_status / get_last_message / list ──► registry (read under lock, clone)
//! ```
//!
//! ## Example
//! ```rust
//! use std::time::Duration;
//! use serde_json::json;
//! use workvisor::{
//!     ManagerConfig, RunFile, WorkError, WorkFn, WorkerContext, WorkerManager, WorkerOptions,
//!     WorkerStatus,
//! };
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let manager = WorkerManager::new(ManagerConfig::default());
//!
//!     let reflect: RunFile = WorkFn::arc("reflect", |ctx: WorkerContext| async move {
//!         if let Some(data) = ctx.worker_data() {
//!             ctx.post_message(data)?;
//!         }
//!         Ok::<_, WorkError>(())
//!     });
//!
//!     let handle = manager.create(
//!         WorkerOptions::new(reflect).worker_data(json!({ "action": "do it!" })),
//!     )?;
//!
//!     while manager.get_status(handle.id()) != Some(WorkerStatus::Done) {
//!         tokio::time::sleep(Duration::from_millis(5)).await;
//!     }
//!     let record = manager.get(handle.id()).expect("still registered");
//!     assert_eq!(record.actions, vec!["do it!".to_string()]);
//!     assert_eq!(record.exit_code, Some(0));
//!
//!     handle.acknowledge();
//!     Ok(())
//! }
//! ```

use std::sync::Arc;
use std::time::SystemTime;

use tokio::runtime::Handle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::core::{
    builder::ManagerBuilder,
    config::ManagerConfig,
    handle::WorkerHandle,
    options::WorkerOptions,
    record::{WorkerRecord, WorkerStatus},
    registry::Registry,
    relay::Relay,
};
use crate::diagnostics::Diagnostics;
use crate::error::{ConfigError, ManagerError, SpawnError};
use crate::events::Payload;
use crate::runtime::{SpawnedWorker, WorkerId, WorkerRuntime};

/// Supervises a dynamic set of background workers.
pub struct WorkerManager {
    cfg: ManagerConfig,
    registry: Arc<Registry>,
    runtime: Arc<dyn WorkerRuntime>,
    diagnostics: Arc<dyn Diagnostics>,
    rt: Handle,
    token: CancellationToken,
}

impl WorkerManager {
    /// Creates a manager with the default runtime ([`TokioRuntime`](crate::TokioRuntime))
    /// and diagnostic sink ([`StderrWriter`](crate::StderrWriter)), and starts its reaper.
    ///
    /// # Panics
    /// Panics if called outside a tokio runtime.
    pub fn new(cfg: ManagerConfig) -> Self {
        Self::builder(cfg).build()
    }

    /// Returns a builder for a manager with custom collaborators.
    pub fn builder(cfg: ManagerConfig) -> ManagerBuilder {
        ManagerBuilder::new(cfg)
    }

    pub(crate) fn new_internal(
        cfg: ManagerConfig,
        registry: Arc<Registry>,
        runtime: Arc<dyn WorkerRuntime>,
        diagnostics: Arc<dyn Diagnostics>,
        rt: Handle,
        token: CancellationToken,
    ) -> Self {
        Self {
            cfg,
            registry,
            runtime,
            diagnostics,
            rt,
            token,
        }
    }

    /// Spawns a worker and starts tracking it.
    ///
    /// Fails with [`ConfigError::MissingRunFile`] before anything is spawned when
    /// `options` has no run file, and with [`ManagerError::Spawn`] when the runtime
    /// refuses the worker.
    pub fn create(&self, options: WorkerOptions) -> Result<WorkerHandle, ManagerError> {
        let WorkerOptions {
            run_file,
            worker_data,
            callbacks,
        } = options;
        let run_file = run_file.ok_or(ConfigError::MissingRunFile)?;

        let SpawnedWorker {
            id,
            control,
            events,
        } = self.runtime.spawn(&run_file, worker_data)?;
        control.unref();

        let record = WorkerRecord::new(id, SystemTime::now());
        if !self.registry.insert(record, Arc::clone(&control)) {
            warn!(worker = %id, "runtime reused a live worker id");
            control.terminate();
            return Err(SpawnError::Rejected {
                reason: format!("worker id {id} is already registered"),
            }
            .into());
        }

        let handle = WorkerHandle::new(id, &self.registry, Arc::clone(&control));
        Relay {
            handle: handle.clone(),
            registry: Arc::clone(&self.registry),
            control,
            callbacks,
            diagnostics: Arc::clone(&self.diagnostics),
        }
        .spawn(&self.rt, events);

        debug!(worker = %id, run_file = run_file.name(), "worker created");
        Ok(handle)
    }

    /// Returns an independent copy of the worker's record.
    pub fn get(&self, id: WorkerId) -> Option<WorkerRecord> {
        self.registry.snapshot(id)
    }

    /// Returns the worker's current status.
    pub fn get_status(&self, id: WorkerId) -> Option<WorkerStatus> {
        self.registry.read(id, |record| record.status)
    }

    /// Returns a copy of the last payload the worker posted.
    pub fn get_last_message(&self, id: WorkerId) -> Option<Payload> {
        self.registry
            .read(id, |record| record.last_message.clone())
            .flatten()
    }

    /// Returns copies of all registered records, ordered by id.
    pub fn list(&self) -> Vec<WorkerRecord> {
        self.registry.list()
    }

    /// Stops tracking a worker. Idempotent.
    ///
    /// This does **not** terminate a worker that is still running; it only
    /// detaches it. Call [`WorkerHandle::terminate`] or [`WorkerManager::terminate`]
    /// first when the worker must stop.
    pub fn remove(&self, id: WorkerId) {
        if self.registry.remove(id).is_some() {
            debug!(worker = %id, "worker removed");
        }
    }

    /// Force-stops a registered worker without removing its record.
    ///
    /// Returns false if the worker is not registered.
    pub fn terminate(&self, id: WorkerId) -> bool {
        match self.registry.control(id) {
            Some(control) => {
                control.terminate();
                true
            }
            None => false,
        }
    }

    /// Returns the number of registered workers.
    pub fn len(&self) -> usize {
        self.registry.len()
    }

    /// Returns true if no worker is registered.
    pub fn is_empty(&self) -> bool {
        self.registry.is_empty()
    }

    /// Returns the manager's configuration.
    pub fn config(&self) -> &ManagerConfig {
        &self.cfg
    }

    /// Stops the reaper. Workers and their relays are left untouched.
    pub fn shutdown(&self) {
        self.token.cancel();
    }

    /// Returns true once [`WorkerManager::shutdown`] was called.
    pub fn is_shut_down(&self) -> bool {
        self.token.is_cancelled()
    }
}

impl Drop for WorkerManager {
    fn drop(&mut self) {
        self.token.cancel();
    }
}
