use std::sync::Arc;

use tokio::runtime::Handle;
use tokio_util::sync::CancellationToken;

use super::{config::ManagerConfig, manager::WorkerManager, reaper::Reaper, registry::Registry};
use crate::diagnostics::{Diagnostics, StderrWriter};
use crate::runtime::{TokioRuntime, WorkerRuntime};

/// Builder for constructing a [`WorkerManager`] with non-default collaborators.
pub struct ManagerBuilder {
    cfg: ManagerConfig,
    runtime: Option<Arc<dyn WorkerRuntime>>,
    diagnostics: Option<Arc<dyn Diagnostics>>,
}

impl ManagerBuilder {
    /// Creates a new builder with the given configuration.
    pub fn new(cfg: ManagerConfig) -> Self {
        Self {
            cfg,
            runtime: None,
            diagnostics: None,
        }
    }

    /// Sets the runtime that spawns workers (default: [`TokioRuntime`]).
    pub fn with_runtime(mut self, runtime: Arc<dyn WorkerRuntime>) -> Self {
        self.runtime = Some(runtime);
        self
    }

    /// Sets the sink for worker error lines (default: [`StderrWriter`]).
    pub fn with_diagnostics(mut self, diagnostics: Arc<dyn Diagnostics>) -> Self {
        self.diagnostics = Some(diagnostics);
        self
    }

    /// Builds the manager and starts its reaper.
    ///
    /// # Panics
    /// Panics if called outside a tokio runtime.
    pub fn build(self) -> WorkerManager {
        let rt = Handle::current();
        let registry = Registry::new();
        let token = CancellationToken::new();

        Reaper {
            registry: Arc::clone(&registry),
            clean_interval: self.cfg.clean_interval_clamped(),
            timeout: self.cfg.timeout,
        }
        .spawn(&rt, token.clone());

        WorkerManager::new_internal(
            self.cfg,
            registry,
            self.runtime
                .unwrap_or_else(|| Arc::new(TokioRuntime::with_handle(rt.clone()))),
            self.diagnostics.unwrap_or_else(|| Arc::new(StderrWriter::new())),
            rt,
            token,
        )
    }
}
