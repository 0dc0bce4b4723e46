//! # Worker runtimes and the code they run.
//!
//! This module provides the collaborator seam of the manager and its default implementation:
//! - [`WorkerRuntime`] - trait for anything that can spawn isolated workers and report their events
//! - [`WorkerControl`] - per-worker terminate/unref handle returned by a runtime
//! - [`TokioRuntime`] - runs each worker as a tokio task
//! - [`Work`] - trait for implementing the body of a worker
//! - [`WorkFn`] - function-backed work implementation
//! - [`RunFile`] - shared reference to work (`Arc<dyn Work>`)
//! - [`WorkerContext`] - what a running worker sees (data, message port, cancellation)

mod context;
mod spawn;
mod tokio_runtime;
mod work;
mod work_fn;

pub use context::WorkerContext;
pub use spawn::{SpawnedWorker, WorkerControl, WorkerId, WorkerRuntime};
pub use tokio_runtime::TokioRuntime;
pub use work::{RunFile, Work};
pub use work_fn::WorkFn;
