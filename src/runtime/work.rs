//! # Worker body abstraction.
//!
//! [`Work`] is the code a worker executes. It is handed to a runtime as a
//! [`RunFile`] (`Arc<dyn Work>`) so the same body can back many workers.
//!
//! A body receives a [`WorkerContext`] and should watch its cancellation to stop
//! promptly when the worker is terminated.

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::WorkError;
use crate::runtime::WorkerContext;

/// Shared reference to worker code.
pub type RunFile = Arc<dyn Work>;

/// # Asynchronous worker body.
///
/// # Example
/// ```
/// use async_trait::async_trait;
/// use workvisor::{Work, WorkError, WorkerContext};
///
/// struct Echo;
///
/// #[async_trait]
/// impl Work for Echo {
///     fn name(&self) -> &str { "echo" }
///
///     async fn run(&self, ctx: WorkerContext) -> Result<(), WorkError> {
///         let data = ctx.worker_data().cloned().unwrap_or_default();
///         ctx.post_message(&data)?;
///         Ok(())
///     }
/// }
/// ```
#[async_trait]
pub trait Work: Send + Sync + 'static {
    /// Returns a stable, human-readable name (used in logs).
    fn name(&self) -> &str;

    /// Runs the worker to completion.
    ///
    /// `Ok` exits with the context's exit code (0 unless changed);
    /// `Err` is reported as a worker error and exits with code 1.
    async fn run(&self, ctx: WorkerContext) -> Result<(), WorkError>;
}
