//! # Function-backed work (`WorkFn`)
//!
//! [`WorkFn`] wraps a closure `F: Fn(WorkerContext) -> Fut`, producing a fresh
//! future per worker. State is not shared between workers spawned from the same
//! [`RunFile`](crate::RunFile) unless the closure captures an `Arc<...>` explicitly.
//!
//! ## Example
//! ```rust
//! use workvisor::{RunFile, Work, WorkError, WorkFn, WorkerContext};
//!
//! let w: RunFile = WorkFn::arc("reflect", |ctx: WorkerContext| async move {
//!     if let Some(data) = ctx.worker_data() {
//!         ctx.post_message(data)?;
//!     }
//!     Ok::<_, WorkError>(())
//! });
//!
//! assert_eq!(w.name(), "reflect");
//! ```

use std::borrow::Cow;
use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;

use crate::error::WorkError;
use crate::runtime::{Work, WorkerContext};

/// Function-backed work implementation.
///
/// Wraps a closure that *creates* a new future per worker.
pub struct WorkFn<F> {
    name: Cow<'static, str>,
    f: F,
}

impl<F> WorkFn<F> {
    /// Creates a new function-backed work.
    ///
    /// Prefer [`WorkFn::arc`] when you immediately need a [`RunFile`](crate::RunFile).
    pub fn new(name: impl Into<Cow<'static, str>>, f: F) -> Self {
        Self {
            name: name.into(),
            f,
        }
    }

    /// Creates the work and returns it as a shared handle.
    pub fn arc(name: impl Into<Cow<'static, str>>, f: F) -> Arc<Self> {
        Arc::new(Self::new(name, f))
    }
}

impl<F> std::fmt::Debug for WorkFn<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorkFn").field("name", &self.name).finish()
    }
}

#[async_trait]
impl<F, Fut> Work for WorkFn<F>
where
    F: Fn(WorkerContext) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<(), WorkError>> + Send + 'static,
{
    fn name(&self) -> &str {
        &self.name
    }

    async fn run(&self, ctx: WorkerContext) -> Result<(), WorkError> {
        (self.f)(ctx).await
    }
}
