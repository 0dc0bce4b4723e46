//! # Options for creating a worker.
//!
//! [`WorkerOptions`] bundles what [`WorkerManager::create`](crate::WorkerManager::create) needs:
//! - the code to run ([`RunFile`], required)
//! - an optional payload handed to the worker
//! - optional callbacks, one per runtime event
//!
//! ## Example
//! ```rust
//! use serde_json::json;
//! use workvisor::{RunFile, WorkError, WorkFn, WorkerContext, WorkerOptions};
//!
//! let job: RunFile = WorkFn::arc("job", |_ctx: WorkerContext| async { Ok::<_, WorkError>(()) });
//!
//! let opts = WorkerOptions::new(job)
//!     .worker_data(json!({ "rows": 10 }))
//!     .on_message(|payload, handle| println!("worker {} says {payload}", handle.id()))
//!     .on_exit(|code, _| println!("exited with {code}"));
//! # let _ = opts;
//! ```

use std::fmt;
use std::sync::Arc;

use crate::core::handle::WorkerHandle;
use crate::error::WorkError;
use crate::events::Payload;
use crate::runtime::RunFile;

/// Callback for `online`.
pub type OnlineFn = Arc<dyn Fn(&WorkerHandle) + Send + Sync>;
/// Callback for `error` and `messageerror`.
pub type ErrorFn = Arc<dyn Fn(&WorkError, &WorkerHandle) + Send + Sync>;
/// Callback for `message`.
pub type MessageFn = Arc<dyn Fn(&Payload, &WorkerHandle) + Send + Sync>;
/// Callback for `exit`.
pub type ExitFn = Arc<dyn Fn(i32, &WorkerHandle) + Send + Sync>;

/// Caller callbacks of one worker.
#[derive(Clone, Default)]
pub(crate) struct Callbacks {
    pub on_online: Option<OnlineFn>,
    pub on_error: Option<ErrorFn>,
    pub on_message: Option<MessageFn>,
    pub on_message_error: Option<ErrorFn>,
    pub on_exit: Option<ExitFn>,
}

/// Options for [`WorkerManager::create`](crate::WorkerManager::create).
///
/// `Default` yields options without a run file; `create` rejects them with
/// [`ConfigError::MissingRunFile`](crate::ConfigError::MissingRunFile).
#[derive(Clone, Default)]
pub struct WorkerOptions {
    pub(crate) run_file: Option<RunFile>,
    pub(crate) worker_data: Option<Payload>,
    pub(crate) callbacks: Callbacks,
}

impl WorkerOptions {
    /// Creates options running `run_file`.
    pub fn new(run_file: RunFile) -> Self {
        Self::default().run_file(run_file)
    }

    /// Sets the code to run.
    pub fn run_file(mut self, run_file: RunFile) -> Self {
        self.run_file = Some(run_file);
        self
    }

    /// Sets the payload handed to the worker.
    pub fn worker_data(mut self, data: impl Into<Payload>) -> Self {
        self.worker_data = Some(data.into());
        self
    }

    /// Called once the worker is running.
    pub fn on_online<F>(mut self, f: F) -> Self
    where
        F: Fn(&WorkerHandle) + Send + Sync + 'static,
    {
        self.callbacks.on_online = Some(Arc::new(f));
        self
    }

    /// Called when the worker fails, before the manager terminates it.
    pub fn on_error<F>(mut self, f: F) -> Self
    where
        F: Fn(&WorkError, &WorkerHandle) + Send + Sync + 'static,
    {
        self.callbacks.on_error = Some(Arc::new(f));
        self
    }

    /// Called for every payload the worker posts.
    pub fn on_message<F>(mut self, f: F) -> Self
    where
        F: Fn(&Payload, &WorkerHandle) + Send + Sync + 'static,
    {
        self.callbacks.on_message = Some(Arc::new(f));
        self
    }

    /// Called when a payload fails to cross the worker boundary.
    pub fn on_message_error<F>(mut self, f: F) -> Self
    where
        F: Fn(&WorkError, &WorkerHandle) + Send + Sync + 'static,
    {
        self.callbacks.on_message_error = Some(Arc::new(f));
        self
    }

    /// Called with the exit code once the worker stops.
    pub fn on_exit<F>(mut self, f: F) -> Self
    where
        F: Fn(i32, &WorkerHandle) + Send + Sync + 'static,
    {
        self.callbacks.on_exit = Some(Arc::new(f));
        self
    }
}

impl fmt::Debug for WorkerOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cb = &self.callbacks;
        f.debug_struct("WorkerOptions")
            .field("run_file", &self.run_file.as_ref().map(|w| w.name().to_owned()))
            .field("worker_data", &self.worker_data)
            .field("on_online", &cb.on_online.is_some())
            .field("on_error", &cb.on_error.is_some())
            .field("on_message", &cb.on_message.is_some())
            .field("on_message_error", &cb.on_message_error.is_some())
            .field("on_exit", &cb.on_exit.is_some())
            .finish()
    }
}
