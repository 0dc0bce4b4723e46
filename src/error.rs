//! Error types used by the workvisor manager, its runtimes and workers.
//!
//! This module defines the error enums of the crate:
//!
//! - [`ConfigError`] - invalid [`WorkerOptions`](crate::WorkerOptions) passed to `create`.
//! - [`SpawnError`] - a [`WorkerRuntime`](crate::WorkerRuntime) refused to start a worker.
//! - [`ManagerError`] - everything [`WorkerManager::create`](crate::WorkerManager::create) can return.
//! - [`WorkError`] - errors raised by (or about) an individual running worker.
//!
//! Each type provides helper methods (`as_label`, `as_message`) for logging/metrics.

use thiserror::Error;

/// # Invalid worker options.
///
/// Raised synchronously from `create`, before the runtime is asked to spawn anything.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// No runnable code was supplied.
    #[error("missing required 'run_file' option when invoking WorkerManager::create()")]
    MissingRunFile,
}

impl ConfigError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use workvisor::ConfigError;
    ///
    /// assert_eq!(ConfigError::MissingRunFile.as_label(), "config_missing_run_file");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            ConfigError::MissingRunFile => "config_missing_run_file",
        }
    }
}

/// # Errors produced by a worker runtime while spawning.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SpawnError {
    /// There is no async runtime to place the worker on.
    #[error("no tokio runtime available to spawn the worker on")]
    NoRuntime,

    /// The runtime declined the request.
    #[error("spawn rejected: {reason}")]
    Rejected {
        /// Why the runtime declined.
        reason: String,
    },
}

impl SpawnError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            SpawnError::NoRuntime => "spawn_no_runtime",
            SpawnError::Rejected { .. } => "spawn_rejected",
        }
    }
}

/// # Errors returned by [`WorkerManager::create`](crate::WorkerManager::create).
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum ManagerError {
    /// The options were invalid; nothing was spawned.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The runtime failed to start the worker; nothing was registered.
    #[error("failed to spawn worker: {0}")]
    Spawn(#[from] SpawnError),
}

impl ManagerError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            ManagerError::Config(e) => e.as_label(),
            ManagerError::Spawn(e) => e.as_label(),
        }
    }
}

/// # Errors produced by a running worker.
///
/// `Fail` and `Panicked` are fatal: the worker is terminated by the manager.
/// `Message` is not: the worker keeps running after a payload fails to cross
/// the worker boundary.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WorkError {
    /// The work body returned an error.
    #[error("worker failed: {error}")]
    Fail {
        /// The underlying error message.
        error: String,
    },

    /// The work body panicked.
    #[error("worker panicked: {info}")]
    Panicked {
        /// Panic payload rendered as text.
        info: String,
    },

    /// A posted payload could not be serialized.
    #[error("message could not be delivered: {error}")]
    Message {
        /// The serializer's error message.
        error: String,
    },
}

impl WorkError {
    /// Shorthand for [`WorkError::Fail`].
    ///
    /// # Example
    /// ```
    /// use workvisor::WorkError;
    ///
    /// let err = WorkError::fail("Ahh!");
    /// assert_eq!(err.to_string(), "worker failed: Ahh!");
    /// ```
    pub fn fail(error: impl Into<String>) -> Self {
        WorkError::Fail {
            error: error.into(),
        }
    }

    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            WorkError::Fail { .. } => "work_failed",
            WorkError::Panicked { .. } => "work_panicked",
            WorkError::Message { .. } => "work_message",
        }
    }

    /// Returns the bare error text, without the variant prefix.
    pub fn as_message(&self) -> &str {
        match self {
            WorkError::Fail { error } | WorkError::Message { error } => error,
            WorkError::Panicked { info } => info,
        }
    }

    /// Indicates whether the error ends the worker.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, WorkError::Message { .. })
    }
}
