//! # Per-worker metadata.

use std::fmt;
use std::time::SystemTime;

use serde::Serialize;

use crate::events::Payload;
use crate::runtime::WorkerId;

/// Lifecycle status of a worker.
///
/// ```text
/// NotStarted ──online──► Started ──exit──► Done
///      │                    │
///      └──────── error ─────┴──► Error         (any state)
///      └──── messageerror ──┴──► MessageError  (any state)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkerStatus {
    /// Spawn requested, `online` not seen yet.
    #[default]
    NotStarted,
    /// Running.
    Started,
    /// Exited after a clean run.
    Done,
    /// Failed; the worker was terminated.
    Error,
    /// A payload failed to cross the worker boundary.
    MessageError,
}

impl WorkerStatus {
    /// Returns the human-readable status name.
    pub fn as_str(&self) -> &'static str {
        match self {
            WorkerStatus::NotStarted => "not started",
            WorkerStatus::Started => "started",
            WorkerStatus::Done => "done",
            WorkerStatus::Error => "error",
            WorkerStatus::MessageError => "message error",
        }
    }

    /// Returns true for the two error statuses.
    #[inline]
    pub fn is_failed(&self) -> bool {
        matches!(self, WorkerStatus::Error | WorkerStatus::MessageError)
    }
}

impl fmt::Display for WorkerStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Snapshot of everything the manager knows about one worker.
///
/// Values returned by the manager are independent copies; changing them has no
/// effect on the manager's own record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WorkerRecord {
    /// Runtime-assigned identifier.
    pub id: WorkerId,
    /// When the worker was created.
    pub start_time: SystemTime,
    /// When the worker exited.
    pub end_time: Option<SystemTime>,
    /// True between `online` and `exit`.
    pub running: bool,
    /// Current lifecycle status.
    pub status: WorkerStatus,
    /// Last payload posted by the worker.
    pub last_message: Option<Payload>,
    /// Action tags extracted from posted payloads, in arrival order.
    pub actions: Vec<String>,
    /// Text of the last error or message error.
    pub error: Option<String>,
    /// Exit code, once exited.
    pub exit_code: Option<i32>,
    /// Set by [`WorkerHandle::acknowledge`](crate::WorkerHandle::acknowledge).
    pub acknowledged: bool,
}

impl WorkerRecord {
    /// Creates the initial record of a just-spawned worker.
    pub fn new(id: WorkerId, start_time: SystemTime) -> Self {
        Self {
            id,
            start_time,
            end_time: None,
            running: false,
            status: WorkerStatus::NotStarted,
            last_message: None,
            actions: Vec::new(),
            error: None,
            exit_code: None,
            acknowledged: false,
        }
    }
}
