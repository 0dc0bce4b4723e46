//! # Lifecycle events emitted by a worker runtime.
//!
//! Every spawned worker has its own event stream. A well-behaved runtime emits:
//!
//! ```text
//! Online ─► (Message | MessageError)* ─► [Error] ─► Exit(code)
//! ```
//!
//! `Exit` is always the last event of a stream; the relay stops reading after it.
//!
//! ## Example
//! ```rust
//! use serde_json::json;
//! use workvisor::{RuntimeEvent, WorkError};
//!
//! let ev = RuntimeEvent::Message(json!({ "action": "resize" }));
//! assert_eq!(ev.name(), "message");
//!
//! let ev = RuntimeEvent::Error(WorkError::fail("boom"));
//! assert!(!ev.is_exit());
//! ```

use crate::error::WorkError;

/// Opaque data passed to workers at spawn time and posted back by them.
pub type Payload = serde_json::Value;

/// Event delivered by a runtime for one worker.
#[derive(Debug, Clone, PartialEq)]
pub enum RuntimeEvent {
    /// The worker started executing.
    Online,

    /// The worker failed; fatal to the worker.
    Error(WorkError),

    /// A payload failed to cross the worker boundary; the worker keeps running.
    MessageError(WorkError),

    /// The worker posted a payload.
    Message(Payload),

    /// The worker stopped with the given exit code.
    Exit(i32),
}

impl RuntimeEvent {
    /// Returns the stable event name (`online`, `error`, `messageerror`, `message`, `exit`).
    pub fn name(&self) -> &'static str {
        match self {
            RuntimeEvent::Online => "online",
            RuntimeEvent::Error(_) => "error",
            RuntimeEvent::MessageError(_) => "messageerror",
            RuntimeEvent::Message(_) => "message",
            RuntimeEvent::Exit(_) => "exit",
        }
    }

    #[inline]
    pub fn is_exit(&self) -> bool {
        matches!(self, RuntimeEvent::Exit(_))
    }
}
