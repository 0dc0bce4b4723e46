//! Worker events: what a runtime reports and how message payloads are read.
//!
//! ## Contents
//! - [`RuntimeEvent`] lifecycle events emitted by a [`WorkerRuntime`](crate::WorkerRuntime)
//! - [`Payload`] opaque data exchanged with workers
//! - [`Envelope`] the typed view of a payload used to extract an action tag
//!
//! ## Quick reference
//! - **Publishers**: runtimes (one event stream per spawned worker).
//! - **Consumers**: the manager's per-worker relay, which applies each event to
//!   the worker's record and then invokes the caller's callbacks.

mod envelope;
mod event;

pub use envelope::Envelope;
pub use event::{Payload, RuntimeEvent};
