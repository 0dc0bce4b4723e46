//! # Event relay: runtime events → record transitions → caller callbacks.
//!
//! One relay task runs per worker. It drains the worker's event stream in order
//! and, for every event:
//!
//! ```text
//! event ──► registry.update(id, record.apply(event))   (one critical section)
//!             │
//!             ├─ None (worker removed) ─► discard, no callback
//!             └─ Some ─► log / diagnostics ─► callback (outside the lock)
//!                          └─ error: terminate the worker afterwards
//! ```
//!
//! ## Rules
//! - Callbacks run outside the registry lock and may call back into the manager.
//! - A panicking callback is caught and logged; the relay keeps going.
//! - Errors and message errors always reach the diagnostic sink, callback or not.
//! - The relay ends after `exit` or when the runtime drops the stream.

use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::time::SystemTime;

use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, error, trace, warn};

use crate::core::handle::WorkerHandle;
use crate::core::options::Callbacks;
use crate::core::registry::Registry;
use crate::diagnostics::Diagnostics;
use crate::events::RuntimeEvent;
use crate::runtime::WorkerControl;

/// Forwards one worker's events.
pub(crate) struct Relay {
    pub handle: WorkerHandle,
    pub registry: Arc<Registry>,
    pub control: Arc<dyn WorkerControl>,
    pub callbacks: Callbacks,
    pub diagnostics: Arc<dyn Diagnostics>,
}

impl Relay {
    /// Spawns the relay task on `rt`.
    pub fn spawn(self, rt: &Handle, events: mpsc::UnboundedReceiver<RuntimeEvent>) -> JoinHandle<()> {
        rt.spawn(self.run(events))
    }

    async fn run(self, mut events: mpsc::UnboundedReceiver<RuntimeEvent>) {
        while let Some(event) = events.recv().await {
            let last = event.is_exit();
            self.dispatch(event);
            if last {
                break;
            }
        }
    }

    /// Applies one event and notifies the caller.
    fn dispatch(&self, event: RuntimeEvent) {
        let id = self.handle.id();
        let applied = self
            .registry
            .update(id, |record| record.apply(&event, SystemTime::now()));
        if applied.is_none() {
            trace!(worker = %id, event = event.name(), "event for removed worker discarded");
            return;
        }

        let cb = &self.callbacks;
        match event {
            RuntimeEvent::Online => {
                debug!(worker = %id, "worker online");
                if let Some(f) = &cb.on_online {
                    self.guarded("on_online", || f(&self.handle));
                }
            }
            RuntimeEvent::Error(err) => {
                error!(
                    worker = %id,
                    error = %err,
                    label = err.as_label(),
                    sink = self.diagnostics.name(),
                    "worker error"
                );
                self.diagnostics
                    .write(&format!("[worker-error] worker={id} {err}"));
                if let Some(f) = &cb.on_error {
                    self.guarded("on_error", || f(&err, &self.handle));
                }
                self.control.terminate();
            }
            RuntimeEvent::MessageError(err) => {
                warn!(
                    worker = %id,
                    error = %err,
                    sink = self.diagnostics.name(),
                    "worker message error"
                );
                self.diagnostics
                    .write(&format!("[worker-message-error] worker={id} {err}"));
                if let Some(f) = &cb.on_message_error {
                    self.guarded("on_message_error", || f(&err, &self.handle));
                }
            }
            RuntimeEvent::Message(payload) => {
                trace!(worker = %id, "worker message");
                if let Some(f) = &cb.on_message {
                    self.guarded("on_message", || f(&payload, &self.handle));
                }
            }
            RuntimeEvent::Exit(code) => {
                debug!(worker = %id, code, "worker exited");
                if let Some(f) = &cb.on_exit {
                    self.guarded("on_exit", || f(code, &self.handle));
                }
            }
        }
    }

    /// Runs a caller callback, turning a panic into a log entry.
    fn guarded(&self, hook: &'static str, f: impl FnOnce()) {
        if let Err(panic_err) = panic::catch_unwind(AssertUnwindSafe(f)) {
            let info = if let Some(msg) = panic_err.downcast_ref::<&'static str>() {
                (*msg).to_string()
            } else if let Some(msg) = panic_err.downcast_ref::<String>() {
                msg.clone()
            } else {
                "unknown panic".to_string()
            };
            error!(worker = %self.handle.id(), hook, info = %info, "callback panicked");
        }
    }
}
