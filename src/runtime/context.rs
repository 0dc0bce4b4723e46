//! # Worker-side view of a running worker.
//!
//! A [`WorkerContext`] is handed to [`Work::run`](crate::Work::run). It carries the
//! spawn payload, a message port back to the manager, the worker's cancellation
//! token and its exit code.

use std::sync::Arc;
use std::sync::atomic::{AtomicI32, Ordering};

use serde::Serialize;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::error::WorkError;
use crate::events::{Payload, RuntimeEvent};
use crate::runtime::WorkerId;

/// Handle given to worker code.
///
/// Cloning is cheap; clones share the port, the token and the exit code.
#[derive(Clone, Debug)]
pub struct WorkerContext {
    id: WorkerId,
    data: Option<Payload>,
    port: mpsc::UnboundedSender<RuntimeEvent>,
    token: CancellationToken,
    exit_code: Arc<AtomicI32>,
}

impl WorkerContext {
    pub(crate) fn new(
        id: WorkerId,
        data: Option<Payload>,
        port: mpsc::UnboundedSender<RuntimeEvent>,
        token: CancellationToken,
        exit_code: Arc<AtomicI32>,
    ) -> Self {
        Self {
            id,
            data,
            port,
            token,
            exit_code,
        }
    }

    /// Returns this worker's id.
    pub fn id(&self) -> WorkerId {
        self.id
    }

    /// Returns the payload supplied at creation, if any.
    pub fn worker_data(&self) -> Option<&Payload> {
        self.data.as_ref()
    }

    /// Posts a payload to the manager.
    ///
    /// The value is serialized here; if that fails the manager receives a
    /// `messageerror` event and the error is also returned to the caller.
    pub fn post_message<T: Serialize + ?Sized>(&self, msg: &T) -> Result<(), WorkError> {
        match serde_json::to_value(msg) {
            Ok(payload) => {
                let _ = self.port.send(RuntimeEvent::Message(payload));
                Ok(())
            }
            Err(e) => {
                let err = WorkError::Message {
                    error: e.to_string(),
                };
                let _ = self.port.send(RuntimeEvent::MessageError(err.clone()));
                Err(err)
            }
        }
    }

    /// Sets the code reported when the body returns `Ok`.
    pub fn set_exit_code(&self, code: i32) {
        self.exit_code.store(code, Ordering::Relaxed);
    }

    /// Returns true once the worker has been terminated.
    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Completes when the worker is terminated.
    pub async fn cancelled(&self) {
        self.token.cancelled().await;
    }

    /// Returns the worker's cancellation token (e.g. to hand to child tasks).
    pub fn token(&self) -> &CancellationToken {
        &self.token
    }
}
