//! # Tokio-backed worker runtime.
//!
//! [`TokioRuntime`] runs each worker as its own tokio task and reports its
//! lifecycle on a per-worker event stream.
//!
//! ## Event flow
//! ```text
//! spawn()
//!   ├─► worker task:   Online ─► work.run(ctx) ─► (Message | MessageError)*
//!   │                                  │
//!   │                                  ├─ Ok(())        → exit code from ctx (default 0)
//!   │                                  ├─ Err(e)        → Error(e), exit code 1
//!   │                                  └─ panic         → Error(Panicked), exit code 1
//!   │
//!   └─► monitor task:  join worker ─► Exit(code)
//!                      (aborted by terminate() → Exit(1))
//! ```
//!
//! ## Rules
//! - Exactly one `Exit` per worker, always last.
//! - Panics inside the body are caught and reported, never propagated.
//! - `terminate()` cancels the worker's token and aborts its task.

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::sync::atomic::{AtomicI32, AtomicU64, Ordering};

use futures::FutureExt;
use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tokio::task::AbortHandle;
use tokio_util::sync::CancellationToken;

use crate::error::{SpawnError, WorkError};
use crate::events::{Payload, RuntimeEvent};
use crate::runtime::{RunFile, SpawnedWorker, WorkerContext, WorkerControl, WorkerId, WorkerRuntime};

/// Exit code reported for workers that failed or were terminated.
const FAILURE_EXIT_CODE: i32 = 1;

/// Runs workers as tokio tasks.
///
/// Workers are placed on the runtime given to [`TokioRuntime::with_handle`], or
/// on the runtime current at spawn time.
#[derive(Debug)]
pub struct TokioRuntime {
    next_id: AtomicU64,
    handle: Option<Handle>,
}

impl TokioRuntime {
    /// Creates a runtime that spawns onto the current tokio runtime.
    pub fn new() -> Self {
        Self {
            next_id: AtomicU64::new(1),
            handle: None,
        }
    }

    /// Creates a runtime that spawns onto `handle`.
    pub fn with_handle(handle: Handle) -> Self {
        Self {
            next_id: AtomicU64::new(1),
            handle: Some(handle),
        }
    }

    fn handle(&self) -> Result<Handle, SpawnError> {
        match &self.handle {
            Some(h) => Ok(h.clone()),
            None => Handle::try_current().map_err(|_| SpawnError::NoRuntime),
        }
    }
}

impl Default for TokioRuntime {
    fn default() -> Self {
        Self::new()
    }
}

impl WorkerRuntime for TokioRuntime {
    fn spawn(
        &self,
        run_file: &RunFile,
        worker_data: Option<Payload>,
    ) -> Result<SpawnedWorker, SpawnError> {
        let rt = self.handle()?;
        let id = WorkerId::new(self.next_id.fetch_add(1, Ordering::Relaxed));

        let (tx, rx) = mpsc::unbounded_channel();
        let token = CancellationToken::new();
        let exit_code = Arc::new(AtomicI32::new(0));
        let ctx = WorkerContext::new(
            id,
            worker_data,
            tx.clone(),
            token.clone(),
            Arc::clone(&exit_code),
        );

        let work = Arc::clone(run_file);
        let online = tx.clone();
        let join = rt.spawn(async move {
            let _ = online.send(RuntimeEvent::Online);
            match AssertUnwindSafe(work.run(ctx)).catch_unwind().await {
                Ok(res) => res,
                Err(panic) => Err(WorkError::Panicked {
                    info: panic_message(&*panic),
                }),
            }
        });
        let abort = join.abort_handle();

        rt.spawn(async move {
            let code = match join.await {
                Ok(Ok(())) => exit_code.load(Ordering::Relaxed),
                Ok(Err(err)) => {
                    let _ = tx.send(RuntimeEvent::Error(err));
                    FAILURE_EXIT_CODE
                }
                Err(_aborted) => FAILURE_EXIT_CODE,
            };
            let _ = tx.send(RuntimeEvent::Exit(code));
        });

        Ok(SpawnedWorker {
            id,
            control: Arc::new(TokioControl { token, abort }),
            events: rx,
        })
    }
}

/// Control handle of a tokio worker.
struct TokioControl {
    token: CancellationToken,
    abort: AbortHandle,
}

impl WorkerControl for TokioControl {
    fn terminate(&self) {
        self.token.cancel();
        self.abort.abort();
    }
}

/// Renders a caught panic payload as text.
fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&'static str>() {
        (*msg).to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic".to_string()
    }
}
