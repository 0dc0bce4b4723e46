//! # workvisor
//!
//! **Workvisor** supervises a dynamic set of background workers for an
//! embedding application.
//!
//! It spawns isolated workers through a pluggable runtime, tracks each worker's
//! lifecycle status, relays messages and errors to caller-supplied callbacks,
//! and reclaims workers that finish and are acknowledged, or that run too long.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!     ┌──────────────┐   ┌──────────────┐   ┌──────────────┐
//!     │WorkerOptions │   │WorkerOptions │   │WorkerOptions │
//!     │ (run_file #1)│   │ (run_file #2)│   │ (run_file #3)│
//!     └──────┬───────┘   └──────┬───────┘   └──────┬───────┘
//!            ▼                  ▼                  ▼
//! ┌───────────────────────────────────────────────────────────────────┐
//! │  WorkerManager                                                    │
//! │  - Registry (id → control + WorkerRecord, one mutex)              │
//! │  - WorkerRuntime (spawns workers; TokioRuntime by default)        │
//! │  - Diagnostics (sink for error lines; stderr by default)          │
//! │  - Reaper (interval task, stops on shutdown/drop)                 │
//! └──────┬──────────────────┬──────────────────┬───────────────┬──────┘
//!        ▼                  ▼                  ▼               │
//!     ┌──────────────┐   ┌──────────────┐   ┌──────────────┐   │
//!     │   Worker 1   │   │   Worker 2   │   │   Worker 3   │   │
//!     └┬─────────────┘   └┬─────────────┘   └┬─────────────┘   │
//!      │ Online           │ Online           │ Online          │
//!      │ Message          │ MessageError     │ Error           │
//!      │ Exit(0)          │ Exit(0)          │ Exit(1)         │
//!      ▼                  ▼                  ▼                 ▼
//! ┌──────────────┐   ┌──────────────┐   ┌──────────────┐   ┌──────────────┐
//! │   Relay 1    │   │   Relay 2    │   │   Relay 3    │   │    Reaper    │
//! └──────┬───────┘   └──────┬───────┘   └──────┬───────┘   └──────┬───────┘
//!        └──────────────────┴────────┬─────────┴──────────────────┘
//!                                    ▼
//!                       registry (apply / evict), then
//!                       callbacks + diagnostics (outside the lock)
//! ```
//!
//! ### Lifecycle
//! ```text
//! NotStarted ──online──► Started ──exit──► Done
//!      │                    │
//!      ├──── error ─────────┴──► Error          (worker terminated; survives exit)
//!      └──── messageerror ───────► MessageError (worker keeps running; survives exit)
//!
//! Reaper, every clean_interval:
//!   acknowledged && !running   → terminate + remove
//!   age > timeout              → terminate + remove
//! ```
//!
//! ## Features
//! | Area              | Description                                                     | Key types / traits                          |
//! |-------------------|-----------------------------------------------------------------|---------------------------------------------|
//! | **Supervision**   | Create, query, acknowledge and remove workers.                  | [`WorkerManager`], [`WorkerHandle`]         |
//! | **Records**       | Independent snapshots of per-worker state.                      | [`WorkerRecord`], [`WorkerStatus`]          |
//! | **Runtimes**      | Plug in how workers are spawned and stopped.                    | [`WorkerRuntime`], [`TokioRuntime`]         |
//! | **Work**          | Define worker bodies as functions or trait objects.             | [`Work`], [`WorkFn`], [`RunFile`]           |
//! | **Events**        | Runtime lifecycle events and message envelopes.                 | [`RuntimeEvent`], [`Envelope`]              |
//! | **Diagnostics**   | Injectable sink for worker error lines.                         | [`Diagnostics`], [`StderrWriter`]           |
//! | **Errors**        | Typed errors for options, spawning and workers.                 | [`ManagerError`], [`WorkError`]             |
//! | **Configuration** | Reaper interval and maximum worker age.                         | [`ManagerConfig`]                           |
//!
//! ## Logging
//! The crate emits [`tracing`] events (`worker` field = worker id) and installs
//! no subscriber; wire one up in the host application.
//!
//! ## Example
//! ```rust
//! use std::time::Duration;
//! use workvisor::{ManagerConfig, RunFile, WorkError, WorkFn, WorkerContext, WorkerManager, WorkerOptions};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let cfg = ManagerConfig::default().with_clean_interval(Duration::from_millis(50));
//!     let manager = WorkerManager::new(cfg);
//!
//!     let job: RunFile = WorkFn::arc("hello", |ctx: WorkerContext| async move {
//!         ctx.post_message("hello from worker")?;
//!         Ok::<_, WorkError>(())
//!     });
//!
//!     let handle = manager.create(
//!         WorkerOptions::new(job).on_exit(|code, h| println!("worker {} exited with {code}", h.id())),
//!     )?;
//!     handle.acknowledge();
//!
//!     // Acknowledged and finished: the reaper drops it on one of the next sweeps.
//!     while manager.get(handle.id()).is_some() {
//!         tokio::time::sleep(Duration::from_millis(10)).await;
//!     }
//!     Ok(())
//! }
//! ```
mod core;
mod diagnostics;
mod error;
mod events;
mod runtime;

// ---- Public re-exports ----

pub use crate::core::{
    ErrorFn, ExitFn, ManagerBuilder, ManagerConfig, MessageFn, OnlineFn, WorkerHandle,
    WorkerManager, WorkerOptions, WorkerRecord, WorkerStatus,
};
pub use diagnostics::{BufferWriter, Diagnostics, StderrWriter};
pub use error::{ConfigError, ManagerError, SpawnError, WorkError};
pub use events::{Envelope, Payload, RuntimeEvent};
pub use runtime::{
    RunFile, SpawnedWorker, TokioRuntime, Work, WorkFn, WorkerContext, WorkerControl, WorkerId,
    WorkerRuntime,
};
