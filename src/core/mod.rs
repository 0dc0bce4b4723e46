//! Manager core: registry, lifecycle and reaping.
//!
//! The public API from this module is [`WorkerManager`] with its handle, options,
//! records and configuration.
//!
//! Internal modules:
//! - [`registry`]: one synchronized table of live workers (control + record);
//! - [`lifecycle`]: pure event → record transitions;
//! - [`relay`]: per-worker task applying events and invoking callbacks;
//! - [`reaper`]: periodic eviction of acknowledged or expired workers;
//! - [`manager`]: public entry point wiring the above together.

mod builder;
mod config;
mod handle;
mod lifecycle;
mod manager;
mod options;
mod reaper;
mod record;
mod registry;
mod relay;

pub use builder::ManagerBuilder;
pub use config::ManagerConfig;
pub use handle::WorkerHandle;
pub use manager::WorkerManager;
pub use options::{ErrorFn, ExitFn, MessageFn, OnlineFn, WorkerOptions};
pub use record::{WorkerRecord, WorkerStatus};
