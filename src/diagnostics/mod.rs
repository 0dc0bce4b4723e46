//! # Diagnostic sinks.
//!
//! Every worker error and message error is written as one line to the manager's
//! [`Diagnostics`] sink, whether or not the caller registered a callback for it.
//!
//! ## Built-in sinks
//! - [`StderrWriter`] - the default; writes to the process error stream
//! - [`BufferWriter`] - keeps lines in memory (tests, embedding UIs)
//!
//! ## Implementing custom sinks
//! ```no_run
//! use workvisor::Diagnostics;
//!
//! struct Syslog;
//!
//! impl Diagnostics for Syslog {
//!     fn write(&self, line: &str) {
//!         // forward to syslog, a file, a metrics pipeline, ...
//!         let _ = line;
//!     }
//!
//!     fn name(&self) -> &'static str { "syslog" }
//! }
//! ```

mod buffer;
mod sink;
mod stderr;

pub use buffer::BufferWriter;
pub use sink::Diagnostics;
pub use stderr::StderrWriter;
