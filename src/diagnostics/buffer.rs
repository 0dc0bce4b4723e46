//! # BufferWriter - in-memory diagnostic sink
//!
//! Keeps every written line. Clones share the same buffer, so a test can hand
//! one clone to the manager and inspect another.
//!
//! ## Example
//! ```rust
//! use workvisor::{BufferWriter, Diagnostics};
//!
//! let sink = BufferWriter::new();
//! let probe = sink.clone();
//! sink.write("worker=1 worker failed: Ahh!");
//!
//! assert!(probe.contents().contains("Ahh!"));
//! assert_eq!(probe.lines().len(), 1);
//! ```

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::diagnostics::Diagnostics;

/// Diagnostic sink collecting lines in memory.
#[derive(Debug, Default, Clone)]
pub struct BufferWriter {
    lines: Arc<Mutex<Vec<String>>>,
}

impl BufferWriter {
    /// Construct an empty [`BufferWriter`].
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of all lines written so far.
    pub fn lines(&self) -> Vec<String> {
        self.lock().clone()
    }

    /// Returns all lines joined with `\n`.
    pub fn contents(&self) -> String {
        self.lock().join("\n")
    }

    /// Returns true if nothing was written.
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Discards all lines.
    pub fn clear(&self) {
        self.lock().clear();
    }

    fn lock(&self) -> MutexGuard<'_, Vec<String>> {
        self.lines.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Diagnostics for BufferWriter {
    fn write(&self, line: &str) {
        self.lock().push(line.to_owned());
    }

    fn name(&self) -> &'static str {
        "buffer"
    }
}
