//! # StderrWriter - default diagnostic sink
//!
//! Writes each line to the process error stream:
//!
//! ```text
//! [worker-error] worker=3 worker failed: Ahh!
//! [worker-message-error] worker=4 message could not be delivered: key must be a string
//! ```

use std::io::Write;

use crate::diagnostics::Diagnostics;

/// Diagnostic sink writing to stderr.
#[derive(Debug, Default, Clone, Copy)]
pub struct StderrWriter;

impl StderrWriter {
    /// Construct a new [`StderrWriter`].
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Diagnostics for StderrWriter {
    fn write(&self, line: &str) {
        let mut err = std::io::stderr().lock();
        let _ = writeln!(err, "{line}");
    }

    fn name(&self) -> &'static str {
        "stderr"
    }
}
