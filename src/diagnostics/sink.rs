//! # Diagnostic sink trait.

/// Target for diagnostic lines about failing workers.
///
/// ### Implementation requirements
/// - `write` is called from the relay task of the failing worker; keep it short
///   and non-blocking where possible.
/// - Handle I/O errors internally; do not panic.
pub trait Diagnostics: Send + Sync + 'static {
    /// Writes one diagnostic line (without trailing newline).
    fn write(&self, line: &str);

    /// Returns the sink name, logged as the `sink` field next to each error the relay reports.
    ///
    /// The default uses `type_name::<Self>()`, which can be verbose - override it when possible.
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}
