//! Diagnostic log capability.

/// Sink for diagnostic messages written by log-style commands.
pub trait DiagnosticLog: Send + Sync {
    /// Writes `message` attributed to `source`.
    fn write(&self, source: &str, message: &str);
}
