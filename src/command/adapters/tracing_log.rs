//! Diagnostic log adapter backed by `tracing`.

use tracing::info;

use crate::command::ports::DiagnosticLog;

/// Writes diagnostic messages as `info` events on the
/// `chatcmd::diagnostic` target, so they pass the console's default filter.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingDiagnosticLog;

impl TracingDiagnosticLog {
    /// Creates the adapter.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl DiagnosticLog for TracingDiagnosticLog {
    fn write(&self, source: &str, message: &str) {
        info!(target: "chatcmd::diagnostic", source, "{message}");
    }
}
