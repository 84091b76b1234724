//! Recording diagnostic log adapter.

use std::sync::{Arc, RwLock};

use crate::command::ports::DiagnosticLog;

/// An entry written to [`InMemoryDiagnosticLog`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagnosticEntry {
    /// Source the message is attributed to.
    pub source: String,
    /// Logged message.
    pub message: String,
}

/// Diagnostic log that keeps entries in memory.
#[derive(Debug, Clone, Default)]
pub struct InMemoryDiagnosticLog {
    entries: Arc<RwLock<Vec<DiagnosticEntry>>>,
}

impl InMemoryDiagnosticLog {
    /// Creates an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the entries written so far.
    #[must_use]
    pub fn entries(&self) -> Vec<DiagnosticEntry> {
        self.entries
            .read()
            .map(|entries| entries.clone())
            .unwrap_or_default()
    }
}

impl DiagnosticLog for InMemoryDiagnosticLog {
    fn write(&self, source: &str, message: &str) {
        if let Ok(mut entries) = self.entries.write() {
            entries.push(DiagnosticEntry {
                source: source.to_owned(),
                message: message.to_owned(),
            });
        }
    }
}
