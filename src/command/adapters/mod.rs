//! Adapter implementations for command subsystem ports.

pub mod memory;

mod process;
mod tracing_log;

pub use process::ProcessGeneratorInvoker;
pub use tracing_log::TracingDiagnosticLog;
