//! In-memory adapter implementations.
//!
//! These adapters provide simple, thread-safe implementations suitable for
//! tests and for hosts that keep the command table in process.

mod conversation;
mod diagnostic_log;
mod generator;
mod notifier;
mod registry;

pub use conversation::{DeliveryChannel, InMemoryConversation, SentMessage};
pub use diagnostic_log::{DiagnosticEntry, InMemoryDiagnosticLog};
pub use generator::{InMemoryGeneratorInvoker, ScriptedGenerator};
pub use notifier::InMemoryNotifier;
pub use registry::InMemoryCommandRegistry;
