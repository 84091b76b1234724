//! Port trait definitions for the command subsystem.
//!
//! Ports define the abstract interfaces the dispatcher requires from the
//! host and from infrastructure. Adapters implement these ports to connect
//! the dispatcher to conversations, notifications, logs and processes.

pub mod conversation;
pub mod diagnostic_log;
pub mod generator;
pub mod notifier;
pub mod registry;

pub use conversation::{Conversation, ConversationError, ConversationResult};
pub use diagnostic_log::DiagnosticLog;
pub use generator::{
    GeneratorExit, GeneratorInvoker, GeneratorLines, GeneratorReadError, GeneratorRequest,
    LaunchError,
};
pub use notifier::{Notifier, NotifierError, NotifierResult};
pub use registry::{CommandRegistry, CommandRegistryError, CommandRegistryResult};
