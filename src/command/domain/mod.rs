//! Domain model for command registration and dispatch.
//!
//! The command domain models descriptors, argument formats, conversation
//! kinds and dispatch outcomes. Process handling, host conversations and
//! storage are kept outside the domain boundary.

mod arg_format;
mod command_line;
mod conversation;
mod descriptor;
mod error;
mod ids;
mod name;
mod notification;
mod outcome;

pub use arg_format::{ArgFormat, ArgSlot, ParsedArgs};
pub use command_line::split_command_line;
pub use conversation::{ConversationKind, UsageContext};
pub use descriptor::{
    CommandDescriptor, CommandHandler, CommandPriority, GeneratorSpec, RegisteredCommand,
};
pub use error::{ArgumentMismatchError, CommandDomainError};
pub use ids::RegistrationId;
pub use name::CommandName;
pub use notification::LocalNotification;
pub use outcome::{DispatchOutcome, DispatchState, ExecutionError, UsageError};
