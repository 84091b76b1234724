//! Error types for command domain validation and argument parsing.

use thiserror::Error;

use super::ArgSlot;

/// Errors returned while constructing command domain values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CommandDomainError {
    /// The command name is empty after trimming.
    #[error("command name must not be empty")]
    EmptyCommandName,

    /// The command name contains characters outside `[a-z0-9_-]`.
    #[error(
        "command name '{0}' contains invalid characters (only lowercase alphanumeric, '-' and '_' allowed)"
    )]
    InvalidCommandName(String),

    /// The command name exceeds the 64-character limit.
    #[error("command name exceeds 64 character limit: {0}")]
    CommandNameTooLong(String),

    /// A compact format string contains an unknown slot character.
    #[error("unknown argument format character '{0}' (expected 'w' or 's')")]
    InvalidFormatCharacter(char),

    /// A rest-of-line slot appears before the final position.
    #[error("rest-of-line argument at position {position} must be the final slot")]
    RestOfLineNotLast {
        /// One-based slot position.
        position: usize,
    },

    /// The descriptor admits no conversation kind.
    #[error("command '/{0}' must be usable in at least one conversation kind")]
    EmptyUsageContexts(String),

    /// The generator program path is empty.
    #[error("generator program path must not be empty")]
    EmptyGeneratorProgram,
}

/// Raw input does not match a command's declared argument format.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ArgumentMismatchError {
    /// Fewer tokens were supplied than the format requires.
    #[error("missing {expected} for argument {position}")]
    Missing {
        /// One-based slot position.
        position: usize,
        /// Slot kind that could not be filled.
        expected: ArgSlot,
    },

    /// Input remained after every slot was filled.
    #[error("unexpected trailing input '{remainder}'")]
    Unexpected {
        /// The unconsumed input.
        remainder: String,
    },
}
