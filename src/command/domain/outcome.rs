//! Dispatch states and results.

use std::fmt;
use std::time::Duration;
use thiserror::Error;

use super::{ArgumentMismatchError, CommandName, ConversationKind};

/// States of a single dispatch.
///
/// A dispatch moves `Idle -> Parsing -> Executing` and ends in one of
/// `Delivered`, `NotifyShown` or `Failed` before returning to `Idle`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DispatchState {
    /// No command in flight.
    Idle,
    /// Arguments are being matched against the command's format.
    Parsing,
    /// The handler is running.
    Executing,
    /// The handler finished and any output was delivered.
    Delivered,
    /// The generator was unavailable and the user was notified locally.
    NotifyShown,
    /// Usage or execution failed.
    Failed,
}

impl DispatchState {
    /// Returns the canonical string form.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Parsing => "parsing",
            Self::Executing => "executing",
            Self::Delivered => "delivered",
            Self::NotifyShown => "notify_shown",
            Self::Failed => "failed",
        }
    }

    /// Returns `true` for `Delivered`, `NotifyShown` and `Failed`.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Delivered | Self::NotifyShown | Self::Failed)
    }
}

impl fmt::Display for DispatchState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The command was used incorrectly and did not execute.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum UsageError {
    /// The arguments do not match the declared format.
    #[error("invalid arguments for '/{command}': {source}")]
    ArgumentMismatch {
        /// Command name.
        command: CommandName,
        /// Help text to show the user.
        help: String,
        /// Parser failure.
        source: ArgumentMismatchError,
    },

    /// The command is not enabled for this conversation kind.
    #[error("command '/{command}' cannot be used in a {kind} conversation")]
    WrongContext {
        /// Command name.
        command: CommandName,
        /// Kind of the conversation the command was issued in.
        kind: ConversationKind,
    },
}

/// The handler started but could not complete.
///
/// `delivered` counts lines that reached the conversation before the
/// failure; those deliveries stand.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ExecutionError {
    /// The conversation is neither a direct message nor a group chat.
    #[error("cannot deliver to a {kind} conversation ({delivered} lines delivered)")]
    UnsupportedConversationType {
        /// Offending conversation kind.
        kind: ConversationKind,
        /// Lines delivered before the failure.
        delivered: usize,
    },

    /// The host rejected a delivery.
    #[error("delivery failed after {delivered} lines: {reason}")]
    DeliveryFailed {
        /// Host failure description.
        reason: String,
        /// Lines delivered before the failure.
        delivered: usize,
    },

    /// The generator did not finish in time and was terminated.
    #[error("generator timed out after {timeout:?} ({delivered} lines delivered)")]
    Timeout {
        /// Configured timeout.
        timeout: Duration,
        /// Lines delivered before the timeout.
        delivered: usize,
    },

    /// The caller cancelled the dispatch.
    #[error("dispatch cancelled ({delivered} lines delivered)")]
    Cancelled {
        /// Lines delivered before cancellation.
        delivered: usize,
    },

    /// A generator argument template failed to render.
    #[error("generator arguments for '/{command}' failed to render: {reason}")]
    Template {
        /// Command name.
        command: CommandName,
        /// Rendering failure reason.
        reason: String,
    },

    /// The local notification could not be shown.
    #[error("local notification failed: {reason}")]
    Notification {
        /// Notifier failure description.
        reason: String,
    },
}

impl ExecutionError {
    /// Returns the number of lines delivered before the failure.
    #[must_use]
    pub const fn delivered(&self) -> usize {
        match self {
            Self::UnsupportedConversationType { delivered, .. }
            | Self::DeliveryFailed { delivered, .. }
            | Self::Timeout { delivered, .. }
            | Self::Cancelled { delivered } => *delivered,
            Self::Template { .. } | Self::Notification { .. } => 0,
        }
    }
}

/// Result of dispatching one command invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// The handler completed; `lines` counts channel deliveries.
    Delivered {
        /// Lines delivered to the conversation.
        lines: usize,
    },
    /// The generator could not be launched and a local notice was shown.
    NotifyShown {
        /// Launch failure description.
        reason: String,
    },
    /// The command was misused and did not execute.
    UsageError(UsageError),
    /// The handler failed while executing.
    ExecutionError(ExecutionError),
}

impl DispatchOutcome {
    /// Returns the terminal dispatch state for this outcome.
    #[must_use]
    pub const fn state(&self) -> DispatchState {
        match self {
            Self::Delivered { .. } => DispatchState::Delivered,
            Self::NotifyShown { .. } => DispatchState::NotifyShown,
            Self::UsageError(_) | Self::ExecutionError(_) => DispatchState::Failed,
        }
    }

    /// Returns the number of lines delivered to the conversation.
    #[must_use]
    pub const fn delivered_lines(&self) -> usize {
        match self {
            Self::Delivered { lines } => *lines,
            Self::ExecutionError(error) => error.delivered(),
            Self::NotifyShown { .. } | Self::UsageError(_) => 0,
        }
    }
}
