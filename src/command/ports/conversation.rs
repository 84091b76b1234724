//! Conversation capability provided by the host.

use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

use crate::command::domain::ConversationKind;

/// Result type for conversation sends.
pub type ConversationResult<T> = Result<T, ConversationError>;

/// A host-owned conversation that can receive delivered text.
///
/// The dispatcher never owns or mutates conversation state; it reads the
/// kind and calls the matching send operation.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Conversation: Send + Sync {
    /// Returns a human-readable label used in logs.
    fn title(&self) -> String;

    /// Returns the conversation discriminant.
    fn kind(&self) -> ConversationKind;

    /// Sends `text` as a direct message.
    async fn send_direct(&self, text: &str) -> ConversationResult<()>;

    /// Sends `text` as a group chat message.
    async fn send_group(&self, text: &str) -> ConversationResult<()>;
}

/// Errors reported by host conversations.
#[derive(Debug, Clone, Error)]
pub enum ConversationError {
    /// The conversation was closed by the host.
    #[error("conversation is closed")]
    Closed,

    /// The host failed to send the message.
    #[error("conversation send failed: {0}")]
    Send(Arc<dyn std::error::Error + Send + Sync>),
}

impl ConversationError {
    /// Wraps a host send failure.
    pub fn send(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Send(Arc::new(err))
    }
}
