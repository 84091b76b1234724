//! Routing of command output to conversations and local notices.

use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, warn};

use crate::command::{
    domain::{ConversationKind, LocalNotification},
    ports::{Conversation, ConversationError, Notifier, NotifierError},
};

/// A line could not be delivered.
#[derive(Debug, Clone, Error)]
pub enum DeliveryError {
    /// The conversation is neither a direct message nor a group chat.
    #[error("cannot deliver to a {0} conversation")]
    UnsupportedConversationType(ConversationKind),

    /// The host rejected the send.
    #[error(transparent)]
    Send(#[from] ConversationError),
}

/// Routes text to the channel matching a conversation's kind.
///
/// Channel delivery and local notification are separate operations; a
/// single call never does both.
#[derive(Clone)]
pub struct DeliveryRouter<N>
where
    N: Notifier,
{
    notifier: Arc<N>,
}

impl<N> DeliveryRouter<N>
where
    N: Notifier,
{
    /// Creates a router showing local notices through `notifier`.
    #[must_use]
    pub const fn new(notifier: Arc<N>) -> Self {
        Self { notifier }
    }

    /// Sends `text` to `conversation` on the channel its kind requires.
    ///
    /// # Errors
    ///
    /// Returns [`DeliveryError::UnsupportedConversationType`] for
    /// conversations of kind [`ConversationKind::Other`], without calling
    /// either send operation, or [`DeliveryError::Send`] when the host
    /// rejects the message.
    pub async fn deliver(
        &self,
        conversation: &dyn Conversation,
        text: &str,
    ) -> Result<(), DeliveryError> {
        match conversation.kind() {
            ConversationKind::DirectMessage => conversation.send_direct(text).await?,
            ConversationKind::GroupChat => conversation.send_group(text).await?,
            kind @ ConversationKind::Other => {
                warn!(
                    conversation = %conversation.title(),
                    %kind,
                    "unsupported conversation type"
                );
                return Err(DeliveryError::UnsupportedConversationType(kind));
            }
        }
        Ok(())
    }

    /// Shows `notification` to the local user only.
    ///
    /// # Errors
    ///
    /// Returns [`NotifierError`] when the host cannot show the notice.
    pub fn notify_local(&self, notification: &LocalNotification) -> Result<(), NotifierError> {
        debug!(
            title = %notification.title,
            context = %notification.context,
            "showing local notification"
        );
        self.notifier.notify(notification)
    }
}
