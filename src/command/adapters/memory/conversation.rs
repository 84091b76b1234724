//! Recording conversation adapter.

use async_trait::async_trait;
use std::sync::{Arc, RwLock};

use crate::command::{
    domain::ConversationKind,
    ports::{Conversation, ConversationError, ConversationResult},
};

/// Channel a message was sent through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeliveryChannel {
    /// Sent with `send_direct`.
    Direct,
    /// Sent with `send_group`.
    Group,
}

/// A message recorded by [`InMemoryConversation`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentMessage {
    /// Channel used for the send.
    pub channel: DeliveryChannel,
    /// Message body.
    pub text: String,
}

/// Conversation that records every message it receives.
///
/// Clones share the same transcript, so a test can hand one clone to the
/// dispatcher and inspect another.
#[derive(Debug, Clone)]
pub struct InMemoryConversation {
    title: String,
    kind: ConversationKind,
    state: Arc<RwLock<ConversationState>>,
}

#[derive(Debug, Default)]
struct ConversationState {
    sent: Vec<SentMessage>,
    closed: bool,
}

impl InMemoryConversation {
    /// Creates an open conversation of `kind`.
    #[must_use]
    pub fn new(title: impl Into<String>, kind: ConversationKind) -> Self {
        Self {
            title: title.into(),
            kind,
            state: Arc::new(RwLock::new(ConversationState::default())),
        }
    }

    /// Creates a direct-message conversation.
    #[must_use]
    pub fn direct(title: impl Into<String>) -> Self {
        Self::new(title, ConversationKind::DirectMessage)
    }

    /// Creates a group-chat conversation.
    #[must_use]
    pub fn group(title: impl Into<String>) -> Self {
        Self::new(title, ConversationKind::GroupChat)
    }

    /// Marks the conversation closed; later sends fail.
    pub fn close(&self) {
        if let Ok(mut state) = self.state.write() {
            state.closed = true;
        }
    }

    /// Returns every recorded message in send order.
    #[must_use]
    pub fn sent(&self) -> Vec<SentMessage> {
        self.state
            .read()
            .map(|state| state.sent.clone())
            .unwrap_or_default()
    }

    /// Returns the recorded message bodies in send order.
    #[must_use]
    pub fn texts(&self) -> Vec<String> {
        self.sent().into_iter().map(|message| message.text).collect()
    }

    fn record(&self, channel: DeliveryChannel, text: &str) -> ConversationResult<()> {
        let mut state = self
            .state
            .write()
            .map_err(|err| ConversationError::send(std::io::Error::other(err.to_string())))?;
        if state.closed {
            return Err(ConversationError::Closed);
        }
        state.sent.push(SentMessage {
            channel,
            text: text.to_owned(),
        });
        Ok(())
    }
}

#[async_trait]
impl Conversation for InMemoryConversation {
    fn title(&self) -> String {
        self.title.clone()
    }

    fn kind(&self) -> ConversationKind {
        self.kind
    }

    async fn send_direct(&self, text: &str) -> ConversationResult<()> {
        self.record(DeliveryChannel::Direct, text)
    }

    async fn send_group(&self, text: &str) -> ConversationResult<()> {
        self.record(DeliveryChannel::Group, text)
    }
}
