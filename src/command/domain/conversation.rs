//! Conversation kinds and command usage contexts.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Discriminant of a host-owned conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConversationKind {
    /// One-to-one conversation.
    DirectMessage,
    /// Multi-user chat room.
    GroupChat,
    /// Any other conversation the host exposes (consoles, system views).
    Other,
}

impl ConversationKind {
    /// Returns the usage context matching this kind, if any.
    #[must_use]
    pub const fn usage_context(self) -> Option<UsageContext> {
        match self {
            Self::DirectMessage => Some(UsageContext::DirectMessage),
            Self::GroupChat => Some(UsageContext::GroupChat),
            Self::Other => None,
        }
    }

    /// Returns the canonical string form.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::DirectMessage => "direct_message",
            Self::GroupChat => "group_chat",
            Self::Other => "other",
        }
    }
}

impl fmt::Display for ConversationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Conversation kind in which a command may be used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UsageContext {
    /// Usable in direct messages.
    DirectMessage,
    /// Usable in group chats.
    GroupChat,
}

impl UsageContext {
    /// Returns every usage context.
    #[must_use]
    pub const fn all() -> [Self; 2] {
        [Self::DirectMessage, Self::GroupChat]
    }
}
