//! Local, non-channel notifications shown to the invoking user.

use serde::{Deserialize, Serialize};

/// A popup-style notice for the local user only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalNotification {
    /// Notification title.
    pub title: String,
    /// Primary message.
    pub body: String,
    /// Secondary detail, typically the argument the user entered.
    pub context: String,
}

impl LocalNotification {
    /// Creates a notification.
    #[must_use]
    pub fn new(
        title: impl Into<String>,
        body: impl Into<String>,
        context: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
            context: context.into(),
        }
    }
}
