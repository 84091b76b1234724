//! Local notification capability provided by the host.

use thiserror::Error;

use crate::command::domain::LocalNotification;

/// Result type for notifier operations.
pub type NotifierResult<T> = Result<T, NotifierError>;

/// Shows popup-style notices to the local user only.
#[cfg_attr(test, mockall::automock)]
pub trait Notifier: Send + Sync {
    /// Shows `notification`.
    ///
    /// # Errors
    ///
    /// Returns [`NotifierError`] when the host cannot show the notice.
    fn notify(&self, notification: &LocalNotification) -> NotifierResult<()>;
}

/// Errors reported by notifiers.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum NotifierError {
    /// The host notification facility is not available.
    #[error("notifications unavailable: {0}")]
    Unavailable(String),
}
