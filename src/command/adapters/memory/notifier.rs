//! Recording notifier adapter.

use std::sync::{Arc, RwLock};

use crate::command::{
    domain::LocalNotification,
    ports::{Notifier, NotifierError, NotifierResult},
};

/// Notifier that records every notification it is asked to show.
#[derive(Debug, Clone, Default)]
pub struct InMemoryNotifier {
    shown: Arc<RwLock<Vec<LocalNotification>>>,
}

impl InMemoryNotifier {
    /// Creates an empty notifier.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the notifications shown so far.
    #[must_use]
    pub fn shown(&self) -> Vec<LocalNotification> {
        self.shown
            .read()
            .map(|shown| shown.clone())
            .unwrap_or_default()
    }
}

impl Notifier for InMemoryNotifier {
    fn notify(&self, notification: &LocalNotification) -> NotifierResult<()> {
        self.shown
            .write()
            .map_err(|err| NotifierError::Unavailable(err.to_string()))?
            .push(notification.clone());
        Ok(())
    }
}
