use crate::domain::ports::{Notification, NotificationLevel, Notifier};
use log::{info, warn};
use std::sync::{Arc, Mutex, MutexGuard};

/// A notification inbox kept in memory.
///
/// Clones share the same inbox, so a front end can hold one clone and drain it
/// while the controller owns another.
#[derive(Debug, Default, Clone)]
pub struct InMemoryNotifier {
    inbox: Arc<Mutex<Vec<Notification>>>,
}

impl InMemoryNotifier {
    /// Creates a new, empty inbox.
    pub fn new() -> Self {
        Self::default()
    }

    fn inbox(&self) -> MutexGuard<'_, Vec<Notification>> {
        self.inbox.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Removes and returns every pending notification, oldest first.
    pub fn drain(&self) -> Vec<Notification> {
        std::mem::take(&mut *self.inbox())
    }

    pub fn is_empty(&self) -> bool {
        self.inbox().is_empty()
    }
}

impl Notifier for InMemoryNotifier {
    fn notify(&self, notification: Notification) {
        self.inbox().push(notification);
    }
}

/// Sends notifications to the log.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, notification: Notification) {
        match notification.level {
            NotificationLevel::Success => {
                info!("{}: {}", notification.title, notification.description)
            }
            NotificationLevel::Failure => {
                warn!("{}: {}", notification.title, notification.description)
            }
        }
    }
}

/// Forwards every notification to each of the wrapped notifiers.
pub struct FanoutNotifier {
    targets: Vec<Box<dyn Notifier>>,
}

impl FanoutNotifier {
    pub fn new(targets: Vec<Box<dyn Notifier>>) -> Self {
        Self { targets }
    }
}

impl Notifier for FanoutNotifier {
    fn notify(&self, notification: Notification) {
        for target in &self.targets {
            target.notify(notification.clone());
        }
    }
}
