//! User-facing notifications.

use std::sync::Mutex;

use serde::Serialize;

/// Severity of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationLevel {
    Info,
    Success,
    Error,
}

/// A message shown to the user, e.g. as a toast.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub level: NotificationLevel,
    pub message: String,
}

impl Notification {
    pub fn new(level: NotificationLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
        }
    }
}

/// Sink for notifications raised by the flows.
pub trait Notifier: Send + Sync {
    fn notify(&self, notification: Notification);

    fn info(&self, message: &str) {
        self.notify(Notification::new(NotificationLevel::Info, message));
    }

    fn success(&self, message: &str) {
        self.notify(Notification::new(NotificationLevel::Success, message));
    }

    fn error(&self, message: &str) {
        self.notify(Notification::new(NotificationLevel::Error, message));
    }
}

/// Notifier that keeps every notification in memory.
#[derive(Debug, Default)]
pub struct NotificationLog {
    entries: Mutex<Vec<Notification>>,
}

impl NotificationLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all notifications.
    pub fn entries(&self) -> Vec<Notification> {
        self.entries
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Remove and return all notifications.
    pub fn take(&self) -> Vec<Notification> {
        std::mem::take(&mut *self.entries.lock().unwrap_or_else(|e| e.into_inner()))
    }

    pub fn has_errors(&self) -> bool {
        self.entries()
            .iter()
            .any(|n| n.level == NotificationLevel::Error)
    }
}

impl Notifier for NotificationLog {
    fn notify(&self, notification: Notification) {
        self.entries
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(notification);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_collects_in_order() {
        let log = NotificationLog::new();
        log.info("loading");
        log.error("failed");

        let entries = log.entries();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].level, NotificationLevel::Info);
        assert_eq!(entries[1].message, "failed");
        assert!(log.has_errors());
    }

    #[test]
    fn test_take_drains() {
        let log = NotificationLog::new();
        log.success("sent");
        assert_eq!(log.take().len(), 1);
        assert!(log.entries().is_empty());
        assert!(!log.has_errors());
    }

    #[test]
    fn test_notification_json() {
        let n = Notification::new(NotificationLevel::Success, "Mail sent");
        let json = serde_json::to_value(&n).unwrap();
        assert_eq!(json["level"], "success");
        assert_eq!(json["message"], "Mail sent");
    }
}
