//! Player-facing notifications (toasts and blocking prompts)

use std::collections::VecDeque;

use crate::error::GameError;

/// How a notification is presented
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Info,
    Success,
    /// Transient error toast
    Error,
    /// Must be acknowledged before play continues
    Blocking,
}

impl NotificationKind {
    /// CSS class used by the page
    pub fn css_class(&self) -> &'static str {
        match self {
            NotificationKind::Info => "toast-info",
            NotificationKind::Success => "toast-success",
            NotificationKind::Error => "toast-error",
            NotificationKind::Blocking => "toast-blocking",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    pub kind: NotificationKind,
    pub title: String,
    pub description: String,
}

impl Notification {
    pub fn new(kind: NotificationKind, title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            kind,
            title: title.into(),
            description: description.into(),
        }
    }

    pub fn success(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self::new(NotificationKind::Success, title, description)
    }

    pub fn info(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self::new(NotificationKind::Info, title, description)
    }

    /// Present an error under `title`
    pub fn error(title: impl Into<String>, error: &GameError) -> Self {
        let kind = match error {
            GameError::IdentityNotConnected => NotificationKind::Blocking,
            _ => NotificationKind::Error,
        };
        Self::new(kind, title, error.to_string())
    }
}

/// Pending notifications, oldest first
#[derive(Debug, Default)]
pub struct Notifications {
    queue: VecDeque<Notification>,
}

impl Notifications {
    pub fn push(&mut self, notification: Notification) {
        match notification.kind {
            NotificationKind::Error | NotificationKind::Blocking => {
                log::warn!("{}: {}", notification.title, notification.description)
            }
            _ => log::info!("{}: {}", notification.title, notification.description),
        }
        self.queue.push_back(notification);
    }

    /// Take everything queued so far
    pub fn drain(&mut self) -> Vec<Notification> {
        self.queue.drain(..).collect()
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Notification> {
        self.queue.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_error_is_blocking() {
        let n = Notification::error("Connect Wallet", &GameError::IdentityNotConnected);
        assert_eq!(n.kind, NotificationKind::Blocking);
        assert_eq!(n.description, "Please connect your wallet first!");
    }

    #[test]
    fn test_drain_empties_queue() {
        let mut queue = Notifications::default();
        queue.push(Notification::info("a", "b"));
        queue.push(Notification::success("c", "d"));
        assert_eq!(queue.drain().len(), 2);
        assert!(queue.is_empty());
    }
}
