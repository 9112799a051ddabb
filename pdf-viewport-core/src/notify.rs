//! User-visible notifications
//!
//! The sink is fire-and-forget: the core never reads anything back.

use std::sync::mpsc::Sender;

/// Toast styling requested by the core
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Info,
    Destructive,
}

/// A transient message for the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub title: String,
    pub description: String,
    pub kind: NotificationKind,
}

impl Notification {
    pub fn info(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            kind: NotificationKind::Info,
        }
    }

    pub fn destructive(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            kind: NotificationKind::Destructive,
        }
    }

    /// Emitted by both the inline and the fullscreen viewport when a
    /// document cannot be opened
    pub fn load_failed() -> Self {
        Self::destructive("Error loading PDF", "Please try again later")
    }

    pub fn render_failed(page: u32) -> Self {
        Self::destructive(
            "Error rendering page",
            format!("Page {page} could not be displayed"),
        )
    }
}

/// Receiver of notifications, supplied by the host application
pub trait NotificationSink {
    fn notify(&mut self, notification: Notification);
}

/// Collects notifications in memory
impl NotificationSink for Vec<Notification> {
    fn notify(&mut self, notification: Notification) {
        self.push(notification);
    }
}

/// Forwards notifications to another part of the host, e.g. the UI thread's
/// toast queue. A hung-up receiver just drops them.
impl NotificationSink for Sender<Notification> {
    fn notify(&mut self, notification: Notification) {
        if self.send(notification).is_err() {
            tracing::debug!("notification receiver dropped");
        }
    }
}

impl<S: NotificationSink + ?Sized> NotificationSink for &mut S {
    fn notify(&mut self, notification: Notification) {
        (**self).notify(notification);
    }
}
