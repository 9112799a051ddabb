//! On-screen toasts for core notifications

use pdf_viewport_core::{Notification, NotificationKind};
use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
pub struct Toast {
    pub id: u64,
    pub notification: Notification,
    created: Instant,
    duration: Duration,
}

impl Toast {
    pub fn is_expired(&self) -> bool {
        self.created.elapsed() >= self.duration
    }

    pub fn is_destructive(&self) -> bool {
        self.notification.kind == NotificationKind::Destructive
    }
}

#[derive(Debug)]
pub struct ToastQueue {
    next_id: u64,
    duration: Duration,
    toasts: Vec<Toast>,
}

impl ToastQueue {
    pub fn new(duration: Duration) -> Self {
        Self {
            next_id: 0,
            duration,
            toasts: Vec::new(),
        }
    }

    pub fn push(&mut self, notification: Notification) {
        let id = self.next_id;
        self.next_id += 1;
        self.toasts.push(Toast {
            id,
            notification,
            created: Instant::now(),
            duration: self.duration,
        });
    }

    pub fn dismiss(&mut self, id: u64) {
        self.toasts.retain(|toast| toast.id != id);
    }

    pub fn prune_expired(&mut self) {
        self.toasts.retain(|toast| !toast.is_expired());
    }

    pub fn toasts(&self) -> &[Toast] {
        &self.toasts
    }

    pub fn is_empty(&self) -> bool {
        self.toasts.is_empty()
    }
}
