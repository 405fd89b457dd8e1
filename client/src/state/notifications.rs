//! Transient success/error messages shown by the toaster.

#[cfg(test)]
#[path = "notifications_test.rs"]
mod notifications_test;

use leptos::prelude::*;

use crate::consts::MAX_NOTIFICATIONS;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NotificationKind {
    Success,
    Error,
}

impl NotificationKind {
    /// CSS modifier for the toast element.
    pub fn class(self) -> &'static str {
        match self {
            Self::Success => "toast toast--success",
            Self::Error => "toast toast--error",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notification {
    pub id: u64,
    pub kind: NotificationKind,
    pub message: String,
}

/// Visible notifications, oldest first.
#[derive(Clone, Debug, Default)]
pub struct NotificationState {
    next_id: u64,
    items: Vec<Notification>,
}

impl NotificationState {
    /// Append a notification and return its id. Drops the oldest entries
    /// beyond [`MAX_NOTIFICATIONS`].
    pub fn push(&mut self, kind: NotificationKind, message: impl Into<String>) -> u64 {
        self.next_id += 1;
        let id = self.next_id;
        self.items.push(Notification { id, kind, message: message.into() });
        if self.items.len() > MAX_NOTIFICATIONS {
            let excess = self.items.len() - MAX_NOTIFICATIONS;
            self.items.drain(..excess);
        }
        id
    }

    pub fn success(&mut self, message: impl Into<String>) -> u64 {
        self.push(NotificationKind::Success, message)
    }

    pub fn error(&mut self, message: impl Into<String>) -> u64 {
        self.push(NotificationKind::Error, message)
    }

    /// Remove by id. Unknown ids are ignored.
    pub fn dismiss(&mut self, id: u64) {
        self.items.retain(|n| n.id != id);
    }

    pub fn items(&self) -> &[Notification] {
        &self.items
    }
}

/// Push a notification and schedule its dismissal in the browser.
pub fn notify(state: RwSignal<NotificationState>, kind: NotificationKind, message: impl Into<String>) {
    let message = message.into();
    let Some(id) = state.try_update(|s| s.push(kind, message)) else {
        return;
    };

    #[cfg(feature = "hydrate")]
    leptos::task::spawn_local(async move {
        gloo_timers::future::TimeoutFuture::new(crate::consts::NOTIFICATION_TTL_MS).await;
        state.update(|s| s.dismiss(id));
    });
    #[cfg(not(feature = "hydrate"))]
    let _ = id;
}
