//! Fire-and-forget notifications about schedule, friend, and group changes.
//!
//! Components that can notify take an `Option<Arc<dyn NotificationSink>>`;
//! `None` means nobody is listening.

use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};

use crate::interval::IntervalId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NotificationKind {
    ScheduleUpdate,
    FriendRequest,
    GroupUpdate,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub message: String,
    pub kind: NotificationKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interval_id: Option<IntervalId>,
}

impl Notification {
    pub fn new(kind: NotificationKind, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            kind,
            interval_id: None,
        }
    }

    pub fn with_interval(mut self, id: IntervalId) -> Self {
        self.interval_id = Some(id);
        self
    }
}

/// Receives notifications. Delivery failures are the sink's own concern.
pub trait NotificationSink: Send + Sync {
    fn notify(&self, notification: Notification);
}

/// Shared optional sink handle.
pub type SharedSink = Option<Arc<dyn NotificationSink>>;

/// Send to `sink` if one is attached.
pub(crate) fn emit(sink: &SharedSink, notification: Notification) {
    if let Some(sink) = sink {
        sink.notify(notification);
    }
}

/// Sink that keeps every notification in memory.
#[derive(Debug, Default)]
pub struct MemorySink {
    received: Mutex<Vec<Notification>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take everything received so far.
    pub fn drain(&self) -> Vec<Notification> {
        match self.received.lock() {
            Ok(mut received) => std::mem::take(&mut *received),
            Err(poisoned) => std::mem::take(&mut *poisoned.into_inner()),
        }
    }
}

impl NotificationSink for MemorySink {
    fn notify(&self, notification: Notification) {
        match self.received.lock() {
            Ok(mut received) => received.push(notification),
            Err(poisoned) => poisoned.into_inner().push(notification),
        }
    }
}
