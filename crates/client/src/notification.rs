use chrono::{Duration, NaiveDateTime};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Success,
    Error,
}

/// A transient message shown to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub message: String,
    pub kind: NotificationKind,
    pub raised_at: NaiveDateTime,
}

/// Holds at most one notification; a newer one replaces the older. A
/// notification disappears once `ttl` has passed since it was raised.
#[derive(Debug, Clone)]
pub struct Notifier {
    ttl: Duration,
    current: Option<Notification>,
}

impl Notifier {
    pub fn new(ttl: Duration) -> Self {
        Self { ttl, current: None }
    }

    pub fn success(&mut self, message: impl Into<String>, now: NaiveDateTime) {
        self.raise(message.into(), NotificationKind::Success, now);
    }

    pub fn error(&mut self, message: impl Into<String>, now: NaiveDateTime) {
        self.raise(message.into(), NotificationKind::Error, now);
    }

    fn raise(&mut self, message: String, kind: NotificationKind, raised_at: NaiveDateTime) {
        self.current = Some(Notification {
            message,
            kind,
            raised_at,
        });
    }

    /// The notification still visible at `now`, if any.
    pub fn current(&self, now: NaiveDateTime) -> Option<&Notification> {
        self.current
            .as_ref()
            .filter(|notification| now < notification.raised_at + self.ttl)
    }

    pub fn dismiss(&mut self) {
        self.current = None;
    }
}
