use std::fmt;

/// Severity of a notification.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum NotificationLevel {
    /// Confirms a completed action.
    Success,

    /// Reports a rejected or failed action.
    Error,
}

/// Transient user-visible message.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Notification {
    /// Severity.
    pub level: NotificationLevel,

    /// Text shown to the user.
    pub message: String,
}

impl Notification {
    /// A success notification.
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Success,
            message: message.into(),
        }
    }

    /// An error notification.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Error,
            message: message.into(),
        }
    }
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}
