use serde::{Deserialize, Serialize};

use invdb_core::{ConfigError, QueryError, StartupError, UpdateError};
use invdb_inventory::{Availability, Entry};

/// Which part of the error taxonomy an `error` notification came from.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Config,
    Startup,
    Update,
    Query,
}

/// Transport-friendly error payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationError {
    pub kind: ErrorKind,
    pub message: String,
}

impl NotificationError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl From<&ConfigError> for NotificationError {
    fn from(value: &ConfigError) -> Self {
        Self::new(ErrorKind::Config, value.to_string())
    }
}

impl From<&StartupError> for NotificationError {
    fn from(value: &StartupError) -> Self {
        Self::new(ErrorKind::Startup, value.to_string())
    }
}

impl From<&UpdateError> for NotificationError {
    fn from(value: &UpdateError) -> Self {
        Self::new(ErrorKind::Update, value.to_string())
    }
}

impl From<&QueryError> for NotificationError {
    fn from(value: &QueryError) -> Self {
        Self::new(ErrorKind::Query, value.to_string())
    }
}

/// Outcome of one engine request (or of startup), named by its event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "payload", rename_all = "camelCase")]
pub enum Notification {
    Started,
    Updated,
    GotEntry(Option<Entry>),
    GotEntries(Vec<Option<Entry>>),
    GotAvailable(Availability),
    Error(NotificationError),
}

impl Notification {
    /// Event name listeners subscribe to.
    pub fn event_name(&self) -> &'static str {
        match self {
            Notification::Started => "started",
            Notification::Updated => "updated",
            Notification::GotEntry(_) => "gotEntry",
            Notification::GotEntries(_) => "gotEntries",
            Notification::GotAvailable(_) => "gotAvailable",
            Notification::Error(_) => "error",
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Notification::Error(_))
    }

    pub fn error(&self) -> Option<&NotificationError> {
        match self {
            Notification::Error(e) => Some(e),
            _ => None,
        }
    }
}

impl From<UpdateError> for Notification {
    fn from(value: UpdateError) -> Self {
        Notification::Error((&value).into())
    }
}

impl From<QueryError> for Notification {
    fn from(value: QueryError) -> Self {
        Notification::Error((&value).into())
    }
}
