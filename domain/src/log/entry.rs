use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Identity of the interface surface that issued a request.
///
/// Log entries are addressed to the requester, not to the organization.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SenderId(String);

impl SenderId {
    pub const MAIN: &'static str = "main";

    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for SenderId {
    fn default() -> Self {
        Self(Self::MAIN.to_string())
    }
}

impl fmt::Display for SenderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Severity/category label of a log entry.
///
/// `Info` and `Error` are emitted by the dispatcher; surfaces may send any
/// other label through `send_log`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum LogChannel {
    Info,
    Error,
    Custom(String),
}

impl LogChannel {
    pub fn as_str(&self) -> &str {
        match self {
            LogChannel::Info => "Info",
            LogChannel::Error => "Error",
            LogChannel::Custom(label) => label,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, LogChannel::Error)
    }
}

impl From<&str> for LogChannel {
    fn from(label: &str) -> Self {
        match label {
            "Info" => LogChannel::Info,
            "Error" => LogChannel::Error,
            other => LogChannel::Custom(other.to_string()),
        }
    }
}

impl From<String> for LogChannel {
    fn from(label: String) -> Self {
        match label.as_str() {
            "Info" => LogChannel::Info,
            "Error" => LogChannel::Error,
            _ => LogChannel::Custom(label),
        }
    }
}

impl fmt::Display for LogChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for LogChannel {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for LogChannel {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer).map(LogChannel::from)
    }
}

/// A human-readable diagnostic message. Delivered once, never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    pub sender: SenderId,
    pub channel: LogChannel,
    pub message: String,
}

impl LogEntry {
    pub fn new(sender: SenderId, channel: LogChannel, message: impl Into<String>) -> Self {
        Self {
            sender,
            channel,
            message: message.into(),
        }
    }

    pub fn info(sender: SenderId, message: impl Into<String>) -> Self {
        Self::new(sender, LogChannel::Info, message)
    }

    pub fn error(sender: SenderId, message: impl Into<String>) -> Self {
        Self::new(sender, LogChannel::Error, message)
    }
}
