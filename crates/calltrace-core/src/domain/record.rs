//! Emitted log records (one JSON object per line)

use serde::{Deserialize, Serialize};

use super::{Identity, LogLevel, Trace};

/// Default status for start/end/debug/info/warn lines
pub const DEFAULT_STATUS: u16 = 200;

/// Default status for error lines
pub const DEFAULT_ERROR_STATUS: u16 = 500;

/// Kind of an emitted record
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum RecordKind {
    Debug,
    Info,
    Warn,
    Error,
}

impl RecordKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }

    /// Threshold a logger must reach for this kind to be printed
    pub fn level(&self) -> LogLevel {
        match self {
            Self::Debug => LogLevel::Debug,
            Self::Info => LogLevel::Info,
            Self::Warn => LogLevel::Warn,
            Self::Error => LogLevel::Error,
        }
    }
}

/// Unit written to the sink
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogRecord {
    pub origin: String,
    pub message: String,
    pub trace: Trace,
    pub status: u16,

    /// Epoch milliseconds
    pub ts: i64,

    #[serde(rename = "type")]
    pub kind: RecordKind,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub session: Option<String>,

    #[serde(rename = "userId", skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub identifier: Option<String>,

    #[serde(rename = "app", skip_serializing_if = "Option::is_none")]
    pub app: Option<String>,
}

impl LogRecord {
    /// Build a record stamped with the current time
    pub fn new(
        kind: RecordKind,
        origin: impl Into<String>,
        message: impl Into<String>,
        trace: &Trace,
        status: u16,
    ) -> Self {
        Self {
            origin: origin.into(),
            message: message.into(),
            trace: trace.clone(),
            status,
            ts: now_millis(),
            kind,
            session: None,
            user_id: None,
            identifier: None,
            app: None,
        }
    }

    /// Copy the present identity fields onto the record
    pub fn with_identity(mut self, identity: &Identity) -> Self {
        self.session = non_empty(&identity.session);
        self.user_id = non_empty(&identity.user_id);
        self.identifier = non_empty(&identity.identifier);
        self.app = non_empty(&identity.app_name);
        self
    }

    /// Serialize as a single JSON line
    pub fn to_line(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| self.message.clone())
    }
}

fn non_empty(value: &Option<String>) -> Option<String> {
    value.as_ref().filter(|v| !v.is_empty()).cloned()
}

/// Current wall-clock time in epoch milliseconds
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}
