//! Log level threshold

use serde::{Deserialize, Serialize};

use crate::error::CalltraceError;

/// Log level threshold.
///
/// Numeric values are part of the configuration surface (`level: 0..=4`).
/// The ordering is the numeric one, so `WARN` sits above `INFO`: a logger at
/// `INFO` prints info lines but drops warnings.
#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash, Default,
)]
#[serde(try_from = "u8", into = "u8")]
pub enum LogLevel {
    Off = 0,
    Error = 1,
    Info = 2,
    Warn = 3,
    #[default]
    Debug = 4,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Off => "off",
            Self::Error => "error",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Debug => "debug",
        }
    }

    /// Parse a level from either its number (`"3"`) or its name (`"warn"`).
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        if let Ok(n) = s.parse::<u8>() {
            return Self::try_from(n).ok();
        }
        match s.to_lowercase().as_str() {
            "off" => Some(Self::Off),
            "error" => Some(Self::Error),
            "info" => Some(Self::Info),
            "warn" => Some(Self::Warn),
            "debug" => Some(Self::Debug),
            _ => None,
        }
    }

    pub fn is_off(&self) -> bool {
        matches!(self, Self::Off)
    }

    /// Whether a line of level `kind` passes this threshold.
    pub fn allows(&self, kind: LogLevel) -> bool {
        !kind.is_off() && *self >= kind
    }
}

impl TryFrom<u8> for LogLevel {
    type Error = CalltraceError;

    fn try_from(value: u8) -> Result<Self, CalltraceError> {
        match value {
            0 => Ok(LogLevel::Off),
            1 => Ok(LogLevel::Error),
            2 => Ok(LogLevel::Info),
            3 => Ok(LogLevel::Warn),
            4 => Ok(LogLevel::Debug),
            other => Err(CalltraceError::InvalidLevel(other.to_string())),
        }
    }
}

impl From<LogLevel> for u8 {
    fn from(level: LogLevel) -> Self {
        level as u8
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
