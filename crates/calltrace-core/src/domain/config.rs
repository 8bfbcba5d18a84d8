//! Logger configuration

use serde::{Deserialize, Serialize};
use std::sync::Once;
use std::time::Duration;
use tracing::{debug, warn};

use super::{Identity, LogLevel};
use crate::error::{CalltraceError, Result};

/// Environment variable that overrides the configured level
pub const LEVEL_ENV_VAR: &str = "LOG_LEVEL";

static DOTENV: Once = Once::new();

/// Default listener ceiling for the identity channel
pub const DEFAULT_DECORATOR_COUNT: usize = 10;

/// Default debounce window of the queue strategy
pub const DEFAULT_QUEUE_WINDOW_MS: u64 = 10_000;

/// Output strategy
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Cross-flow debounced batching
    #[default]
    Queue,
    /// Single-flow batching
    List,
    /// Immediate nested grouping
    Cascade,
}

impl Mode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Queue => "queue",
            Self::List => "list",
            Self::Cascade => "cascade",
        }
    }
}

impl std::str::FromStr for Mode {
    type Err = CalltraceError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "queue" => Ok(Self::Queue),
            "list" => Ok(Self::List),
            "cascade" => Ok(Self::Cascade),
            other => Err(CalltraceError::InvalidMode(other.to_string())),
        }
    }
}

/// Configuration accepted by `Logger::new`
///
/// Keys are camelCase so existing JSON configs (`appName`, `decoratorCount`)
/// load unchanged.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct LoggerConfig {
    pub level: LogLevel,
    pub app_name: Option<String>,
    pub correlation: Option<String>,
    pub session: Option<String>,
    pub user_id: Option<String>,
    pub identifier: Option<String>,
    pub mode: Mode,

    /// Listener ceiling of the identity channel (warning only)
    pub decorator_count: usize,

    /// When false, `error()` reaches the strategy even at level OFF
    pub error_respects_level: bool,

    pub queue_window_ms: u64,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::Debug,
            app_name: None,
            correlation: None,
            session: None,
            user_id: None,
            identifier: None,
            mode: Mode::Queue,
            decorator_count: DEFAULT_DECORATOR_COUNT,
            error_respects_level: true,
            queue_window_ms: DEFAULT_QUEUE_WINDOW_MS,
        }
    }
}

impl LoggerConfig {
    pub fn new(mode: Mode) -> Self {
        Self {
            mode,
            ..Default::default()
        }
    }

    /// Parse a JSON configuration document
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn with_level(mut self, level: LogLevel) -> Self {
        self.level = level;
        self
    }

    pub fn with_identity(mut self, identity: Identity) -> Self {
        self.app_name = identity.app_name;
        self.correlation = identity.correlation;
        self.session = identity.session;
        self.user_id = identity.user_id;
        self.identifier = identity.identifier;
        self
    }

    pub fn with_queue_window(mut self, window: Duration) -> Self {
        self.queue_window_ms = window.as_millis() as u64;
        self
    }

    pub fn with_decorator_count(mut self, count: usize) -> Self {
        self.decorator_count = count;
        self
    }

    pub fn with_error_respects_level(mut self, respects: bool) -> Self {
        self.error_respects_level = respects;
        self
    }

    /// Identity described by this configuration
    pub fn identity(&self) -> Identity {
        Identity {
            app_name: self.app_name.clone(),
            correlation: self.correlation.clone(),
            session: self.session.clone(),
            user_id: self.user_id.clone(),
            identifier: self.identifier.clone(),
        }
    }

    pub fn queue_window(&self) -> Duration {
        Duration::from_millis(self.queue_window_ms)
    }

    /// Read the level override from the environment.
    ///
    /// A `.env` file is loaded into the process on the first call only; the
    /// variable itself is read on every call.
    pub fn env_override() -> Option<String> {
        DOTENV.call_once(|| {
            if let Ok(path) = dotenvy::dotenv() {
                debug!(path = %path.display(), "[Config] Loaded .env");
            }
        });
        std::env::var(LEVEL_ENV_VAR).ok()
    }

    /// Resolve the effective level.
    ///
    /// A parsable override always wins over the configured level; an
    /// unparsable one is ignored.
    pub fn resolve_level(&self, override_value: Option<&str>) -> LogLevel {
        match override_value.map(str::trim).filter(|v| !v.is_empty()) {
            Some(raw) => match LogLevel::parse(raw) {
                Some(level) => level,
                None => {
                    warn!(
                        value = raw,
                        configured = %self.level,
                        "[Config] Ignoring invalid {} override", LEVEL_ENV_VAR
                    );
                    self.level
                }
            },
            None => self.level,
        }
    }
}
