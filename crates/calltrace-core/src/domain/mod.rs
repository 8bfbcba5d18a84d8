//! Domain types
//!
//! - Identity and trace (who is logging, which flow)
//! - Levels and emitted records
//! - Logger configuration

pub mod config;
mod identity;
mod level;
mod record;
mod trace;

pub use config::{LoggerConfig, Mode};
pub use identity::{Identity, IdentityUpdate};
pub use level::LogLevel;
pub use record::{now_millis, LogRecord, RecordKind, DEFAULT_ERROR_STATUS, DEFAULT_STATUS};
pub use trace::{generate_suffix, Trace, UNSET_CORRELATION};
