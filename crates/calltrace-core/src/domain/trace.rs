//! Trace identifiers
//!
//! A trace names one logical flow end to end. Format:
//! `{correlation or "UNSET"}-{unique suffix}`.

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

/// Prefix used when no correlation is configured
pub const UNSET_CORRELATION: &str = "UNSET";

/// Global counter mixed into every suffix
static TRACE_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Generate a process-unique suffix.
///
/// Format: microsecond timestamp in hex followed by 4 hex chars of a
/// monotonically increasing counter (e.g. "61a8c4b2e9f10007").
pub fn generate_suffix() -> String {
    let counter = TRACE_COUNTER.fetch_add(1, Ordering::Relaxed);
    let timestamp = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_micros() as u64)
        .unwrap_or(0);

    format!("{:x}{:04x}", timestamp, counter & 0xFFFF)
}

/// Opaque trace identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Trace(String);

impl Trace {
    /// Generate a fresh trace for an optional correlation id
    pub fn generate(correlation: Option<&str>) -> Self {
        let prefix = correlation
            .filter(|c| !c.is_empty())
            .unwrap_or(UNSET_CORRELATION);
        Self(format!("{}-{}", prefix, generate_suffix()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Correlation part of the trace (everything before the suffix)
    pub fn correlation(&self) -> &str {
        self.0.rsplit_once('-').map(|(c, _)| c).unwrap_or(&self.0)
    }
}

impl From<String> for Trace {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for Trace {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl std::fmt::Display for Trace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
