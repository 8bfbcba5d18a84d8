//! Console sink - where formatted lines end up
//!
//! The sink is a collaborator: it prints leveled lines, keeps named timers
//! and nests visual groups. Two implementations ship with the crate:
//!
//! - [`StdConsole`]: stdout/stderr with indentation per open group
//! - [`MemorySink`]: records every call, for tests and embedders

use parking_lot::Mutex;
use std::collections::HashMap;
use std::io::Write;
use std::sync::Arc;
use std::time::Instant;
use tracing::warn;

use crate::domain::{LogRecord, RecordKind};

/// Spaces added per open group (matches the usual console indentation)
pub const GROUP_INDENTATION: usize = 6;

/// Print level understood by the sink
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SinkLevel {
    Debug,
    Info,
    Warn,
    Error,
    Log,
}

impl From<RecordKind> for SinkLevel {
    fn from(kind: RecordKind) -> Self {
        match kind {
            RecordKind::Debug => Self::Debug,
            RecordKind::Info => Self::Info,
            RecordKind::Warn => Self::Warn,
            RecordKind::Error => Self::Error,
        }
    }
}

/// Line sink used by the logger and its strategies
pub trait ConsoleSink: Send + Sync {
    /// Print one line at the given level
    fn print(&self, level: SinkLevel, line: &str);

    /// Start a named timer
    fn time(&self, label: &str);

    /// Stop a named timer and report its duration
    fn time_end(&self, label: &str);

    /// Open a nested group
    fn group(&self, collapsed: bool);

    /// Close the innermost group
    fn group_end(&self);

    /// Print a record as a JSON line at its own level
    fn record(&self, record: &LogRecord) {
        self.print(record.kind.into(), &record.to_line());
    }
}

/// Shared sink handle
pub type SharedSink = Arc<dyn ConsoleSink>;

// ============================================================================
// StdConsole
// ============================================================================

/// Console writing to stdout (debug/info/log) and stderr (warn/error)
#[derive(Default)]
pub struct StdConsole {
    state: Mutex<ConsoleState>,
}

#[derive(Default)]
struct ConsoleState {
    depth: usize,
    timers: HashMap<String, Instant>,
}

impl StdConsole {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shared() -> SharedSink {
        Arc::new(Self::new())
    }

    fn write(&self, level: SinkLevel, depth: usize, line: &str) {
        let indent = " ".repeat(depth * GROUP_INDENTATION);
        let text: String = line
            .split('\n')
            .map(|l| format!("{}{}", indent, l))
            .collect::<Vec<_>>()
            .join("\n");

        // Write failures on the console are not reportable anywhere useful
        match level {
            SinkLevel::Warn | SinkLevel::Error => {
                let _ = writeln!(std::io::stderr().lock(), "{}", text);
            }
            _ => {
                let _ = writeln!(std::io::stdout().lock(), "{}", text);
            }
        }
    }
}

impl ConsoleSink for StdConsole {
    fn print(&self, level: SinkLevel, line: &str) {
        let depth = self.state.lock().depth;
        self.write(level, depth, line);
    }

    fn time(&self, label: &str) {
        let mut state = self.state.lock();
        if state.timers.contains_key(label) {
            warn!(label, "[Console] Timer already exists");
            return;
        }
        state.timers.insert(label.to_string(), Instant::now());
    }

    fn time_end(&self, label: &str) {
        let (started, depth) = {
            let mut state = self.state.lock();
            (state.timers.remove(label), state.depth)
        };
        match started {
            Some(started) => {
                let ms = started.elapsed().as_secs_f64() * 1000.0;
                self.write(SinkLevel::Log, depth, &format!("{}: {:.3}ms", label, ms));
            }
            None => warn!(label, "[Console] No such timer"),
        }
    }

    fn group(&self, _collapsed: bool) {
        self.state.lock().depth += 1;
    }

    fn group_end(&self) {
        let mut state = self.state.lock();
        state.depth = state.depth.saturating_sub(1);
    }
}

// ============================================================================
// MemorySink
// ============================================================================

/// One recorded sink call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SinkEvent {
    Print { level: SinkLevel, line: String },
    Time(String),
    TimeEnd(String),
    Group { collapsed: bool },
    GroupEnd,
}

/// Sink that keeps every call in memory
#[derive(Default)]
pub struct MemorySink {
    inner: Mutex<MemoryState>,
}

#[derive(Default)]
struct MemoryState {
    events: Vec<SinkEvent>,
    depth: usize,
    depth_log: Vec<usize>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    /// All recorded events, oldest first
    pub fn events(&self) -> Vec<SinkEvent> {
        self.inner.lock().events.clone()
    }

    /// Lines printed at `level`
    pub fn lines(&self, level: SinkLevel) -> Vec<String> {
        self.inner
            .lock()
            .events
            .iter()
            .filter_map(|e| match e {
                SinkEvent::Print { level: l, line } if *l == level => Some(line.clone()),
                _ => None,
            })
            .collect()
    }

    /// Records printed at `level`, parsed back from their JSON lines
    pub fn records(&self, level: SinkLevel) -> Vec<LogRecord> {
        self.lines(level)
            .iter()
            .filter_map(|line| serde_json::from_str(line).ok())
            .collect()
    }

    /// Current group depth
    pub fn group_depth(&self) -> usize {
        self.inner.lock().depth
    }

    /// Group depth after every group/group_end call, in order
    pub fn depth_history(&self) -> Vec<usize> {
        self.inner.lock().depth_log.clone()
    }

    pub fn len(&self) -> usize {
        self.inner.lock().events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        let mut inner = self.inner.lock();
        inner.events.clear();
        inner.depth_log.clear();
    }
}

impl ConsoleSink for MemorySink {
    fn print(&self, level: SinkLevel, line: &str) {
        self.inner.lock().events.push(SinkEvent::Print {
            level,
            line: line.to_string(),
        });
    }

    fn time(&self, label: &str) {
        self.inner.lock().events.push(SinkEvent::Time(label.to_string()));
    }

    fn time_end(&self, label: &str) {
        self.inner
            .lock()
            .events
            .push(SinkEvent::TimeEnd(label.to_string()));
    }

    fn group(&self, collapsed: bool) {
        let mut inner = self.inner.lock();
        inner.depth += 1;
        let depth = inner.depth;
        inner.depth_log.push(depth);
        inner.events.push(SinkEvent::Group { collapsed });
    }

    fn group_end(&self) {
        let mut inner = self.inner.lock();
        inner.depth = inner.depth.saturating_sub(1);
        let depth = inner.depth;
        inner.depth_log.push(depth);
        inner.events.push(SinkEvent::GroupEnd);
    }
}
