//! Output strategies - the trace-lifecycle engine
//!
//! Every strategy tracks one call stack and decides when lines reach the
//! sink:
//!
//! ```text
//!                 start            start / end (depth > 0)
//!   Idle ───────────────► Active ◄────────────────┐
//!    ▲                      │  └──────────────────┘
//!    │        flush         │ end / error (depth → 0)
//!    └──────────────── FlushPending
//! ```
//!
//! - [`CascadeStrategy`]: no buffering, one group per in-flight call
//! - [`ListStrategy`]: buffer one flow, flush when it drains
//! - [`QueueStrategy`]: buffer across flows, flush after a quiet window

mod cascade;
mod list;
mod queue;
mod stack;

pub use cascade::CascadeStrategy;
pub use list::ListStrategy;
pub use queue::QueueStrategy;
pub use stack::{CallStack, FlowState, Transition};

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;

use crate::domain::{Identity, Mode, Trace};
use crate::sink::{ConsoleSink, SinkLevel};

/// Input of `Strategy::start_log`
#[derive(Debug, Clone)]
pub struct StartEntry {
    pub operation: String,

    /// Epoch milliseconds when the call started
    pub timestamp: i64,

    pub trace: Trace,

    /// Epoch milliseconds when the logger's current flow started
    pub flow_start: i64,

    pub status: Option<u16>,

    pub identity: Identity,
}

/// Capability set shared by all output strategies
pub trait Strategy: Send {
    fn mode(&self) -> Mode;

    /// An instrumented call started
    fn start_log(&mut self, entry: StartEntry);

    /// The innermost call finished successfully
    fn end_log(&mut self, operation: &str, status: Option<u16>);

    /// The innermost call failed with `message`
    fn error_log(&mut self, origin: &str, message: &str, status: Option<u16>);

    /// Flush whatever is buffered (no-op when empty)
    fn output_log(&mut self);

    /// Current call stack depth
    fn depth(&self) -> usize;

    /// Lines waiting for the next flush
    fn buffered(&self) -> Vec<String>;
}

/// Strategy shared between a logger and its refreshed successors
pub type SharedStrategy = Arc<Mutex<Box<dyn Strategy>>>;

/// Build the strategy for `mode`
pub fn build_strategy(
    mode: Mode,
    trace: Trace,
    sink: Arc<dyn ConsoleSink>,
    queue_window: Duration,
) -> Box<dyn Strategy> {
    match mode {
        Mode::Cascade => Box::new(CascadeStrategy::new(trace, sink)),
        Mode::List => Box::new(ListStrategy::new(trace, sink)),
        Mode::Queue => Box::new(QueueStrategy::new(trace, sink, queue_window)),
    }
}

/// Render a flushed buffer as one block
pub fn format_block(trace: &Trace, lines: &[String], elapsed_ms: i64) -> String {
    let list = serde_json::to_string(lines).unwrap_or_else(|_| lines.join(", "));
    format!("\n{} => {} - {}ms\n", trace, list, elapsed_ms.max(0))
}

/// Write a flushed buffer to the sink inside one collapsed group
pub(crate) fn emit_block(sink: &dyn ConsoleSink, trace: &Trace, lines: &[String], elapsed_ms: i64) {
    sink.group(true);
    sink.print(SinkLevel::Log, &format_block(trace, lines, elapsed_ms));
    sink.group_end();
}

/// Label used for the per-call console timer
pub(crate) fn timer_label(operation: &str, trace: &Trace) -> String {
    format!("{} - {}", operation, trace)
}

/// Replacement for the most recent buffered line after a failure
pub(crate) fn error_line(previous: Option<String>, origin: &str, message: &str) -> String {
    format!("Error: {} - {}", previous.as_deref().unwrap_or(origin), message)
}
