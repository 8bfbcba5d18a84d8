//! List strategy - buffer one flow, flush when it drains

use std::sync::Arc;
use tracing::{debug, warn};

use super::{emit_block, error_line, CallStack, StartEntry, Strategy, Transition};
use crate::domain::{now_millis, Mode, Trace};
use crate::sink::ConsoleSink;

/// Buffers one line per start and writes the whole flow as one block.
///
/// A failure rewrites the most recently buffered line. That assumes the
/// failing call is the last one started; interleaved flows sharing this
/// strategy can annotate the wrong line.
pub struct ListStrategy {
    sink: Arc<dyn ConsoleSink>,
    stack: CallStack,
    buffer: Vec<String>,
    trace: Trace,
    flow_start: i64,
}

impl ListStrategy {
    pub fn new(trace: Trace, sink: Arc<dyn ConsoleSink>) -> Self {
        Self {
            sink,
            stack: CallStack::new(),
            buffer: Vec::new(),
            trace,
            flow_start: now_millis(),
        }
    }
}

impl Strategy for ListStrategy {
    fn mode(&self) -> Mode {
        Mode::List
    }

    fn start_log(&mut self, entry: StartEntry) {
        self.trace = entry.trace;
        self.flow_start = entry.flow_start;
        self.buffer
            .push(format!("{} - {}", entry.operation, entry.timestamp));
        self.stack.push(entry.operation);
    }

    fn end_log(&mut self, operation: &str, _status: Option<u16>) {
        match self.stack.pop() {
            (Transition::Underflow, _) => {
                warn!(operation, "[List] end without a matching start, ignoring");
            }
            (Transition::Drained, _) => self.output_log(),
            _ => {}
        }
    }

    fn error_log(&mut self, origin: &str, message: &str, _status: Option<u16>) {
        let (transition, _) = self.stack.pop();
        if transition == Transition::Underflow {
            warn!(origin, "[List] error without a matching start, ignoring");
            return;
        }

        let previous = self.buffer.pop();
        self.buffer.push(error_line(previous, origin, message));

        if transition == Transition::Drained {
            self.output_log();
        }
    }

    fn output_log(&mut self) {
        if self.buffer.is_empty() {
            return;
        }

        let elapsed = now_millis() - self.flow_start;
        debug!(
            trace = %self.trace,
            lines = self.buffer.len(),
            elapsed_ms = elapsed,
            "[List] Flushing flow"
        );
        emit_block(self.sink.as_ref(), &self.trace, &self.buffer, elapsed);
        self.buffer.clear();
    }

    fn depth(&self) -> usize {
        self.stack.depth()
    }

    fn buffered(&self) -> Vec<String> {
        self.buffer.clone()
    }
}
