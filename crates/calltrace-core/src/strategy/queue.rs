//! Queue strategy - buffer across flows, flush after a quiet window
//!
//! Lines from every flow sharing a trace are appended in push order. When a
//! flow drains, a flush is scheduled `window` later; any new start cancels
//! it, and the next drain schedules a fresh one. A trace change flushes the
//! old trace's lines before the new trace's first line is buffered.

use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

use super::{emit_block, error_line, CallStack, StartEntry, Strategy, Transition};
use crate::domain::{now_millis, Mode, Trace};
use crate::sink::ConsoleSink;
use crate::timer::DebounceHandle;

pub struct QueueStrategy {
    shared: Arc<Mutex<QueueState>>,
    window: Duration,
}

struct QueueState {
    sink: Arc<dyn ConsoleSink>,
    stack: CallStack,
    buffer: Vec<String>,
    trace: Trace,
    flow_start: i64,
    flow_end: i64,
    pending: Option<DebounceHandle>,
}

impl QueueState {
    fn cancel_pending(&mut self) {
        if let Some(pending) = self.pending.take() {
            pending.cancel();
        }
    }

    fn flush(&mut self) {
        if self.buffer.is_empty() {
            return;
        }

        let end = if self.flow_end >= self.flow_start {
            self.flow_end
        } else {
            now_millis()
        };
        let elapsed = end - self.flow_start;
        debug!(
            trace = %self.trace,
            lines = self.buffer.len(),
            elapsed_ms = elapsed,
            "[Queue] Flushing buffer"
        );
        emit_block(self.sink.as_ref(), &self.trace, &self.buffer, elapsed);
        self.buffer.clear();
    }
}

impl QueueStrategy {
    pub fn new(trace: Trace, sink: Arc<dyn ConsoleSink>, window: Duration) -> Self {
        let now = now_millis();
        Self {
            shared: Arc::new(Mutex::new(QueueState {
                sink,
                stack: CallStack::new(),
                buffer: Vec::new(),
                trace,
                flow_start: now,
                flow_end: now,
                pending: None,
            })),
            window,
        }
    }

    /// Whether a debounced flush is currently scheduled
    pub fn has_pending_flush(&self) -> bool {
        self.shared
            .lock()
            .pending
            .as_ref()
            .is_some_and(|p| !p.is_finished())
    }

    /// A flow drained: schedule the debounced flush.
    fn schedule(&self, state: &mut QueueState) {
        state.flow_end = now_millis();
        state.cancel_pending();

        let scheduled_len = state.buffer.len();
        let shared = Arc::clone(&self.shared);
        let handle = DebounceHandle::schedule(self.window, move || async move {
            fire(&shared, scheduled_len);
        });

        match handle {
            Some(handle) => {
                debug!(
                    trace = %state.trace,
                    lines = scheduled_len,
                    window_ms = self.window.as_millis() as u64,
                    "[Queue] Flush scheduled"
                );
                state.pending = Some(handle);
            }
            None => {
                debug!("[Queue] No async runtime, flushing immediately");
                state.flush();
            }
        }
    }
}

/// Deadline reached: flush only if nothing was buffered since scheduling
fn fire(shared: &Mutex<QueueState>, scheduled_len: usize) {
    let mut state = shared.lock();
    if state.buffer.len() == scheduled_len && state.stack.is_idle() {
        state.flush();
    } else {
        debug!(
            scheduled = scheduled_len,
            current = state.buffer.len(),
            "[Queue] Buffer changed since scheduling, skipping flush"
        );
    }
}

impl Strategy for QueueStrategy {
    fn mode(&self) -> Mode {
        Mode::Queue
    }

    fn start_log(&mut self, entry: StartEntry) {
        let mut state = self.shared.lock();
        state.cancel_pending();

        if entry.trace != state.trace {
            debug!(
                old = %state.trace,
                new = %entry.trace,
                "[Queue] Trace rotated"
            );
            state.flush();
            state.trace = entry.trace.clone();
        }

        if state.stack.is_idle() {
            state.flow_start = entry.flow_start;
        }
        state
            .buffer
            .push(format!("{} - {}", entry.operation, entry.trace));
        state.stack.push(entry.operation);
    }

    fn end_log(&mut self, operation: &str, _status: Option<u16>) {
        let mut state = self.shared.lock();
        match state.stack.pop() {
            (Transition::Underflow, _) => {
                warn!(operation, "[Queue] end without a matching start, ignoring");
            }
            (Transition::Drained, _) => self.schedule(&mut state),
            _ => {}
        }
    }

    fn error_log(&mut self, origin: &str, message: &str, _status: Option<u16>) {
        let mut state = self.shared.lock();
        let (transition, _) = state.stack.pop();
        if transition == Transition::Underflow {
            warn!(origin, "[Queue] error without a matching start, ignoring");
            return;
        }

        let previous = state.buffer.pop();
        state.buffer.push(error_line(previous, origin, message));

        if transition == Transition::Drained {
            self.schedule(&mut state);
        }
    }

    fn output_log(&mut self) {
        let mut state = self.shared.lock();
        state.cancel_pending();
        state.flush();
    }

    fn depth(&self) -> usize {
        self.shared.lock().stack.depth()
    }

    fn buffered(&self) -> Vec<String> {
        self.shared.lock().buffer.clone()
    }
}
