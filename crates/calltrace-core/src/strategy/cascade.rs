//! Cascade strategy - immediate output, one nested group per in-flight call

use std::sync::Arc;
use tracing::warn;

use super::{timer_label, CallStack, StartEntry, Strategy, Transition};
use crate::domain::{
    Identity, LogRecord, Mode, RecordKind, Trace, DEFAULT_ERROR_STATUS, DEFAULT_STATUS,
};
use crate::sink::{ConsoleSink, SinkLevel};

/// Trace and identity a call was started under
struct Frame {
    trace: Trace,
    identity: Identity,
}

/// Writes every start/end/error as it happens.
///
/// The "called" line is printed at the caller's depth, then a collapsed group
/// is opened for everything the call does. Success and failure both close
/// that group, so the open group count always equals the stack depth.
///
/// Each call is closed under the trace it was started with, so its timer
/// label still matches after an identity refresh inside the flow.
pub struct CascadeStrategy {
    sink: Arc<dyn ConsoleSink>,
    stack: CallStack,
    frames: Vec<Frame>,
    trace: Trace,
    identity: Identity,
}

impl CascadeStrategy {
    pub fn new(trace: Trace, sink: Arc<dyn ConsoleSink>) -> Self {
        Self {
            sink,
            stack: CallStack::new(),
            frames: Vec::new(),
            trace,
            identity: Identity::default(),
        }
    }

    fn record(&self, frame: &Frame, kind: RecordKind, origin: &str, message: String, status: u16) {
        let record = LogRecord::new(kind, origin, message, &frame.trace, status)
            .with_identity(&frame.identity);
        self.sink.record(&record);
    }

    /// Pop the innermost call together with the frame it was started under
    fn pop(&mut self) -> (Transition, Option<Frame>) {
        let (transition, _) = self.stack.pop();
        let frame = match transition {
            Transition::Underflow => None,
            _ => self.frames.pop(),
        };
        (transition, frame)
    }

    /// Frame for a record with no matching start
    fn current_frame(&self) -> Frame {
        Frame {
            trace: self.trace.clone(),
            identity: self.identity.clone(),
        }
    }

    fn separate_if_drained(&self, transition: Transition) {
        if transition == Transition::Drained {
            self.sink.print(SinkLevel::Log, "");
        }
    }
}

impl Strategy for CascadeStrategy {
    fn mode(&self) -> Mode {
        Mode::Cascade
    }

    fn start_log(&mut self, entry: StartEntry) {
        self.trace = entry.trace.clone();
        self.identity = entry.identity.clone();
        let frame = Frame {
            trace: entry.trace,
            identity: entry.identity,
        };

        self.sink.time(&timer_label(&entry.operation, &frame.trace));
        self.record(
            &frame,
            RecordKind::Info,
            &entry.operation,
            format!("{} called", entry.operation),
            entry.status.unwrap_or(DEFAULT_STATUS),
        );
        self.sink.group(true);
        self.stack.push(entry.operation);
        self.frames.push(frame);
    }

    fn end_log(&mut self, operation: &str, status: Option<u16>) {
        let (transition, frame) = self.pop();
        let Some(frame) = frame else {
            warn!(operation, "[Cascade] end without a matching start, ignoring");
            return;
        };

        self.sink.group_end();
        self.record(
            &frame,
            RecordKind::Info,
            operation,
            format!("{} invoked successfully", operation),
            status.unwrap_or(DEFAULT_STATUS),
        );
        self.sink.time_end(&timer_label(operation, &frame.trace));
        self.separate_if_drained(transition);
    }

    fn error_log(&mut self, origin: &str, message: &str, status: Option<u16>) {
        let status = status.unwrap_or(DEFAULT_ERROR_STATUS);
        let (transition, frame) = self.pop();
        let Some(frame) = frame else {
            warn!(origin, "[Cascade] error without a matching start");
            let orphan = self.current_frame();
            self.record(&orphan, RecordKind::Error, origin, message.to_string(), status);
            return;
        };

        self.sink.group_end();
        self.record(&frame, RecordKind::Error, origin, message.to_string(), status);
        self.sink.time_end(&timer_label(origin, &frame.trace));
        self.separate_if_drained(transition);
    }

    fn output_log(&mut self) {}

    fn depth(&self) -> usize {
        self.stack.depth()
    }

    fn buffered(&self) -> Vec<String> {
        Vec::new()
    }
}
