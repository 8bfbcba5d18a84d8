//! # Calltrace Core Library
//!
//! Call-tracing logger: start/end/error telemetry around instrumented
//! operations, a rotating trace/correlation identity on every line, and
//! three output strategies.
//!
//! ## Modules
//!
//! - `domain` - Identity, trace, levels, records, configuration
//! - `sink` - Console sink trait and implementations
//! - `strategy` - Cascade, List and Queue strategies (call stack + buffering)
//! - `timer` - Cancellable debounce timer
//! - `logger` - Logger facade
//! - `channel` - Propagation of the current logger to instrumentation sites

pub mod channel;
pub mod domain;
pub mod error;
pub mod logger;
pub mod sink;
pub mod strategy;
pub mod timer;

pub use channel::{LoggerChannel, LoggerSubscription};
pub use domain::*;
pub use error::{CalltraceError, Result};
pub use logger::Logger;
pub use sink::{ConsoleSink, MemorySink, SharedSink, SinkEvent, SinkLevel, StdConsole};
pub use strategy::{CascadeStrategy, ListStrategy, QueueStrategy, StartEntry, Strategy};
