//! Logger facade
//!
//! A `Logger` is an immutable identity snapshot (identity, trace, flow
//! start) bound to a shared strategy and sink. Refreshing the identity
//! builds a new snapshot that shares the same strategy, then publishes it on
//! the logger channel so every instrumentation site picks it up.

use parking_lot::Mutex;
use std::fmt::Display;
use std::sync::Arc;
use tracing::debug;

use crate::channel::{LoggerChannel, WeakLoggerChannel};
use crate::domain::{
    now_millis, Identity, IdentityUpdate, LogLevel, LogRecord, LoggerConfig, Mode, RecordKind,
    Trace, DEFAULT_STATUS,
};
use crate::sink::SharedSink;
use crate::strategy::{build_strategy, SharedStrategy, StartEntry};

pub struct Logger {
    identity: Identity,
    trace: Trace,
    flow_start: i64,
    level: LogLevel,
    config: LoggerConfig,
    strategy: SharedStrategy,
    sink: SharedSink,
    channel: WeakLoggerChannel,
}

impl Logger {
    /// Build a logger; `LOG_LEVEL` in the environment overrides `config.level`.
    ///
    /// The logger is not published; call [`Logger::publish`] or
    /// [`Logger::refresh_instance`] to bind instrumentation sites.
    pub fn new(config: LoggerConfig, sink: SharedSink, channel: &LoggerChannel) -> Arc<Self> {
        let override_value = LoggerConfig::env_override();
        Self::with_level_override(config, override_value.as_deref(), sink, channel)
    }

    /// Build a logger with an explicit level override instead of the environment
    pub fn with_level_override(
        config: LoggerConfig,
        override_value: Option<&str>,
        sink: SharedSink,
        channel: &LoggerChannel,
    ) -> Arc<Self> {
        let level = config.resolve_level(override_value);
        let identity = config.identity();
        let trace = Trace::generate(identity.correlation.as_deref());
        let strategy = build_strategy(
            config.mode,
            trace.clone(),
            Arc::clone(&sink),
            config.queue_window(),
        );

        debug!(
            trace = %trace,
            level = %level,
            mode = config.mode.as_str(),
            "[Logger] Created"
        );

        Arc::new(Self {
            identity,
            trace,
            flow_start: now_millis(),
            level,
            config,
            strategy: Arc::new(Mutex::new(strategy)),
            sink,
            channel: channel.downgrade(),
        })
    }

    /// Rotate the identity.
    ///
    /// Truthy fields of `update` overwrite the current identity, the trace is
    /// regenerated and the flow start reset. The new logger shares this
    /// logger's strategy and is published on the channel.
    pub fn refresh_instance(&self, update: IdentityUpdate) -> Arc<Logger> {
        let identity = self.identity.merged(&update);
        let refreshed = Arc::new(Logger {
            trace: Trace::generate(identity.correlation.as_deref()),
            identity,
            flow_start: now_millis(),
            level: self.level,
            config: self.config.clone(),
            strategy: Arc::clone(&self.strategy),
            sink: Arc::clone(&self.sink),
            channel: self.channel.clone(),
        });

        debug!(
            old = %self.trace,
            new = %refreshed.trace,
            "[Logger] Identity refreshed"
        );
        refreshed.publish();
        refreshed
    }

    /// Publish this logger on its channel without rotating
    ///
    /// Returns the number of subscribers notified.
    pub fn publish(self: &Arc<Self>) -> usize {
        match self.channel.upgrade() {
            Some(channel) => channel.publish(Arc::clone(self)),
            None => {
                debug!(trace = %self.trace, "[Logger] Channel dropped, nothing to publish to");
                0
            }
        }
    }

    /// An instrumented operation started
    pub fn start(&self, operation: &str, status: Option<u16>) {
        if self.level.is_off() {
            return;
        }
        let entry = StartEntry {
            operation: operation.to_string(),
            timestamp: now_millis(),
            trace: self.trace.clone(),
            flow_start: self.flow_start,
            status,
            identity: self.identity.clone(),
        };
        self.strategy.lock().start_log(entry);
    }

    /// An instrumented operation finished successfully
    pub fn end(&self, operation: &str, status: Option<u16>) {
        if self.level.is_off() {
            return;
        }
        self.strategy.lock().end_log(operation, status);
    }

    /// An instrumented operation failed
    pub fn error(&self, origin: &str, error: &dyn Display, status: Option<u16>) {
        if self.level.is_off() && self.config.error_respects_level {
            return;
        }
        let message = error.to_string();
        self.strategy.lock().error_log(origin, &message, status);
    }

    pub fn debug(&self, origin: &str, message: &str, status: Option<u16>) {
        self.emit(RecordKind::Debug, origin, message, status);
    }

    pub fn info(&self, origin: &str, message: &str, status: Option<u16>) {
        self.emit(RecordKind::Info, origin, message, status);
    }

    pub fn warn(&self, origin: &str, message: &str, status: Option<u16>) {
        self.emit(RecordKind::Warn, origin, message, status);
    }

    /// Flush the strategy's buffer now
    pub fn output_log(&self) {
        self.strategy.lock().output_log();
    }

    fn emit(&self, kind: RecordKind, origin: &str, message: &str, status: Option<u16>) {
        if !self.level.allows(kind.level()) {
            return;
        }
        let record = LogRecord::new(
            kind,
            origin,
            message,
            &self.trace,
            status.unwrap_or(DEFAULT_STATUS),
        )
        .with_identity(&self.identity);
        self.sink.record(&record);
    }

    pub fn trace(&self) -> &Trace {
        &self.trace
    }

    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    pub fn level(&self) -> LogLevel {
        self.level
    }

    pub fn mode(&self) -> Mode {
        self.config.mode
    }

    /// Epoch milliseconds when the current flow window started
    pub fn flow_start(&self) -> i64 {
        self.flow_start
    }

    pub fn config(&self) -> &LoggerConfig {
        &self.config
    }

    /// Current call stack depth of the shared strategy
    pub fn depth(&self) -> usize {
        self.strategy.lock().depth()
    }

    /// Lines waiting for the next flush
    pub fn buffered(&self) -> Vec<String> {
        self.strategy.lock().buffered()
    }
}

impl std::fmt::Debug for Logger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Logger")
            .field("trace", &self.trace)
            .field("identity", &self.identity)
            .field("level", &self.level)
            .field("mode", &self.config.mode)
            .finish()
    }
}
