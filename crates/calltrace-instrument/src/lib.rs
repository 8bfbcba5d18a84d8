//! # Calltrace Instrumentation
//!
//! Wraps async operations with start/end/error telemetry. Each
//! instrumentation site subscribes once to a [`LoggerChannel`] and always
//! reports to the most recently published logger.
//!
//! ```ignore
//! let channel = LoggerChannel::for_config(&config);
//! let load = Instrument::from_channel("load_order", &channel);
//!
//! let logger = Logger::new(config, StdConsole::shared(), &channel);
//! logger.refresh_instance(IdentityUpdate::new().session("s1"));
//!
//! let order = load.run(repo.load(id)).await?;
//! ```

mod error;

pub use error::InstrumentError;

use std::fmt::Display;
use std::future::Future;
use std::sync::Arc;
use tracing::warn;

use calltrace_core::{Logger, LoggerChannel, LoggerSubscription};

/// One instrumented operation
#[derive(Debug, Clone)]
pub struct Instrument {
    operation: String,
    subscription: LoggerSubscription,
}

impl Instrument {
    pub fn new(operation: impl Into<String>, subscription: LoggerSubscription) -> Self {
        Self {
            operation: operation.into(),
            subscription,
        }
    }

    /// Subscribe to `channel` and instrument `operation`
    pub fn from_channel(operation: impl Into<String>, channel: &LoggerChannel) -> Self {
        Self::new(operation, channel.subscribe())
    }

    pub fn operation(&self) -> &str {
        &self.operation
    }

    /// The logger calls are currently reported to
    pub fn logger(&self) -> Option<Arc<Logger>> {
        self.subscription.current()
    }

    fn bound<E>(&self) -> Result<Arc<Logger>, InstrumentError<E>> {
        self.subscription.current().ok_or_else(|| {
            warn!(
                operation = %self.operation,
                "[Instrument] Invoked before any logger was published"
            );
            InstrumentError::Unbound {
                operation: self.operation.clone(),
            }
        })
    }

    /// Run `future` between `start` and exactly one of `end` / `error`.
    ///
    /// Fails with [`InstrumentError::Unbound`] without polling the future
    /// when no logger has been published yet. Operation errors are logged
    /// and returned unchanged.
    pub async fn run<Fut, T, E>(&self, future: Fut) -> Result<T, InstrumentError<E>>
    where
        Fut: Future<Output = Result<T, E>>,
        E: Display,
    {
        let logger = self.bound()?;
        traced(&logger, &self.operation, future).await
    }

    /// Turn `f` into a traced function
    pub fn wrap<F>(self, f: F) -> TracedFn<F> {
        TracedFn {
            instrument: self,
            f,
        }
    }
}

async fn traced<Fut, T, E>(logger: &Logger, operation: &str, future: Fut) -> Result<T, InstrumentError<E>>
where
    Fut: Future<Output = Result<T, E>>,
    E: Display,
{
    logger.start(operation, None);
    match future.await {
        Ok(value) => {
            logger.end(operation, None);
            Ok(value)
        }
        Err(e) => {
            logger.error(operation, &e, None);
            Err(InstrumentError::Operation(e))
        }
    }
}

/// A function whose every call is instrumented
#[derive(Debug, Clone)]
pub struct TracedFn<F> {
    instrument: Instrument,
    f: F,
}

impl<F> TracedFn<F> {
    pub fn instrument(&self) -> &Instrument {
        &self.instrument
    }

    /// Call the wrapped function; it is not invoked when unbound
    pub async fn call<A, Fut, T, E>(&self, args: A) -> Result<T, InstrumentError<E>>
    where
        F: Fn(A) -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: Display,
    {
        let logger = self.instrument.bound()?;
        traced(&logger, &self.instrument.operation, (self.f)(args)).await
    }
}
