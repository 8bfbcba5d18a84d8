//! Logger Channel - propagates the current logger to instrumentation sites
//!
//! Every refresh of a logger's identity produces a new [`Logger`] snapshot.
//! The channel holds the most recent snapshot so that independently
//! instrumented call sites stay bound to one identity.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                LoggerChannel (watch channel)              │
//! │                                                           │
//! │  Publisher:                     Subscribers:              │
//! │  └─ Logger::refresh_instance    ├─ Instrument("load")     │
//! │                                 ├─ Instrument("save")     │
//! │                                 └─ ...                    │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! # Usage
//!
//! ```ignore
//! let channel = LoggerChannel::for_config(&config);
//! let logger = Logger::new(config, StdConsole::shared(), &channel);
//!
//! // Instrumentation sites subscribe once
//! let load = Instrument::new("load", channel.subscribe());
//!
//! // Rotating the identity rebinds every subscriber
//! logger.refresh_instance(IdentityUpdate::new().session("s2"));
//! ```

use std::sync::{Arc, Weak};
use tokio::sync::watch;
use tracing::{debug, warn};

use crate::domain::config::DEFAULT_DECORATOR_COUNT;
use crate::domain::LoggerConfig;
use crate::logger::Logger;

type Slot = Option<Arc<Logger>>;

struct ChannelInner {
    sender: watch::Sender<Slot>,
    max_subscribers: usize,
}

/// Channel carrying the current logger
///
/// Cheap to clone; all clones share one slot.
#[derive(Clone)]
pub struct LoggerChannel {
    inner: Arc<ChannelInner>,
}

impl LoggerChannel {
    /// Create a channel with the default subscriber ceiling
    pub fn new() -> Self {
        Self::with_max_subscribers(DEFAULT_DECORATOR_COUNT)
    }

    /// Create a channel warning once more than `max` sites subscribe
    pub fn with_max_subscribers(max: usize) -> Self {
        let (sender, _) = watch::channel(None);
        Self {
            inner: Arc::new(ChannelInner {
                sender,
                max_subscribers: max,
            }),
        }
    }

    /// Create a channel using the configured `decorator_count`
    pub fn for_config(config: &LoggerConfig) -> Self {
        Self::with_max_subscribers(config.decorator_count)
    }

    /// Publish a logger as the current one
    ///
    /// Returns the number of subscribers notified. Zero subscribers is not
    /// an error: later subscribers still see the published logger.
    pub fn publish(&self, logger: Arc<Logger>) -> usize {
        let trace = logger.trace().to_string();
        self.inner.sender.send_replace(Some(logger));
        let count = self.inner.sender.receiver_count();
        debug!(trace, receivers = count, "[LoggerChannel] Published logger");
        count
    }

    /// Subscribe an instrumentation site
    pub fn subscribe(&self) -> LoggerSubscription {
        let receiver = self.inner.sender.subscribe();
        let count = self.inner.sender.receiver_count();
        if count > self.inner.max_subscribers {
            warn!(
                subscribers = count,
                max = self.inner.max_subscribers,
                "[LoggerChannel] Subscriber ceiling exceeded, possible subscription leak"
            );
        }
        LoggerSubscription { receiver }
    }

    /// The most recently published logger, if any
    pub fn current(&self) -> Option<Arc<Logger>> {
        self.inner.sender.borrow().clone()
    }

    /// Number of live subscriptions
    pub fn subscriber_count(&self) -> usize {
        self.inner.sender.receiver_count()
    }

    pub fn max_subscribers(&self) -> usize {
        self.inner.max_subscribers
    }

    pub(crate) fn downgrade(&self) -> WeakLoggerChannel {
        WeakLoggerChannel {
            inner: Arc::downgrade(&self.inner),
        }
    }
}

impl Default for LoggerChannel {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for LoggerChannel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoggerChannel")
            .field("subscribers", &self.subscriber_count())
            .field("max_subscribers", &self.inner.max_subscribers)
            .finish()
    }
}

/// Non-owning channel reference held by loggers
///
/// The channel slot owns the logger, so the logger must not own the channel.
#[derive(Clone, Default)]
pub(crate) struct WeakLoggerChannel {
    inner: Weak<ChannelInner>,
}

impl WeakLoggerChannel {
    pub(crate) fn upgrade(&self) -> Option<LoggerChannel> {
        self.inner.upgrade().map(|inner| LoggerChannel { inner })
    }
}

/// Subscription held by one instrumentation site
#[derive(Clone)]
pub struct LoggerSubscription {
    receiver: watch::Receiver<Slot>,
}

impl LoggerSubscription {
    /// The logger this site is currently bound to
    pub fn current(&self) -> Option<Arc<Logger>> {
        self.receiver.borrow().clone()
    }

    pub fn is_bound(&self) -> bool {
        self.receiver.borrow().is_some()
    }

    /// Wait for the next publish
    ///
    /// Returns `None` once the channel is gone.
    pub async fn changed(&mut self) -> Option<Arc<Logger>> {
        self.receiver.changed().await.ok()?;
        self.receiver.borrow_and_update().clone()
    }
}

impl std::fmt::Debug for LoggerSubscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoggerSubscription")
            .field("bound", &self.is_bound())
            .finish()
    }
}
