//! Mock instrumented service for testing
//!
//! `MockService::load` calls `MockService::save`, so one `load` produces a
//! nested flow of depth two.

use std::sync::atomic::{AtomicUsize, Ordering};
use thiserror::Error;

use calltrace_core::LoggerChannel;
use calltrace_instrument::{Instrument, InstrumentError};

/// Operation error used by the fixtures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct Boom(pub String);

impl Boom {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

pub struct MockService {
    load: Instrument,
    save: Instrument,
    saves: AtomicUsize,
}

impl MockService {
    pub fn new(channel: &LoggerChannel) -> Self {
        Self {
            load: Instrument::from_channel("load", channel),
            save: Instrument::from_channel("save", channel),
            saves: AtomicUsize::new(0),
        }
    }

    /// Fails when `value` is zero
    pub async fn save(&self, value: u32) -> Result<u32, InstrumentError<Boom>> {
        self.save
            .run(async {
                tokio::task::yield_now().await;
                if value == 0 {
                    return Err(Boom::new("empty value"));
                }
                self.saves.fetch_add(1, Ordering::SeqCst);
                Ok(value)
            })
            .await
    }

    /// Loads and saves; a failing save fails the load
    pub async fn load(&self, value: u32) -> Result<u32, InstrumentError<Boom>> {
        self.load
            .run(async {
                tokio::task::yield_now().await;
                self.save(value).await.map_err(|e| match e {
                    InstrumentError::Operation(boom) => boom,
                    InstrumentError::Unbound { operation } => Boom(operation),
                })
            })
            .await
    }

    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }
}
