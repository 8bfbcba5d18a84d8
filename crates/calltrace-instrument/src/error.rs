//! Instrumentation errors

use thiserror::Error;

/// Outcome of an instrumented call that did not succeed
#[derive(Debug, Error)]
pub enum InstrumentError<E> {
    /// Invoked before any logger was published on the channel
    #[error("no logger bound for '{operation}', publish a logger before invoking it")]
    Unbound { operation: String },

    /// The wrapped operation failed; the error is returned unchanged
    #[error("{0}")]
    Operation(E),
}

impl<E> InstrumentError<E> {
    pub fn is_unbound(&self) -> bool {
        matches!(self, Self::Unbound { .. })
    }

    /// The wrapped operation's own error, if that is what failed
    pub fn into_operation(self) -> Option<E> {
        match self {
            Self::Operation(e) => Some(e),
            Self::Unbound { .. } => None,
        }
    }
}
