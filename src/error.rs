use crate::transport::TransportError;
use thiserror::Error;

/// Unified error type for the orchestration runtime.
///
/// All terminal failures reach the caller through this type; transient
/// provider failures are absorbed by the retry loop and never surface
/// except as added latency. Nothing panics across the public boundary.
#[derive(Debug, Error)]
pub enum Error {
    /// A fatal transport failure (non-retryable status, malformed response).
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// The retry budget was spent on transient failures.
    #[error("retries exhausted after {attempts} attempts: {last_error}")]
    ExhaustedRetries {
        attempts: u32,
        #[source]
        last_error: TransportError,
    },

    /// The caller abandoned the request via its [`CancelHandle`](crate::CancelHandle).
    #[error("request cancelled by caller")]
    Cancelled,

    /// Misconfigured orchestrator parameters (caught at construction time).
    #[error("configuration error: {message}")]
    Configuration { message: String },
}

impl Error {
    pub fn configuration(message: impl Into<String>) -> Self {
        Error::Configuration {
            message: message.into(),
        }
    }

    /// Whether this terminal error was caused by spending the retry budget.
    pub fn is_exhausted(&self) -> bool {
        matches!(self, Error::ExhaustedRetries { .. })
    }
}
