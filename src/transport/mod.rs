//! The seam between the orchestrator and the network.
//!
//! The orchestrator consumes [`TransportClient`] as an opaque dependency;
//! it never inspects a transport beyond the [`TransportError`]
//! classification contract. [`HttpTransport`] is the provided
//! reqwest-backed implementation for a JSON provider proxy.

mod http;

pub use http::HttpTransport;

use crate::types::GenerationResult;
use async_trait::async_trait;
use thiserror::Error;

/// One attempt against the provider. Retries, pacing, and caching all live
/// above this trait.
#[async_trait]
pub trait TransportClient: Send + Sync {
    async fn call(&self, payload: &serde_json::Value) -> Result<GenerationResult, TransportError>;
}

/// Failure of a single transport attempt, carrying enough to classify it
/// as transient or fatal.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The provider answered with a non-success HTTP status.
    #[error("HTTP {status}: {message}")]
    Status { status: u16, message: String },

    /// No response was received at all (connect failure, timeout, dropped
    /// connection).
    #[error("network failure: {0}")]
    Network(String),

    /// The provider answered but the body was not a valid response.
    #[error("malformed provider response: {0}")]
    Malformed(String),
}

impl TransportError {
    pub fn status(&self) -> Option<u16> {
        match self {
            TransportError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}
