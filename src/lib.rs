//! # genrelay
//!
//! Request orchestration for rate-limited generative content providers.
//!
//! Every call to a generative provider goes through one entry point that
//! (a) avoids redundant calls for identical requests, (b) never exceeds a
//! global call-rate ceiling regardless of how many callers fire
//! concurrently, and (c) transparently recovers from transient provider
//! failures with a single, consistent error contract.
//!
//! ## Key pieces
//!
//! - **Unified entry point**: [`RequestOrchestrator::generate`] is the only
//!   way requests reach the provider
//! - **Response caching**: canonical [`cache::CacheKey`]s and a TTL store
//!   so logically equal requests within the window never hit the network
//! - **Pacing**: a process-wide [`resilience::RateLimiter`] enforcing a
//!   minimum spacing between transport departures
//! - **Classified retries**: [`retry::BackoffPolicy`] retries throttling,
//!   unavailability, and network drops with capped jittered backoff and
//!   fails everything else immediately
//! - **Cancellation**: [`cancel_pair`] lets a caller abandon a pending
//!   request at any suspension point without corrupting shared state
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use genrelay::{
//!     GenerationRequest, OrchestratorConfig, RequestOrchestrator,
//!     transport::HttpTransport,
//! };
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> genrelay::Result<()> {
//!     let transport = HttpTransport::new("https://proxy.example.com/generate")
//!         .map_err(genrelay::Error::Transport)?;
//!     let orchestrator =
//!         RequestOrchestrator::new(Arc::new(transport), OrchestratorConfig::default())?;
//!
//!     let request = GenerationRequest::new(serde_json::json!({
//!         "prompt": "a haiku about borrowed values",
//!     }));
//!     let result = orchestrator.generate(request).await?;
//!     println!("{}", result.text);
//!     Ok(())
//! }
//! ```
//!
//! ## Module organization
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`orchestrator`] | Entry point and per-call cancellation |
//! | [`cache`] | Canonical keys and the TTL response store |
//! | [`resilience`] | Minimum-interval call pacing |
//! | [`retry`] | Failure classification and backoff policy |
//! | [`transport`] | Transport seam and the reqwest implementation |
//! | [`config`] | Runtime tunables |
//! | [`types`] | Request/result/metadata types |

pub mod cache;
pub mod config;
pub mod orchestrator;
pub mod resilience;
pub mod retry;
pub mod transport;
pub mod types;

// Re-export main types for convenience
pub use cache::{CacheKey, CacheKeyGenerator};
pub use config::OrchestratorConfig;
pub use orchestrator::{cancel_pair, CancelHandle, CancelSignal, RequestOrchestrator};
pub use retry::{BackoffPolicy, FailureClass};
pub use transport::{TransportClient, TransportError};
pub use types::{CallStats, GenerationRequest, GenerationResult, ProviderMetadata};

/// Result type alias for the library
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for the library
pub mod error;
pub use error::Error;
