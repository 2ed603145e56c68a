//! Core request/response types shared across the runtime.

use crate::cache::CacheKey;
use serde::{Deserialize, Serialize};

/// A single generation request: the provider payload plus the canonical
/// key identifying logically equivalent requests for caching.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    pub payload: serde_json::Value,
    pub cache_key: CacheKey,
}

impl GenerationRequest {
    /// Build a request whose cache key is derived from the payload itself.
    ///
    /// The key covers the whole payload; callers whose payloads carry
    /// non-deterministic fields (timestamps, random tone selection) should
    /// compute a key over the semantically relevant subset with
    /// [`CacheKeyGenerator`](crate::cache::CacheKeyGenerator) and use
    /// [`with_key`](Self::with_key) instead.
    pub fn new(payload: serde_json::Value) -> Self {
        let cache_key = CacheKey::from_payload(&payload);
        Self { payload, cache_key }
    }

    /// Build a request with an explicitly supplied canonical key.
    pub fn with_key(payload: serde_json::Value, cache_key: CacheKey) -> Self {
        Self { payload, cache_key }
    }
}

/// A successful generation outcome.
///
/// Terminal failures travel through the `Err` arm of
/// [`Result<GenerationResult, Error>`](crate::Result); there is no error
/// field here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationResult {
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<ProviderMetadata>,
}

impl GenerationResult {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            metadata: None,
        }
    }

    pub fn with_metadata(mut self, metadata: ProviderMetadata) -> Self {
        self.metadata = Some(metadata);
        self
    }
}

/// Optional provider echo attached to a result.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProviderMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage: Option<serde_json::Value>,
}

/// Per-call accounting returned by
/// [`generate_with_stats`](crate::RequestOrchestrator::generate_with_stats).
#[derive(Debug, Clone)]
pub struct CallStats {
    /// Whether the result came from the response cache.
    pub cache_hit: bool,
    /// Transport invocations made for this call (0 on a cache hit).
    pub attempts: u32,
    pub duration_ms: u128,
    /// Correlation id generated per call and attached to transport logging.
    pub client_request_id: String,
}
