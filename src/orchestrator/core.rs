use super::cancel::CancelSignal;
use crate::cache::{CacheStats, ResponseCache};
use crate::config::OrchestratorConfig;
use crate::resilience::{RateLimiter, RateLimiterSnapshot};
use crate::retry::{BackoffPolicy, Decision, RetryState};
use crate::transport::TransportClient;
use crate::types::{CallStats, GenerationRequest, GenerationResult};
use crate::{Error, Result};
use std::sync::Arc;
use tokio::time::Instant;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// The single public entry point for provider calls.
///
/// Composes the response cache, the process-wide rate limiter, and the
/// backoff policy around an opaque transport:
/// cache lookup, then a paced and retried transport call, then a cache
/// write on success. All call sites share one instance so the pacing
/// ceiling and the cache are global. The orchestrator itself holds no
/// mutable state across calls beyond those two shared components.
pub struct RequestOrchestrator {
    transport: Arc<dyn TransportClient>,
    cache: ResponseCache,
    limiter: RateLimiter,
    policy: BackoffPolicy,
}

impl RequestOrchestrator {
    pub fn new(transport: Arc<dyn TransportClient>, config: OrchestratorConfig) -> Result<Self> {
        config.validate()?;
        let cache = if config.cache_enabled {
            ResponseCache::new(config.cache_ttl, config.cache_max_entries)
        } else {
            ResponseCache::disabled()
        };
        Ok(Self {
            transport,
            cache,
            limiter: RateLimiter::new(config.min_interval),
            policy: BackoffPolicy::new(
                config.max_retries,
                config.initial_delay,
                config.max_delay,
                config.jitter,
            ),
        })
    }

    /// Build with default configuration.
    pub fn with_defaults(transport: Arc<dyn TransportClient>) -> Self {
        match Self::new(transport, OrchestratorConfig::default()) {
            Ok(orchestrator) => orchestrator,
            Err(_) => unreachable!("default configuration always validates"),
        }
    }

    /// Resolve a request to a result, transparently absorbing transient
    /// provider failures.
    pub async fn generate(&self, request: GenerationRequest) -> Result<GenerationResult> {
        let (result, _) = self
            .generate_inner(request, CancelSignal::never())
            .await?;
        Ok(result)
    }

    /// Like [`generate`](Self::generate), abandoning cleanly when the
    /// paired [`CancelHandle`](super::CancelHandle) fires. An abandoned
    /// call never writes the cache and never disturbs the limiter's
    /// departure clock.
    pub async fn generate_with_cancel(
        &self,
        request: GenerationRequest,
        signal: CancelSignal,
    ) -> Result<GenerationResult> {
        let (result, _) = self.generate_inner(request, signal).await?;
        Ok(result)
    }

    /// Like [`generate`](Self::generate), additionally reporting per-call
    /// accounting.
    pub async fn generate_with_stats(
        &self,
        request: GenerationRequest,
    ) -> Result<(GenerationResult, CallStats)> {
        self.generate_inner(request, CancelSignal::never()).await
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    pub async fn limiter_snapshot(&self) -> RateLimiterSnapshot {
        self.limiter.snapshot().await
    }

    async fn generate_inner(
        &self,
        request: GenerationRequest,
        mut signal: CancelSignal,
    ) -> Result<(GenerationResult, CallStats)> {
        let start = Instant::now();
        let client_request_id = Uuid::new_v4().to_string();
        let key = request.cache_key.clone();

        // cache hit: no limiter acquisition, no transport call
        if let Some(hit) = self.cache.get(&key) {
            debug!(
                key = key.as_str(),
                request_id = client_request_id.as_str(),
                "serving generation from cache"
            );
            let stats = CallStats {
                cache_hit: true,
                attempts: 0,
                duration_ms: start.elapsed().as_millis(),
                client_request_id,
            };
            return Ok((hit, stats));
        }

        let mut retry = RetryState::new(&self.policy);
        loop {
            if signal.is_cancelled() {
                return Err(Error::Cancelled);
            }
            // re-acquired on every attempt: backoff time spent sleeping does
            // not exempt a retry from the global spacing
            self.limiter.acquire_cancellable(&mut signal).await?;

            match self.transport.call(&request.payload).await {
                Ok(result) => {
                    retry.record_attempt();
                    self.cache.put(&key, result.clone());
                    info!(
                        key = key.as_str(),
                        request_id = client_request_id.as_str(),
                        attempts = retry.attempts(),
                        duration_ms = start.elapsed().as_millis() as u64,
                        "generation complete"
                    );
                    let stats = CallStats {
                        cache_hit: false,
                        attempts: retry.attempts(),
                        duration_ms: start.elapsed().as_millis(),
                        client_request_id,
                    };
                    return Ok((result, stats));
                }
                Err(err) => {
                    retry.record_attempt();
                    match self.policy.decide(&err, &mut retry) {
                        Decision::Retry { delay } => {
                            warn!(
                                key = key.as_str(),
                                request_id = client_request_id.as_str(),
                                attempt = retry.attempts(),
                                delay_ms = delay.as_millis() as u64,
                                error = %err,
                                "transient provider failure, backing off"
                            );
                            tokio::select! {
                                () = tokio::time::sleep(delay) => {}
                                () = signal.cancelled() => return Err(Error::Cancelled),
                            }
                        }
                        Decision::Exhausted => {
                            warn!(
                                key = key.as_str(),
                                request_id = client_request_id.as_str(),
                                attempts = retry.attempts(),
                                error = %err,
                                "retry budget exhausted"
                            );
                            return Err(Error::ExhaustedRetries {
                                attempts: retry.attempts(),
                                last_error: err,
                            });
                        }
                        Decision::Fail => {
                            warn!(
                                key = key.as_str(),
                                request_id = client_request_id.as_str(),
                                attempts = retry.attempts(),
                                error = %err,
                                "fatal provider failure"
                            );
                            return Err(Error::Transport(err));
                        }
                    }
                }
            }
        }
    }
}
