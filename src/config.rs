//! Orchestrator configuration.

use crate::{Error, Result};
use std::time::Duration;

/// Tunable parameters for the orchestration runtime.
///
/// Everything the pacing, caching, and retry layers consume is a
/// constructor parameter here, never a hardcoded constant.
#[derive(Debug, Clone)]
pub struct OrchestratorConfig {
    /// Minimum spacing between any two transport departures, process-wide.
    pub min_interval: Duration,
    /// Age past which a cached result is never returned.
    pub cache_ttl: Duration,
    pub cache_enabled: bool,
    pub cache_max_entries: usize,
    /// Total transport invocations allowed per request (first try included).
    pub max_retries: u32,
    pub initial_delay: Duration,
    pub max_delay: Duration,
    /// Multiplicative jitter range applied when growing the backoff delay.
    pub jitter: (f64, f64),
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            min_interval: Duration::from_millis(1000),
            cache_ttl: Duration::from_secs(30 * 60),
            cache_enabled: true,
            cache_max_entries: 1024,
            max_retries: 5,
            initial_delay: Duration::from_millis(1000),
            max_delay: Duration::from_millis(30_000),
            jitter: (1.0, 1.2),
        }
    }
}

impl OrchestratorConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_min_interval(mut self, interval: Duration) -> Self {
        self.min_interval = interval;
        self
    }

    pub fn with_cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache_ttl = ttl;
        self
    }

    pub fn with_cache_enabled(mut self, enabled: bool) -> Self {
        self.cache_enabled = enabled;
        self
    }

    pub fn with_cache_max_entries(mut self, max_entries: usize) -> Self {
        self.cache_max_entries = max_entries;
        self
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    pub fn with_initial_delay(mut self, delay: Duration) -> Self {
        self.initial_delay = delay;
        self
    }

    pub fn with_max_delay(mut self, delay: Duration) -> Self {
        self.max_delay = delay;
        self
    }

    pub fn with_jitter(mut self, low: f64, high: f64) -> Self {
        self.jitter = (low, high);
        self
    }

    /// Reject configurations the runtime cannot honor.
    pub fn validate(&self) -> Result<()> {
        if self.max_retries == 0 {
            return Err(Error::configuration("max_retries must be at least 1"));
        }
        let (low, high) = self.jitter;
        if !(low.is_finite() && high.is_finite()) || low < 1.0 || high < low {
            return Err(Error::configuration(
                "jitter range must satisfy 1.0 <= low <= high",
            ));
        }
        if self.max_delay < self.initial_delay {
            return Err(Error::configuration(
                "max_delay must be >= initial_delay",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(OrchestratorConfig::default().validate().is_ok());
    }

    #[test]
    fn rejects_zero_retry_budget() {
        let config = OrchestratorConfig::new().with_max_retries(0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_inverted_jitter_range() {
        let config = OrchestratorConfig::new().with_jitter(1.5, 1.1);
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_shrinking_jitter_below_one() {
        let config = OrchestratorConfig::new().with_jitter(0.5, 1.1);
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_delay_cap_below_initial() {
        let config = OrchestratorConfig::new()
            .with_initial_delay(Duration::from_secs(5))
            .with_max_delay(Duration::from_secs(1));
        assert!(config.validate().is_err());
    }
}
