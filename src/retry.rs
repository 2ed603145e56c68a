//! Failure classification and backoff policy.
//!
//! One place decides which failures are worth another attempt and how long
//! to wait before it; the orchestrator's loop consumes [`Decision`]s and
//! performs the sleeps. Prompt-level call sites carry no retry logic of
//! their own.

use crate::transport::TransportError;
use rand::Rng;
use std::time::Duration;

/// Whether a transport failure is expected to resolve on retry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureClass {
    /// Provider throttling (429), temporary unavailability (503), or a
    /// network-level failure with no response at all.
    Transient,
    /// Everything else, including malformed provider responses; retrying
    /// cannot help.
    Fatal,
}

/// How the retry loop should proceed after a failed attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Decision {
    Retry { delay: Duration },
    /// Transient failures exhausted the attempt budget.
    Exhausted,
    /// Fatal failure; surface immediately.
    Fail,
}

/// Capped, jittered exponential backoff over classified failures.
#[derive(Debug, Clone)]
pub struct BackoffPolicy {
    pub max_retries: u32,
    pub initial_delay: Duration,
    pub max_delay: Duration,
    pub jitter: (f64, f64),
}

impl BackoffPolicy {
    pub fn new(
        max_retries: u32,
        initial_delay: Duration,
        max_delay: Duration,
        jitter: (f64, f64),
    ) -> Self {
        Self {
            max_retries,
            initial_delay,
            max_delay,
            jitter,
        }
    }

    pub fn classify(&self, error: &TransportError) -> FailureClass {
        match error {
            TransportError::Status { status: 429, .. } | TransportError::Status { status: 503, .. } => {
                FailureClass::Transient
            }
            TransportError::Network(_) => FailureClass::Transient,
            TransportError::Status { .. } | TransportError::Malformed(_) => FailureClass::Fatal,
        }
    }

    /// Decide the next step after `state` just recorded a failed attempt.
    pub(crate) fn decide(&self, error: &TransportError, state: &mut RetryState) -> Decision {
        match self.classify(error) {
            FailureClass::Fatal => Decision::Fail,
            FailureClass::Transient => match state.schedule(self) {
                Some(delay) => Decision::Retry { delay },
                None => Decision::Exhausted,
            },
        }
    }

    fn jittered(&self, delay: Duration) -> Duration {
        let (low, high) = self.jitter;
        let factor = if high > low {
            rand::thread_rng().gen_range(low..high)
        } else {
            low
        };
        delay.mul_f64(factor)
    }
}

impl Default for BackoffPolicy {
    fn default() -> Self {
        Self {
            max_retries: 5,
            initial_delay: Duration::from_millis(1000),
            max_delay: Duration::from_millis(30_000),
            jitter: (1.0, 1.2),
        }
    }
}

/// Per-request attempt tracking. Created on cache miss, discarded on
/// terminal success or failure, never persisted.
#[derive(Debug)]
pub(crate) struct RetryState {
    /// Completed transport attempts.
    attempt: u32,
    next_delay: Duration,
}

impl RetryState {
    pub(crate) fn new(policy: &BackoffPolicy) -> Self {
        Self {
            attempt: 0,
            next_delay: policy.initial_delay,
        }
    }

    pub(crate) fn record_attempt(&mut self) {
        self.attempt += 1;
    }

    pub(crate) fn attempts(&self) -> u32 {
        self.attempt
    }

    /// Hand out the delay before the next attempt and grow it, or `None`
    /// when the budget is spent. The first retry waits exactly the initial
    /// delay; growth applies the doubling and jitter, capped at the policy
    /// maximum.
    fn schedule(&mut self, policy: &BackoffPolicy) -> Option<Duration> {
        if self.attempt >= policy.max_retries {
            return None;
        }
        let delay = self.next_delay;
        self.next_delay = policy.jittered(delay * 2).min(policy.max_delay);
        Some(delay)
    }
}
