use crate::orchestrator::CancelSignal;
use crate::{Error, Result};
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;

/// Point-in-time view of the limiter, for callers that want to surface
/// expected latency before committing to a request.
#[derive(Debug, Clone)]
pub struct RateLimiterSnapshot {
    pub min_interval: Duration,
    /// Estimated wait until the next departure slot opens (ms), if any.
    pub estimated_wait_ms: Option<u64>,
}

#[derive(Debug)]
struct State {
    last_departure: Option<Instant>,
}

/// Process-wide pacer enforcing a minimum spacing between transport
/// departures.
///
/// One instance is shared by every call site because the ceiling is imposed
/// by the provider account, not per request type. The check-and-update of
/// the departure timestamp is a single critical section; waiters sleep
/// outside the lock and re-check, so no two callers can both observe a
/// stale "already past the interval" and depart together. No fairness or
/// FIFO ordering among waiters is guaranteed, only the spacing itself.
pub struct RateLimiter {
    min_interval: Duration,
    state: Mutex<State>,
}

impl RateLimiter {
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            state: Mutex::new(State {
                last_departure: None,
            }),
        }
    }

    /// Suspend until a departure slot is available, then claim it.
    ///
    /// On return the caller holds the "turn": the departure time has been
    /// recorded and the next caller waits a full interval from it.
    pub async fn acquire(&self) {
        loop {
            let wait = {
                let mut st = self.state.lock().await;
                match self.remaining_locked(&st) {
                    None => {
                        st.last_departure = Some(Instant::now());
                        return;
                    }
                    Some(wait) => wait,
                }
            };
            tokio::time::sleep(wait).await;
        }
    }

    /// Like [`acquire`](Self::acquire), but abandons the wait when the
    /// caller's cancellation signal fires. An abandoned wait claims no slot
    /// and leaves the recorded departure time untouched.
    pub async fn acquire_cancellable(&self, signal: &mut CancelSignal) -> Result<()> {
        loop {
            if signal.is_cancelled() {
                return Err(Error::Cancelled);
            }
            let wait = {
                let mut st = self.state.lock().await;
                match self.remaining_locked(&st) {
                    None => {
                        st.last_departure = Some(Instant::now());
                        return Ok(());
                    }
                    Some(wait) => wait,
                }
            };
            tokio::select! {
                () = tokio::time::sleep(wait) => {}
                () = signal.cancelled() => return Err(Error::Cancelled),
            }
        }
    }

    /// Claim a slot only if one is open right now.
    pub async fn try_acquire(&self) -> bool {
        let mut st = self.state.lock().await;
        if self.remaining_locked(&st).is_none() {
            st.last_departure = Some(Instant::now());
            true
        } else {
            false
        }
    }

    pub async fn snapshot(&self) -> RateLimiterSnapshot {
        let st = self.state.lock().await;
        RateLimiterSnapshot {
            min_interval: self.min_interval,
            estimated_wait_ms: self
                .remaining_locked(&st)
                .map(|d| d.as_millis() as u64),
        }
    }

    /// Time left until the next slot opens; `None` when a departure may
    /// happen immediately. Must be called with the state lock held.
    fn remaining_locked(&self, st: &State) -> Option<Duration> {
        let last = st.last_departure?;
        let elapsed = last.elapsed();
        if elapsed >= self.min_interval {
            None
        } else {
            Some(self.min_interval - elapsed)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orchestrator::cancel_pair;
    use std::sync::Arc;

    #[tokio::test(start_paused = true)]
    async fn first_acquire_is_immediate() {
        let limiter = RateLimiter::new(Duration::from_millis(1000));
        let before = Instant::now();
        limiter.acquire().await;
        assert_eq!(before.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn second_acquire_waits_full_interval() {
        let limiter = RateLimiter::new(Duration::from_millis(1000));
        limiter.acquire().await;
        let before = Instant::now();
        limiter.acquire().await;
        assert!(before.elapsed() >= Duration::from_millis(1000));
    }

    #[tokio::test(start_paused = true)]
    async fn concurrent_acquires_are_spaced() {
        let limiter = Arc::new(RateLimiter::new(Duration::from_millis(1000)));
        let start = Instant::now();
        let mut handles = Vec::new();
        for _ in 0..3 {
            let limiter = Arc::clone(&limiter);
            handles.push(tokio::spawn(async move {
                limiter.acquire().await;
                start.elapsed()
            }));
        }
        let mut departures = Vec::new();
        for handle in handles {
            departures.push(handle.await.unwrap());
        }
        departures.sort();
        for pair in departures.windows(2) {
            assert!(pair[1] - pair[0] >= Duration::from_millis(1000));
        }
    }

    #[tokio::test(start_paused = true)]
    async fn try_acquire_respects_spacing() {
        let limiter = RateLimiter::new(Duration::from_millis(500));
        assert!(limiter.try_acquire().await);
        assert!(!limiter.try_acquire().await);
        tokio::time::advance(Duration::from_millis(500)).await;
        assert!(limiter.try_acquire().await);
    }

    #[tokio::test(start_paused = true)]
    async fn snapshot_estimates_wait() {
        let limiter = RateLimiter::new(Duration::from_millis(1000));
        assert!(limiter.snapshot().await.estimated_wait_ms.is_none());
        limiter.acquire().await;
        let wait = limiter.snapshot().await.estimated_wait_ms.unwrap();
        assert!(wait > 0 && wait <= 1000);
    }

    #[tokio::test(start_paused = true)]
    async fn cancelled_wait_claims_no_slot() {
        let limiter = Arc::new(RateLimiter::new(Duration::from_millis(1000)));
        limiter.acquire().await;

        let (handle, mut signal) = cancel_pair();
        let waiter = {
            let limiter = Arc::clone(&limiter);
            tokio::spawn(async move { limiter.acquire_cancellable(&mut signal).await })
        };
        tokio::task::yield_now().await;
        handle.cancel();
        let result = waiter.await.unwrap();
        assert!(matches!(result, Err(Error::Cancelled)));

        // the abandoned waiter did not move the departure clock; the next
        // caller still departs one interval after the first departure
        let before = Instant::now();
        limiter.acquire().await;
        assert!(before.elapsed() <= Duration::from_millis(1000));
    }
}
