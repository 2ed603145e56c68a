//! Pacing primitives protecting the provider account ceiling.
//!
//! The single component here is the [`RateLimiter`], which guarantees a
//! minimum wall-clock spacing between any two transport departures no
//! matter how many callers race for a slot. Ordering among waiters is
//! deliberately unspecified.

pub mod rate_limiter;

pub use rate_limiter::{RateLimiter, RateLimiterSnapshot};
