//! Response caching: canonical keys plus a TTL-bounded in-memory store.
//!
//! Identical requests within the TTL window are served from memory and
//! never touch the rate limiter or the network.
//!
//! | Component | Description |
//! |-----------|-------------|
//! | [`CacheKey`] | Deterministic identifier for logically equal requests |
//! | [`CacheKeyGenerator`] | SHA-256 over a canonical payload rendering |
//! | [`ResponseCache`] | Lazily-expired TTL store with bounded capacity |
//! | [`CacheStats`] | Hit/miss/insert/eviction counters |

mod key;
mod store;

pub use key::{CacheKey, CacheKeyGenerator};
pub use store::{CacheStats, ResponseCache};
