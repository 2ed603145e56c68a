//! The public entry point: cache lookup, paced and retried transport
//! call, cache write.
//!
//! | Component | Description |
//! |-----------|-------------|
//! | [`RequestOrchestrator`] | Composes cache, limiter, and backoff around a transport |
//! | [`cancel_pair`] | Per-call cancellation handle/signal pair |

mod cancel;
mod core;

pub use cancel::{cancel_pair, CancelHandle, CancelSignal};
pub use core::RequestOrchestrator;
