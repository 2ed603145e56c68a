//! Per-call cancellation primitives.

use tokio::sync::watch;

/// Create a linked handle/signal pair for one `generate` call.
///
/// The handle side stays with whoever may lose interest (e.g. a dismissed
/// UI element); the signal side travels into the orchestrator and is
/// checked at every suspension point.
pub fn cancel_pair() -> (CancelHandle, CancelSignal) {
    let (tx, rx) = watch::channel(false);
    (CancelHandle { tx }, CancelSignal { rx })
}

/// Caller-side trigger. Dropping the handle without calling
/// [`cancel`](Self::cancel) leaves the request running to completion.
#[derive(Debug)]
pub struct CancelHandle {
    tx: watch::Sender<bool>,
}

impl CancelHandle {
    pub fn cancel(&self) {
        // send only fails when no signal is listening anymore
        let _ = self.tx.send(true);
    }
}

/// Orchestrator-side observer of the cancellation state.
#[derive(Debug, Clone)]
pub struct CancelSignal {
    rx: watch::Receiver<bool>,
}

impl CancelSignal {
    /// A signal that never fires, for callers without a cancellation path.
    pub fn never() -> Self {
        // the sender is dropped immediately; a closed channel that never
        // observed `true` behaves as "never cancelled"
        let (_tx, rx) = watch::channel(false);
        Self { rx }
    }

    pub fn is_cancelled(&self) -> bool {
        *self.rx.borrow()
    }

    /// Resolve once the paired handle fires. A dropped handle can no longer
    /// cancel, so this pends forever in that case.
    pub async fn cancelled(&mut self) {
        if self.rx.wait_for(|cancelled| *cancelled).await.is_err() {
            std::future::pending::<()>().await;
        }
    }
}
