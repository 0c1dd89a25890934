//! Abort handles for in-flight requests.
//!
//! The owner of a screen holds an [`AbortHandle`] and hands out
//! [`AbortSignal`]s to each request it issues. Aborting, or dropping the
//! handle when the screen is torn down, wakes every pending request.

use tokio::sync::watch;

/// Owner side of an abort channel.
#[derive(Debug)]
pub struct AbortHandle {
    tx: watch::Sender<bool>,
}

impl AbortHandle {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(false);
        Self { tx }
    }

    /// Returns a signal tied to this handle.
    pub fn signal(&self) -> AbortSignal {
        AbortSignal {
            rx: Some(self.tx.subscribe()),
        }
    }

    /// Aborts every request holding a signal from this handle. Idempotent.
    pub fn abort(&self) {
        self.tx.send_replace(true);
    }

    pub fn is_aborted(&self) -> bool {
        *self.tx.borrow()
    }
}

impl Default for AbortHandle {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for AbortHandle {
    fn drop(&mut self) {
        self.tx.send_replace(true);
    }
}

/// Listener side of an abort channel.
#[derive(Debug, Clone)]
pub struct AbortSignal {
    rx: Option<watch::Receiver<bool>>,
}

impl AbortSignal {
    /// A signal that never fires.
    pub fn never() -> Self {
        Self { rx: None }
    }

    pub fn is_aborted(&self) -> bool {
        self.rx.as_ref().is_some_and(|rx| *rx.borrow())
    }

    /// Completes once the owning handle aborts or is dropped.
    pub async fn aborted(&self) {
        let Some(rx) = &self.rx else {
            return std::future::pending::<()>().await;
        };

        let mut rx = rx.clone();
        // A closed channel means the handle was dropped, which aborts too
        let _ = rx.wait_for(|aborted| *aborted).await;
    }
}
