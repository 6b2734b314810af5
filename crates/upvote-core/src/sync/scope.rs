//! View-scoped cancellation.
//!
//! A [`ViewScope`] is owned by a view for its lifetime. Requests issued on the
//! view's behalf run through a [`ScopeToken`]; once the scope is cancelled or
//! dropped the pending request future is dropped and nothing it would have
//! written is applied.

use std::future::Future;

use thiserror::Error;
use tokio::sync::watch;

/// The owning view went away before the request settled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("Request cancelled")]
pub struct Cancelled;

impl From<Cancelled> for crate::Error {
    fn from(_: Cancelled) -> Self {
        Self::Cancelled
    }
}

/// Cancellation source tied to a view's lifetime
#[derive(Debug)]
pub struct ViewScope {
    tx: watch::Sender<bool>,
}

impl Default for ViewScope {
    fn default() -> Self {
        Self::new()
    }
}

impl ViewScope {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(false);
        Self { tx }
    }

    pub fn token(&self) -> ScopeToken {
        ScopeToken {
            rx: self.tx.subscribe(),
        }
    }

    pub fn cancel(&self) {
        self.tx.send_replace(true);
    }

    pub fn is_cancelled(&self) -> bool {
        *self.tx.borrow()
    }
}

impl Drop for ViewScope {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// Handle passed to operations started by a view
#[derive(Debug, Clone)]
pub struct ScopeToken {
    rx: watch::Receiver<bool>,
}

impl ScopeToken {
    pub fn is_cancelled(&self) -> bool {
        *self.rx.borrow() || self.rx.has_changed().is_err()
    }

    /// Resolves once the scope is cancelled or dropped.
    pub async fn cancelled(&self) {
        let mut rx = self.rx.clone();
        // An error means the scope was dropped, which also cancels.
        let _ = rx.wait_for(|cancelled| *cancelled).await;
    }

    /// Drive `future` to completion unless the scope is cancelled first.
    pub async fn run<F: Future>(&self, future: F) -> Result<F::Output, Cancelled> {
        if self.is_cancelled() {
            return Err(Cancelled);
        }
        tokio::select! {
            biased;
            () = self.cancelled() => Err(Cancelled),
            output = future => Ok(output),
        }
    }
}
