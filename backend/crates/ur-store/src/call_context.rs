//! Cancellation context threaded through every store call.
//!
//! The context is supplied by whoever drives the operation. Stores race their
//! work against it; nothing in between adds or replaces a deadline.

use crate::{Result as StoreErrorResult, StoreError};

use std::future::Future;
use std::time::Duration;

use tokio::sync::watch;

#[derive(Debug, Clone, Default)]
pub struct CallContext {
    timeout: Option<Duration>,
    cancel_rx: Option<watch::Receiver<bool>>,
}

/// Fires cancellation for every [`CallContext`] cloned from the one it was
/// created with.
#[derive(Debug)]
pub struct CancelHandle {
    cancel_tx: watch::Sender<bool>,
}

impl CancelHandle {
    pub fn cancel(&self) {
        log::debug!("Store call cancellation requested");
        let _ = self.cancel_tx.send(true);
    }
}

impl CallContext {
    /// No deadline, never cancelled.
    pub fn background() -> Self {
        Self::default()
    }

    /// A context plus the handle that cancels it.
    pub fn cancellable() -> (Self, CancelHandle) {
        let (cancel_tx, cancel_rx) = watch::channel(false);
        (
            Self {
                timeout: None,
                cancel_rx: Some(cancel_rx),
            },
            CancelHandle { cancel_tx },
        )
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel_rx.as_ref().is_some_and(|rx| *rx.borrow())
    }

    /// Runs `work` until it completes, the caller cancels, or the timeout
    /// elapses, whichever happens first.
    pub async fn run<T, F>(&self, operation: &'static str, work: F) -> StoreErrorResult<T>
    where
        F: Future<Output = StoreErrorResult<T>>,
    {
        if self.is_cancelled() {
            return Err(StoreError::cancelled(operation));
        }

        let mut cancel_rx = self.cancel_rx.clone();
        let cancelled = async move {
            match cancel_rx.as_mut() {
                Some(rx) => {
                    // A dropped handle can never cancel.
                    if rx.wait_for(|cancelled| *cancelled).await.is_err() {
                        std::future::pending::<()>().await;
                    }
                }
                None => std::future::pending::<()>().await,
            }
        };

        let raced = async {
            tokio::select! {
                result = work => result,
                _ = cancelled => Err(StoreError::cancelled(operation)),
            }
        };

        match self.timeout {
            Some(timeout) => tokio::time::timeout(timeout, raced)
                .await
                .map_err(|_| StoreError::timed_out(operation, timeout))?,
            None => raced.await,
        }
    }
}
