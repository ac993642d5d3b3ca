//! Cancellation and deadlines for license checks.
//!
//! Every checker operation takes a [`CheckContext`]. Store reads and key
//! lookups race against it, and the selector re-checks it between
//! candidates, so a cancelled or expired context stops a pass promptly
//! instead of validating the remaining records.

use std::future::{Future, pending};
use std::time::Duration;

use tokio::sync::watch;
use tokio::time::Instant;

use crate::error::{LicenseError, LicenseResult};

/// Caller-supplied cancellation signal and deadline.
#[derive(Debug, Clone, Default)]
pub struct CheckContext {
    cancel: Option<watch::Receiver<bool>>,
    deadline: Option<Instant>,
}

/// Cancels every [`CheckContext`] derived from the same `cancellable` call.
#[derive(Debug)]
pub struct CancelHandle(watch::Sender<bool>);

impl CancelHandle {
    /// Signals cancellation. Idempotent.
    pub fn cancel(&self) {
        self.0.send_replace(true);
    }
}

impl CheckContext {
    /// A context that is never cancelled and has no deadline.
    #[must_use]
    pub fn background() -> Self {
        Self::default()
    }

    /// Returns a copy of this context that also expires after `timeout`.
    #[must_use]
    pub fn with_timeout(self, timeout: Duration) -> Self {
        self.with_deadline(Instant::now() + timeout)
    }

    /// Returns a copy of this context that also expires at `deadline`.
    /// An earlier existing deadline is kept.
    #[must_use]
    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(match self.deadline {
            Some(current) => current.min(deadline),
            None => deadline,
        });
        self
    }

    /// Returns a cancellable copy of this context and the handle that cancels it.
    #[must_use]
    pub fn cancellable(mut self) -> (Self, CancelHandle) {
        let (tx, rx) = watch::channel(false);
        self.cancel = Some(rx);
        (self, CancelHandle(tx))
    }

    /// Returns the deadline, if any.
    #[must_use]
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancel.as_ref().is_some_and(|rx| *rx.borrow())
    }

    /// Fails if the context has been cancelled or its deadline has passed.
    ///
    /// # Errors
    ///
    /// Returns [`LicenseError::Cancelled`] or [`LicenseError::DeadlineExceeded`].
    pub fn check(&self) -> LicenseResult<()> {
        if self.is_cancelled() {
            return Err(LicenseError::Cancelled);
        }
        if self.deadline.is_some_and(|d| d <= Instant::now()) {
            return Err(LicenseError::DeadlineExceeded);
        }
        Ok(())
    }

    /// Runs `operation` until it completes or the context ends, whichever is first.
    ///
    /// # Errors
    ///
    /// Returns the operation's error, or [`LicenseError::Cancelled`] /
    /// [`LicenseError::DeadlineExceeded`] if the context ends first.
    pub async fn run<T, F>(&self, operation: F) -> LicenseResult<T>
    where
        F: Future<Output = LicenseResult<T>>,
    {
        self.check()?;
        tokio::select! {
            biased;
            () = self.cancelled() => Err(LicenseError::Cancelled),
            () = self.deadline_elapsed() => Err(LicenseError::DeadlineExceeded),
            result = operation => result,
        }
    }

    async fn cancelled(&self) {
        let Some(mut rx) = self.cancel.clone() else {
            return pending().await;
        };
        // A dropped handle can no longer cancel.
        let closed = rx.wait_for(|cancelled| *cancelled).await.is_err();
        if closed {
            pending::<()>().await;
        }
    }

    async fn deadline_elapsed(&self) {
        match self.deadline {
            Some(deadline) => tokio::time::sleep_until(deadline).await,
            None => pending().await,
        }
    }
}
