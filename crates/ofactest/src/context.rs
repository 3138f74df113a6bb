//! Cancellation and deadline propagation for check requests.

use std::future::Future;
use std::time::Duration;

use tokio::sync::watch;
use tokio::time::Instant;

use crate::error::CheckError;

/// Request context shared by every check in a run.
///
/// Cloning is cheap; all clones observe the same cancellation signal.
#[derive(Debug, Clone)]
pub struct CheckContext {
    cancelled: watch::Receiver<bool>,
    deadline: Option<Instant>,
}

/// Triggers cancellation of every [`CheckContext`] created alongside it.
#[derive(Debug)]
pub struct CancelHandle(watch::Sender<bool>);

impl CancelHandle {
    /// Cancel the run. Pending requests are abandoned.
    pub fn cancel(&self) {
        self.0.send_replace(true);
    }
}

impl CheckContext {
    /// A cancellable context with no deadline.
    #[must_use]
    pub fn new() -> (Self, CancelHandle) {
        let (tx, rx) = watch::channel(false);
        let ctx = Self {
            cancelled: rx,
            deadline: None,
        };
        (ctx, CancelHandle(tx))
    }

    /// A context that is never cancelled and has no deadline.
    #[must_use]
    pub fn background() -> Self {
        let (ctx, _handle) = Self::new();
        ctx
    }

    /// Abandon work once `deadline` passes.
    #[must_use]
    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Abandon work once `timeout` has elapsed from now.
    ///
    /// A timeout too large to represent as an instant leaves the context
    /// without a deadline.
    #[must_use]
    pub fn with_timeout(self, timeout: Duration) -> Self {
        match Instant::now().checked_add(timeout) {
            Some(deadline) => self.with_deadline(deadline),
            None => self,
        }
    }

    /// Whether cancellation has been requested.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        *self.cancelled.borrow()
    }

    /// Run `fut` unless the context is already done, abandoning it if the
    /// context is cancelled or the deadline passes first.
    ///
    /// # Errors
    ///
    /// Returns [`CheckError::Cancelled`] or [`CheckError::DeadlineExceeded`]
    /// tagged with `operation`.
    pub async fn run<F, T>(&self, operation: &'static str, fut: F) -> Result<T, CheckError>
    where
        F: Future<Output = T>,
    {
        if self.is_cancelled() {
            return Err(CheckError::Cancelled { operation });
        }
        if self.deadline.is_some_and(|d| Instant::now() >= d) {
            return Err(CheckError::DeadlineExceeded { operation });
        }

        let mut cancelled = self.cancelled.clone();
        tokio::select! {
            out = fut => Ok(out),
            () = wait_cancelled(&mut cancelled) => Err(CheckError::Cancelled { operation }),
            () = wait_deadline(self.deadline) => Err(CheckError::DeadlineExceeded { operation }),
        }
    }
}

async fn wait_cancelled(rx: &mut watch::Receiver<bool>) {
    // A dropped handle can never cancel.
    if rx.wait_for(|cancelled| *cancelled).await.is_err() {
        std::future::pending::<()>().await;
    }
}

async fn wait_deadline(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => tokio::time::sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}
