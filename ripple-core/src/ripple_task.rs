// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Background task spawning with cooperative cancellation.
//!
//! Connectable streams pull from their upstream inside a [`RippleTask`]. The task
//! is handed a [`CancellationToken`] and is expected to stop at its next
//! checkpoint once the token fires.

use crate::CancellationToken;
use core::future::Future;

/// Task handle that cancels the spawned future when dropped.
///
/// # Example
///
/// ```rust
/// use ripple_core::RippleTask;
///
/// # #[tokio::main]
/// # async fn main() {
/// let task = RippleTask::spawn(|cancel| async move {
///     cancel.cancelled().await;
/// });
///
/// assert!(!task.is_cancelled());
/// drop(task); // signals the future to stop
/// # }
/// ```
#[derive(Debug)]
pub struct RippleTask {
    cancel: CancellationToken,
}

impl RippleTask {
    /// Spawn `f` on the configured runtime.
    ///
    /// `f` receives the token that [`cancel`](Self::cancel) and `Drop` trigger.
    ///
    /// # Panics
    ///
    /// Panics if called outside a Tokio runtime.
    #[cfg(feature = "runtime-tokio")]
    pub fn spawn<F, Fut>(f: F) -> Self
    where
        F: FnOnce(CancellationToken) -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let cancel = CancellationToken::new();
        tokio::spawn(f(cancel.clone()));
        Self { cancel }
    }

    /// Signal the task to stop. Does not wait for it to finish.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Returns `true` once cancellation has been requested.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// A clone of the token the task observes.
    #[must_use]
    pub fn token(&self) -> CancellationToken {
        self.cancel.clone()
    }
}

impl Drop for RippleTask {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}
