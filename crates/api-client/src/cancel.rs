use std::future::Future;
use std::sync::{Arc, Mutex, PoisonError};

use tokio_util::sync::CancellationToken;
use tracing::debug;

use repoedit_core::{ContentError, Result};

/// Run `op` until it finishes or `cancel` fires.
///
/// On cancellation the operation future is dropped, which aborts the
/// underlying request, and the outcome is [`ContentError::Cancelled`]. For a
/// mutation the caller cannot know whether the server applied it.
pub async fn cancellable<T, F>(cancel: &CancellationToken, op: F) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    tokio::select! {
        biased;

        () = cancel.cancelled() => {
            debug!("content operation cancelled");
            Err(ContentError::Cancelled)
        }

        outcome = op => outcome,
    }
}

/// Same as [`cancellable`] when a token may or may not be supplied.
pub(crate) async fn maybe_cancellable<T, F>(cancel: Option<&CancellationToken>, op: F) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    match cancel {
        Some(token) => cancellable(token, op).await,
        None => op.await,
    }
}

/// Re-armable source of cancellation tokens for interactive callers.
///
/// [`CancelScope::cancel`] fires the token of whatever call currently holds
/// one. The next [`CancelScope::token`] hands out a fresh token, so an
/// interrupt only ever reaches the call it was aimed at.
#[derive(Debug, Clone, Default)]
pub struct CancelScope {
    current: Arc<Mutex<CancellationToken>>,
}

impl CancelScope {
    pub fn new() -> Self {
        Self::default()
    }

    /// Token for the next call; replaces the previous one if it was fired.
    pub fn token(&self) -> CancellationToken {
        let mut current = self.current.lock().unwrap_or_else(PoisonError::into_inner);
        if current.is_cancelled() {
            *current = CancellationToken::new();
        }
        current.clone()
    }

    /// Cancel the call in flight, if any.
    pub fn cancel(&self) {
        self.current
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .cancel();
    }
}
