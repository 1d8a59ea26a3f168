//! Restartable delayed delivery of the latest value.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::warn;

/// Delivers a value on its channel after `delay`, unless superseded.
///
/// At most one value is pending at a time: scheduling a new one cancels the
/// previous. Values that already fired are not recalled.
#[derive(Debug)]
pub struct Debouncer<T> {
    delay: Duration,
    tx: mpsc::UnboundedSender<T>,
    pending: Option<(CancellationToken, JoinHandle<()>)>,
}

impl<T: Send + 'static> Debouncer<T> {
    /// Create a debouncer and the receiver its values are delivered to.
    #[must_use]
    pub fn new(delay: Duration) -> (Self, mpsc::UnboundedReceiver<T>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let debouncer = Self {
            delay,
            tx,
            pending: None,
        };
        (debouncer, rx)
    }

    #[must_use]
    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Schedule `value`, cancelling whatever was pending.
    ///
    /// Must be called from within a tokio runtime.
    pub fn schedule(&mut self, value: T) {
        self.cancel();

        let token = CancellationToken::new();
        let cancelled = token.clone();
        let tx = self.tx.clone();
        let delay = self.delay;

        let handle = tokio::spawn(async move {
            tokio::select! {
                biased;
                () = cancelled.cancelled() => {}
                () = tokio::time::sleep(delay) => {
                    // Receiver gone means the session ended.
                    let _ = tx.send(value);
                }
            }
        });

        self.pending = Some((token, handle));
    }

    /// Drop the pending value, if any.
    pub fn cancel(&mut self) {
        if let Some((token, _)) = self.pending.take() {
            token.cancel();
        }
    }

    /// Wait until the pending value, if any, has been sent or cancelled.
    pub async fn flush(&mut self) {
        if let Some((_, handle)) = self.pending.take()
            && let Err(e) = handle.await
        {
            warn!(error = %e, "debounce task did not complete");
        }
    }

    /// True while a scheduled value has neither fired nor been cancelled.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.pending
            .as_ref()
            .is_some_and(|(token, handle)| !token.is_cancelled() && !handle.is_finished())
    }
}

impl<T> Drop for Debouncer<T> {
    fn drop(&mut self) {
        if let Some((token, _)) = self.pending.take() {
            token.cancel();
        }
    }
}
