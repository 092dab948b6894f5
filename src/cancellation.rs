//! Cooperative cancellation for network work.
//!
//! A [`CancellationTrigger`] flips a shared flag once; every clone of the
//! matching [`CancellationSignal`] observes it. Waits that should stop early
//! race against [`CancellationSignal::cancelled`].

use crate::error::AppError;
use std::time::Duration;
use tokio::sync::watch;

/// Creates a connected trigger/signal pair.
pub fn cancellation() -> (CancellationTrigger, CancellationSignal) {
    let (sender, receiver) = watch::channel(false);
    (
        CancellationTrigger { sender },
        CancellationSignal { receiver },
    )
}

/// The sending half; cancelling is idempotent.
#[derive(Debug)]
pub struct CancellationTrigger {
    sender: watch::Sender<bool>,
}

impl CancellationTrigger {
    pub fn cancel(&self) {
        self.sender.send_replace(true);
    }
}

/// Cloneable view of the cancellation state.
#[derive(Debug, Clone)]
pub struct CancellationSignal {
    receiver: watch::Receiver<bool>,
}

impl CancellationSignal {
    /// A signal that is never cancelled.
    pub fn never() -> Self {
        let (_, receiver) = watch::channel(false);
        Self { receiver }
    }

    pub fn is_cancelled(&self) -> bool {
        *self.receiver.borrow()
    }

    /// Resolves once cancellation is requested; pends forever otherwise.
    pub async fn cancelled(&self) {
        let mut receiver = self.receiver.clone();
        loop {
            if *receiver.borrow_and_update() {
                return;
            }
            if receiver.changed().await.is_err() {
                // Trigger dropped without cancelling
                std::future::pending::<()>().await;
            }
        }
    }

    /// Sleeps for `duration` unless cancelled first.
    pub async fn sleep(&self, duration: Duration) -> Result<(), AppError> {
        if self.is_cancelled() {
            return Err(AppError::Cancelled);
        }
        tokio::select! {
            biased;
            _ = self.cancelled() => Err(AppError::Cancelled),
            _ = tokio::time::sleep(duration) => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn cancel_interrupts_sleep() {
        let (trigger, signal) = cancellation();
        let sleeper = tokio::spawn({
            let signal = signal.clone();
            async move { signal.sleep(Duration::from_secs(60)).await }
        });
        trigger.cancel();
        let result = tokio::time::timeout(Duration::from_secs(5), sleeper)
            .await
            .expect("sleep should end promptly")
            .unwrap();
        assert!(matches!(result, Err(AppError::Cancelled)));
        assert!(signal.is_cancelled());
    }

    #[tokio::test]
    async fn uncancelled_sleep_completes() {
        let (_trigger, signal) = cancellation();
        assert!(signal.sleep(Duration::from_millis(5)).await.is_ok());
    }

    #[tokio::test]
    async fn never_signal_does_not_fire() {
        let signal = CancellationSignal::never();
        assert!(!signal.is_cancelled());
        let waited =
            tokio::time::timeout(Duration::from_millis(20), signal.cancelled()).await;
        assert!(waited.is_err());
    }

    #[tokio::test]
    async fn already_cancelled_sleep_fails_immediately() {
        let (trigger, signal) = cancellation();
        trigger.cancel();
        trigger.cancel();
        assert!(matches!(
            signal.sleep(Duration::from_secs(60)).await,
            Err(AppError::Cancelled)
        ));
    }
}
