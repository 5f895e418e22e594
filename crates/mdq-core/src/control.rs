//! Shutdown signalling shared by the dispatcher and the status renderer.

use tokio::sync::watch;

/// One-shot, idempotent shutdown flag. Subscribed receivers wake as soon as
/// [`ShutdownSignal::signal`] runs, so timed waits never sleep out a full
/// period after quit is requested.
#[derive(Debug)]
pub struct ShutdownSignal {
    tx: watch::Sender<bool>,
}

impl ShutdownSignal {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(false);
        Self { tx }
    }

    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.tx.subscribe()
    }

    /// Set the flag. Safe to call more than once.
    pub fn signal(&self) {
        self.tx.send_replace(true);
    }

    pub fn is_signalled(&self) -> bool {
        *self.tx.borrow()
    }
}

impl Default for ShutdownSignal {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signal_is_idempotent() {
        let signal = ShutdownSignal::new();
        assert!(!signal.is_signalled());
        signal.signal();
        signal.signal();
        assert!(signal.is_signalled());
    }

    #[tokio::test]
    async fn subscribers_wake_on_signal() {
        let signal = ShutdownSignal::new();
        let mut rx = signal.subscribe();
        signal.signal();
        rx.changed().await.unwrap();
        assert!(*rx.borrow());
    }
}
