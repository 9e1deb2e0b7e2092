use std::io;
use std::sync::Arc;

use tokio::sync::watch;

/// Raising side of the shutdown token.
#[derive(Clone)]
pub struct ShutdownTrigger {
    notifier: Arc<watch::Sender<bool>>,
}

/// Cooperative cancellation token observed by long-running tasks.
#[derive(Clone)]
pub struct Shutdown {
    receiver: watch::Receiver<bool>,
}

pub fn channel() -> (ShutdownTrigger, Shutdown) {
    let (tx, rx) = watch::channel(false);
    (
        ShutdownTrigger {
            notifier: Arc::new(tx),
        },
        Shutdown { receiver: rx },
    )
}

impl ShutdownTrigger {
    pub fn cancel(&self) {
        let _ = self.notifier.send(true);
    }
}

impl Shutdown {
    pub fn is_cancelled(&self) -> bool {
        *self.receiver.borrow()
    }

    /// Resolves once the token is raised. A dropped trigger counts as raised.
    pub async fn cancelled(&mut self) {
        while !self.is_cancelled() {
            if self.receiver.changed().await.is_err() {
                return;
            }
        }
    }
}

/// Waits for the process shutdown request: Ctrl-C, or SIGTERM on unix.
pub async fn signal() -> io::Result<()> {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal as unix_signal, SignalKind};

        let mut terminate = unix_signal(SignalKind::terminate())?;
        tokio::select! {
            res = tokio::signal::ctrl_c() => res,
            _ = terminate.recv() => Ok(()),
        }
    }

    #[cfg(not(unix))]
    {
        tokio::signal::ctrl_c().await
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::channel;

    #[tokio::test]
    async fn cancel_wakes_every_clone() {
        let (trigger, shutdown) = channel();
        let mut first = shutdown.clone();
        let mut second = shutdown;

        assert!(!first.is_cancelled());
        trigger.cancel();

        first.cancelled().await;
        second.cancelled().await;
        assert!(second.is_cancelled());
    }

    #[tokio::test]
    async fn pending_until_cancelled() {
        let (trigger, mut shutdown) = channel();

        let waited = tokio::time::timeout(Duration::from_millis(20), shutdown.cancelled()).await;
        assert!(waited.is_err());

        trigger.cancel();
        shutdown.cancelled().await;
    }

    #[tokio::test]
    async fn dropped_trigger_counts_as_cancelled() {
        let (trigger, mut shutdown) = channel();
        drop(trigger);

        shutdown.cancelled().await;
    }
}
