//! Cancellation coordination for in-flight deployments.

use tokio::sync::broadcast;

/// Broadcast side of a cancellation signal.
///
/// Cloneable; every pipeline run holds a [`CancelHandle`] subscribed to it.
/// Dropping all broadcasters leaves handles that never fire.
#[derive(Clone)]
pub struct CancelBroadcast {
    /// Broadcast channel sender.
    tx: broadcast::Sender<()>,
}

impl CancelBroadcast {
    /// Create a new cancellation coordinator.
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(1);
        Self { tx }
    }

    /// Subscribe a handle to the cancellation signal.
    pub fn handle(&self) -> CancelHandle {
        CancelHandle {
            rx: self.tx.subscribe(),
            fired: false,
        }
    }

    /// Trigger cancellation for all subscribed handles.
    pub fn cancel(&self) {
        let _ = self.tx.send(());
    }
}

impl Default for CancelBroadcast {
    fn default() -> Self {
        Self::new()
    }
}

/// Receiver side of a cancellation signal, held by one pipeline run.
pub struct CancelHandle {
    rx: broadcast::Receiver<()>,
    fired: bool,
}

impl CancelHandle {
    /// Resolve once cancellation has been requested.
    ///
    /// Stays pending forever when the broadcaster is gone without firing;
    /// resolves immediately on every call after the first observation.
    pub async fn cancelled(&mut self) {
        if self.fired {
            return;
        }
        loop {
            match self.rx.recv().await {
                Ok(()) | Err(broadcast::error::RecvError::Lagged(_)) => {
                    self.fired = true;
                    return;
                }
                Err(broadcast::error::RecvError::Closed) => {
                    std::future::pending::<()>().await;
                }
            }
        }
    }
}
