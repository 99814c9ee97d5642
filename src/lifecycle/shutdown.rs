//! Shutdown coordination for the gateway.
//!
//! A broadcast channel fans the shutdown signal out to the server task and
//! anything else long-running; tests trigger it directly, production wires
//! it to ctrl-c via [`crate::lifecycle::signals`].

use tokio::sync::broadcast;

use crate::lifecycle::signals;

/// Coordinator for graceful shutdown.
pub struct Shutdown {
    tx: broadcast::Sender<()>,
}

impl Shutdown {
    /// Create a new shutdown coordinator.
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(1);
        Self { tx }
    }

    /// Subscribe to the shutdown signal.
    pub fn subscribe(&self) -> broadcast::Receiver<()> {
        self.tx.subscribe()
    }

    /// Trigger the shutdown signal.
    pub fn trigger(&self) {
        let _ = self.tx.send(());
    }

    /// Spawn a task that triggers shutdown when the process receives
    /// an interrupt.
    pub fn trigger_on_interrupt(&self) {
        let tx = self.tx.clone();
        tokio::spawn(async move {
            signals::interrupt().await;
            let _ = tx.send(());
        });
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}
