//! Async turn gate for participants whose receive loop and acting loop run
//! concurrently (the human proxy).
//!
//! Wraps the domain [`TurnGate`] latch in a `watch` channel: the receive task
//! feeds every observed message through [`FloorGate::observe`], while the
//! acting side suspends in [`FloorGate::acquire`] until a grant addressed to
//! it arrives, consuming that grant exactly once.

use noa_domain::{GateState, Message, ParticipantId, TurnGate};
use std::sync::Arc;
use tokio::sync::watch;
use tracing::debug;

#[derive(Clone)]
pub struct FloorGate {
    tx: Arc<watch::Sender<TurnGate>>,
}

impl FloorGate {
    /// A new gate starts blocked.
    pub fn new(owner: ParticipantId) -> Self {
        let (tx, _rx) = watch::channel(TurnGate::new(owner));
        Self { tx: Arc::new(tx) }
    }

    pub fn state(&self) -> GateState {
        self.tx.borrow().state()
    }

    /// Feed an observed message. Returns `true` if it released the gate.
    pub fn observe(&self, message: &Message) -> bool {
        let released = self.tx.send_if_modified(|gate| gate.observe(message));
        if released {
            debug!(owner = %self.tx.borrow().owner(), "Floor granted");
        }
        released
    }

    /// Block the gate, discarding any grant not yet consumed.
    pub fn reset(&self) {
        self.tx.send_if_modified(|gate| {
            gate.reset();
            false
        });
    }

    /// Wait, without timeout, for a grant and consume it.
    pub async fn acquire(&self) {
        let mut rx = self.tx.subscribe();
        loop {
            if self.tx.send_if_modified(|gate| gate.take()) {
                return;
            }
            // The sender lives in `self`, so the channel cannot close under us.
            if rx.changed().await.is_err() {
                return;
            }
        }
    }
}
