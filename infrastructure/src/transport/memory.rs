//! In-process channel with the same delivery rules as the hub.
//!
//! Used to run several participants inside one process, and by tests.

use async_trait::async_trait;
use noa_application::{Subscription, Transport, TransportError};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::{Mutex, broadcast, mpsc};
use tracing::warn;

const BUS_CAPACITY: usize = 1024;
const SUBSCRIPTION_CAPACITY: usize = 256;

#[derive(Debug, Clone)]
struct Delivery {
    member: u64,
    payload: Vec<u8>,
}

/// A shared channel. Cheap to clone; clones are the same bus.
#[derive(Clone)]
pub struct InMemoryBus {
    tx: broadcast::Sender<Delivery>,
    next_member: Arc<AtomicU64>,
}

impl Default for InMemoryBus {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryBus {
    pub fn new() -> Self {
        let (tx, _rx) = broadcast::channel(BUS_CAPACITY);
        Self {
            tx,
            next_member: Arc::new(AtomicU64::new(1)),
        }
    }

    /// Attach a participant. It receives everything published after this call,
    /// except its own publishes.
    pub fn transport(&self, participant: impl Into<String>) -> InMemoryTransport {
        InMemoryTransport {
            member: self.next_member.fetch_add(1, Ordering::Relaxed),
            participant: participant.into(),
            tx: self.tx.clone(),
            rx: Mutex::new(Some(self.tx.subscribe())),
        }
    }
}

pub struct InMemoryTransport {
    member: u64,
    participant: String,
    tx: broadcast::Sender<Delivery>,
    rx: Mutex<Option<broadcast::Receiver<Delivery>>>,
}

#[async_trait]
impl Transport for InMemoryTransport {
    async fn initialize(&self) -> Result<(), TransportError> {
        Ok(())
    }

    async fn publish(&self, payload: Vec<u8>) -> Result<(), TransportError> {
        let _ = self.tx.send(Delivery {
            member: self.member,
            payload,
        });
        Ok(())
    }

    async fn subscribe(&self) -> Result<Subscription, TransportError> {
        let mut rx = self
            .rx
            .lock()
            .await
            .take()
            .ok_or_else(|| TransportError::Protocol("already subscribed".to_string()))?;
        let (tx, subscription) = mpsc::channel(SUBSCRIPTION_CAPACITY);
        let member = self.member;
        let participant = self.participant.clone();

        tokio::spawn(async move {
            loop {
                match rx.recv().await {
                    Ok(delivery) if delivery.member == member => {}
                    Ok(delivery) => {
                        if tx.send(delivery.payload).await.is_err() {
                            return;
                        }
                    }
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        warn!(%participant, skipped, "Subscriber lagging; messages skipped");
                    }
                    Err(broadcast::error::RecvError::Closed) => return,
                }
            }
        });

        Ok(Subscription::new(subscription))
    }
}
