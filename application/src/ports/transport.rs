//! Transport port
//!
//! Defines the publish/subscribe channel every participant talks through.
//! The core needs exactly three operations: initialise, publish a payload,
//! and subscribe to the ongoing stream of delivered payloads.

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::mpsc;

/// Errors raised by a transport. Fatal to the current participant.
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Transport not initialized")]
    NotInitialized,

    #[error("Transport closed")]
    Closed,

    #[error("Invalid payload: {0}")]
    InvalidPayload(String),

    #[error("Protocol error: {0}")]
    Protocol(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Shared publish/subscribe channel.
///
/// Implementations (adapters) live in the infrastructure layer. Publishing is
/// fire-and-forget: no delivery acknowledgment is consumed. A participant does
/// not receive its own publishes.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Connect and join the shared space.
    async fn initialize(&self) -> Result<(), TransportError>;

    /// Publish one payload to every other participant.
    async fn publish(&self, payload: Vec<u8>) -> Result<(), TransportError>;

    /// Start receiving payloads published by others.
    async fn subscribe(&self) -> Result<Subscription, TransportError>;
}

/// Stream of delivered payloads.
///
/// Wraps the receiving half of the adapter's background receive task.
/// [`recv`](Self::recv) returns `None` once the transport has closed.
pub struct Subscription {
    receiver: mpsc::Receiver<Vec<u8>>,
}

impl Subscription {
    pub fn new(receiver: mpsc::Receiver<Vec<u8>>) -> Self {
        Self { receiver }
    }

    /// Wait for the next delivered payload.
    pub async fn recv(&mut self) -> Option<Vec<u8>> {
        self.receiver.recv().await
    }
}
