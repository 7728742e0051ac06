//! [`Transport`] implementation that talks to a [`HubServer`](super::hub::HubServer).

use super::frame::Frame;
use super::hub::write_frame;
use async_trait::async_trait;
use noa_application::{Subscription, Transport, TransportError};
use tokio::io::{AsyncBufReadExt, BufReader, BufWriter, Lines};
use tokio::net::TcpStream;
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::sync::{Mutex, mpsc};
use tracing::{debug, info, warn};

/// Deliveries buffered before the reader task waits on the participant.
const SUBSCRIPTION_CAPACITY: usize = 256;

pub struct HubTransport {
    endpoint: String,
    space: String,
    participant: String,
    writer: Mutex<Option<BufWriter<OwnedWriteHalf>>>,
    reader: Mutex<Option<Lines<BufReader<OwnedReadHalf>>>>,
}

impl HubTransport {
    pub fn new(
        endpoint: impl Into<String>,
        space: impl Into<String>,
        participant: impl Into<String>,
    ) -> Self {
        Self {
            endpoint: endpoint.into(),
            space: space.into(),
            participant: participant.into(),
            writer: Mutex::new(None),
            reader: Mutex::new(None),
        }
    }

    pub fn participant(&self) -> &str {
        &self.participant
    }
}

#[async_trait]
impl Transport for HubTransport {
    /// Connect and join the space. Completes once the hub acknowledged the join.
    async fn initialize(&self) -> Result<(), TransportError> {
        let stream = TcpStream::connect(&self.endpoint)
            .await
            .map_err(|e| TransportError::Connection(format!("{}: {}", self.endpoint, e)))?;
        let (read_half, write_half) = stream.into_split();
        let mut writer = BufWriter::new(write_half);
        let mut lines = BufReader::new(read_half).lines();

        let join = Frame::Join {
            space: self.space.clone(),
            participant: self.participant.clone(),
        };
        write_frame(&mut writer, &join).await?;

        match lines.next_line().await? {
            Some(line) => match Frame::from_line(&line) {
                Ok(Frame::Joined { .. }) => {}
                Ok(other) => {
                    return Err(TransportError::Protocol(format!(
                        "expected joined, got {}",
                        other.kind()
                    )));
                }
                Err(e) => return Err(TransportError::Protocol(e.to_string())),
            },
            None => return Err(TransportError::Closed),
        }

        info!(endpoint = %self.endpoint, space = %self.space, participant = %self.participant, "Joined hub");
        *self.writer.lock().await = Some(writer);
        *self.reader.lock().await = Some(lines);
        Ok(())
    }

    async fn publish(&self, payload: Vec<u8>) -> Result<(), TransportError> {
        let payload = String::from_utf8(payload)
            .map_err(|e| TransportError::InvalidPayload(e.to_string()))?;

        let mut guard = self.writer.lock().await;
        let writer = guard.as_mut().ok_or(TransportError::NotInitialized)?;
        write_frame(writer, &Frame::Publish { payload }).await
    }

    /// Start the single background reader; deliveries arrive on the returned
    /// subscription until the connection closes.
    async fn subscribe(&self) -> Result<Subscription, TransportError> {
        let mut lines = self
            .reader
            .lock()
            .await
            .take()
            .ok_or(TransportError::NotInitialized)?;
        let (tx, rx) = mpsc::channel(SUBSCRIPTION_CAPACITY);
        let participant = self.participant.clone();

        tokio::spawn(async move {
            loop {
                let line = match lines.next_line().await {
                    Ok(Some(line)) => line,
                    Ok(None) => {
                        info!(%participant, "Hub closed the connection");
                        return;
                    }
                    Err(e) => {
                        warn!(%participant, "Hub read failed: {}", e);
                        return;
                    }
                };

                match Frame::from_line(&line) {
                    Ok(Frame::Deliver { from, payload }) => {
                        debug!(%participant, %from, bytes = payload.len(), "Delivery");
                        if tx.send(payload.into_bytes()).await.is_err() {
                            return;
                        }
                    }
                    Ok(other) => warn!(%participant, "Ignoring unexpected {} frame", other.kind()),
                    Err(e) => warn!(%participant, "Ignoring malformed frame: {}", e),
                }
            }
        });

        Ok(Subscription::new(rx))
    }
}
