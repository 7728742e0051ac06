//! TCP hub broker: the shared channel every participant connects to.
//!
//! Each connection first joins a space, then its publishes are relayed to
//! every other connection in the same space. A participant never receives
//! its own publishes.
//!
//! Per connection the hub runs:
//!
//! - a reader loop that owns the socket read half and turns `publish`
//!   frames into space broadcasts;
//! - a writer task that owns the write half and forwards the space's
//!   broadcasts (except its own) as `deliver` frames.
//!
//! Fan-out uses one `tokio::sync::broadcast` channel per space; a slow
//! connection that falls behind skips the frames it missed and keeps going.

use super::frame::Frame;
use noa_application::TransportError;
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, BufWriter};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::{Mutex, broadcast};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, trace, warn};

/// Default hub address.
pub const DEFAULT_ENDPOINT: &str = "127.0.0.1:46357";

/// Frames buffered per space before slow connections start lagging.
const SPACE_CAPACITY: usize = 1024;

#[derive(Debug, Clone)]
struct Delivery {
    connection: u64,
    from: String,
    payload: String,
}

type Spaces = Arc<Mutex<HashMap<String, broadcast::Sender<Delivery>>>>;

pub struct HubServer {
    listener: TcpListener,
    spaces: Spaces,
    next_connection: AtomicU64,
}

impl HubServer {
    pub async fn bind(addr: &str) -> Result<Self, TransportError> {
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|e| TransportError::Connection(format!("bind {}: {}", addr, e)))?;
        Ok(Self {
            listener,
            spaces: Arc::new(Mutex::new(HashMap::new())),
            next_connection: AtomicU64::new(1),
        })
    }

    pub fn local_addr(&self) -> Result<SocketAddr, TransportError> {
        Ok(self.listener.local_addr()?)
    }

    /// Accept connections until `cancel` fires.
    pub async fn serve(self, cancel: CancellationToken) -> Result<(), TransportError> {
        info!("Hub listening on {}", self.local_addr()?);

        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    info!("Hub shutting down");
                    return Ok(());
                }
                accepted = self.listener.accept() => {
                    let (stream, peer) = match accepted {
                        Ok(conn) => conn,
                        Err(e) => {
                            warn!("Hub accept failed: {}", e);
                            continue;
                        }
                    };
                    let id = self.next_connection.fetch_add(1, Ordering::Relaxed);
                    debug!(connection = id, %peer, "Connection accepted");
                    let spaces = Arc::clone(&self.spaces);
                    let cancel = cancel.child_token();
                    tokio::spawn(async move {
                        tokio::select! {
                            _ = cancel.cancelled() => {}
                            _ = handle_connection(id, stream, spaces) => {}
                        }
                    });
                }
            }
        }
    }
}

async fn handle_connection(id: u64, stream: TcpStream, spaces: Spaces) {
    let (read_half, write_half) = stream.into_split();
    let mut lines = BufReader::new(read_half).lines();
    let mut writer = BufWriter::new(write_half);

    let (space, participant) = match lines.next_line().await {
        Ok(Some(line)) => match Frame::from_line(&line) {
            Ok(Frame::Join { space, participant }) => (space, participant),
            Ok(other) => {
                warn!(connection = id, "Expected join, got {}; closing", other.kind());
                return;
            }
            Err(e) => {
                warn!(connection = id, "Malformed join frame: {}; closing", e);
                return;
            }
        },
        Ok(None) => return,
        Err(e) => {
            warn!(connection = id, "Read failed before join: {}", e);
            return;
        }
    };

    let sender = {
        let mut spaces = spaces.lock().await;
        spaces
            .entry(space.clone())
            .or_insert_with(|| broadcast::channel(SPACE_CAPACITY).0)
            .clone()
    };
    let receiver = sender.subscribe();

    // Acknowledge only once subscribed, so nothing published after the ack is missed.
    let ack = Frame::Joined {
        space: space.clone(),
    };
    if let Err(e) = write_frame(&mut writer, &ack).await {
        warn!(connection = id, "Could not acknowledge join: {}", e);
        return;
    }
    info!(connection = id, %space, %participant, "Participant joined");

    let forwarder = tokio::spawn(forward_deliveries(id, receiver, writer));
    relay_publishes(id, &participant, lines, &sender).await;
    forwarder.abort();
    info!(connection = id, %space, %participant, "Participant left");
}

async fn relay_publishes(
    id: u64,
    participant: &str,
    mut lines: tokio::io::Lines<BufReader<OwnedReadHalf>>,
    sender: &broadcast::Sender<Delivery>,
) {
    loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => return,
            Err(e) => {
                warn!(connection = id, "Read failed: {}", e);
                return;
            }
        };
        if line.trim().is_empty() {
            continue;
        }

        match Frame::from_line(&line) {
            Ok(Frame::Publish { payload }) => {
                trace!(connection = id, bytes = payload.len(), "Relaying publish");
                // No other member in the space is not an error.
                let _ = sender.send(Delivery {
                    connection: id,
                    from: participant.to_string(),
                    payload,
                });
            }
            Ok(other) => {
                warn!(connection = id, "Ignoring unexpected {} frame", other.kind());
            }
            Err(e) => {
                warn!(connection = id, "Ignoring malformed frame: {}", e);
            }
        }
    }
}

async fn forward_deliveries(
    id: u64,
    mut receiver: broadcast::Receiver<Delivery>,
    mut writer: BufWriter<OwnedWriteHalf>,
) {
    loop {
        let delivery = match receiver.recv().await {
            Ok(delivery) => delivery,
            Err(broadcast::error::RecvError::Lagged(skipped)) => {
                warn!(connection = id, skipped, "Connection lagging; frames skipped");
                continue;
            }
            Err(broadcast::error::RecvError::Closed) => return,
        };
        if delivery.connection == id {
            continue;
        }

        let frame = Frame::Deliver {
            from: delivery.from,
            payload: delivery.payload,
        };
        if let Err(e) = write_frame(&mut writer, &frame).await {
            debug!(connection = id, "Delivery failed: {}", e);
            return;
        }
    }
}

pub(crate) async fn write_frame(
    writer: &mut BufWriter<OwnedWriteHalf>,
    frame: &Frame,
) -> Result<(), TransportError> {
    let line = frame
        .to_line()
        .map_err(|e| TransportError::Protocol(e.to_string()))?;
    writer.write_all(line.as_bytes()).await?;
    writer.flush().await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    async fn start_hub() -> (SocketAddr, CancellationToken) {
        let hub = HubServer::bind("127.0.0.1:0").await.unwrap();
        let addr = hub.local_addr().unwrap();
        let cancel = CancellationToken::new();
        tokio::spawn(hub.serve(cancel.clone()));
        (addr, cancel)
    }

    struct RawClient {
        lines: tokio::io::Lines<BufReader<OwnedReadHalf>>,
        writer: BufWriter<OwnedWriteHalf>,
    }

    impl RawClient {
        async fn join(addr: SocketAddr, space: &str, participant: &str) -> Self {
            let stream = TcpStream::connect(addr).await.unwrap();
            let (read_half, write_half) = stream.into_split();
            let mut client = Self {
                lines: BufReader::new(read_half).lines(),
                writer: BufWriter::new(write_half),
            };
            client
                .send(&Frame::Join {
                    space: space.to_string(),
                    participant: participant.to_string(),
                })
                .await;
            assert_eq!(
                client.next().await,
                Some(Frame::Joined {
                    space: space.to_string()
                })
            );
            client
        }

        async fn send(&mut self, frame: &Frame) {
            write_frame(&mut self.writer, frame).await.unwrap();
        }

        async fn publish(&mut self, payload: &str) {
            self.send(&Frame::Publish {
                payload: payload.to_string(),
            })
            .await;
        }

        async fn next(&mut self) -> Option<Frame> {
            let line = tokio::time::timeout(Duration::from_secs(2), self.lines.next_line())
                .await
                .expect("timed out waiting for a frame")
                .unwrap()?;
            Some(Frame::from_line(&line).unwrap())
        }

        async fn expect_silence(&mut self) {
            let result =
                tokio::time::timeout(Duration::from_millis(100), self.lines.next_line()).await;
            assert!(result.is_err(), "unexpected frame: {:?}", result);
        }
    }

    #[tokio::test]
    async fn test_publish_reaches_others_but_not_publisher() {
        let (addr, cancel) = start_hub().await;
        let mut moderator = RawClient::join(addr, "chat", "moderator").await;
        let mut proxy = RawClient::join(addr, "chat", "user-proxy").await;
        let mut assistant = RawClient::join(addr, "chat", "pdf-assistant").await;

        proxy.publish("hello").await;

        for client in [&mut moderator, &mut assistant] {
            assert_eq!(
                client.next().await,
                Some(Frame::Deliver {
                    from: "user-proxy".to_string(),
                    payload: "hello".to_string()
                })
            );
        }
        proxy.expect_silence().await;
        cancel.cancel();
    }

    #[tokio::test]
    async fn test_spaces_are_isolated() {
        let (addr, cancel) = start_hub().await;
        let mut chat = RawClient::join(addr, "chat", "moderator").await;
        let mut other = RawClient::join(addr, "other", "moderator").await;
        let mut publisher = RawClient::join(addr, "chat", "user-proxy").await;

        publisher.publish("hello").await;

        assert!(matches!(chat.next().await, Some(Frame::Deliver { .. })));
        other.expect_silence().await;
        cancel.cancel();
    }

    #[tokio::test]
    async fn test_publisher_order_is_preserved() {
        let (addr, cancel) = start_hub().await;
        let mut listener = RawClient::join(addr, "chat", "user-proxy").await;
        let mut moderator = RawClient::join(addr, "chat", "moderator").await;

        for payload in ["first", "second", "third"] {
            moderator.publish(payload).await;
        }

        for expected in ["first", "second", "third"] {
            match listener.next().await {
                Some(Frame::Deliver { payload, .. }) => assert_eq!(payload, expected),
                other => panic!("expected delivery, got {other:?}"),
            }
        }
        cancel.cancel();
    }

    #[tokio::test]
    async fn test_connection_must_join_first() {
        let (addr, cancel) = start_hub().await;
        let stream = TcpStream::connect(addr).await.unwrap();
        let (read_half, write_half) = stream.into_split();
        let mut writer = BufWriter::new(write_half);
        let mut lines = BufReader::new(read_half).lines();

        write_frame(
            &mut writer,
            &Frame::Publish {
                payload: "too early".to_string(),
            },
        )
        .await
        .unwrap();

        let closed = tokio::time::timeout(Duration::from_secs(2), lines.next_line())
            .await
            .expect("hub should close the connection");
        assert!(matches!(closed, Ok(None) | Err(_)));
        cancel.cancel();
    }

    #[tokio::test]
    async fn test_malformed_frames_are_skipped() {
        let (addr, cancel) = start_hub().await;
        let mut listener = RawClient::join(addr, "chat", "moderator").await;
        let mut publisher = RawClient::join(addr, "chat", "user-proxy").await;

        publisher
            .writer
            .write_all(b"garbage\n{\"frame\":\"join\",\"space\":\"x\",\"participant\":\"y\"}\n")
            .await
            .unwrap();
        publisher.writer.flush().await.unwrap();
        publisher.publish("still here").await;

        assert_eq!(
            listener.next().await,
            Some(Frame::Deliver {
                from: "user-proxy".to_string(),
                payload: "still here".to_string()
            })
        );
        cancel.cancel();
    }
}
