//! Meeting channel: the `Channel` seam and its WebSocket implementation.
//!
//! DESIGN
//! ======
//! A session only ever sends through `Arc<dyn Channel>` handed to it by the
//! caller. Connecting, reading inbound frames, and closing are the caller's
//! business; nothing in a session tears the connection down.
//!
//! `WsChannel` runs two tasks per connection:
//! - writer: drains an mpsc of outbound messages into the socket sink
//! - reader: decodes inbound messages into `Frame`s on an mpsc the caller owns
//!
//! Dropping a `WsChannel` aborts both tasks, which releases the socket.
//! Frames still queued are lost; `close` flushes them and says goodbye first.

use async_trait::async_trait;
use frames::Frame;
use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, info, warn};

/// Outbound queue depth per connection.
const OUTBOUND_CAPACITY: usize = 64;
/// Inbound queue depth per connection.
const INBOUND_CAPACITY: usize = 256;

#[derive(Debug, thiserror::Error)]
pub enum ChannelError {
    #[error("websocket connect failed: {0}")]
    Connect(Box<tokio_tungstenite::tungstenite::Error>),
    #[error("channel closed")]
    Closed,
}

/// Outbound half of a meeting connection.
///
/// `emit` is fire-and-forget: it returns once the frame is handed to the
/// transport, without waiting for any peer to acknowledge it.
#[async_trait]
pub trait Channel: Send + Sync {
    /// Queue `frame` for delivery.
    ///
    /// # Errors
    ///
    /// Returns [`ChannelError::Closed`] when the connection is gone.
    async fn emit(&self, frame: Frame) -> Result<(), ChannelError>;
}

/// A WebSocket connection carrying protobuf-encoded frames.
pub struct WsChannel {
    outbound: mpsc::Sender<Message>,
    writer: JoinHandle<()>,
    reader: JoinHandle<()>,
}

impl WsChannel {
    /// Connect to `url` and start the reader/writer tasks.
    ///
    /// Returns the channel plus the receiver of inbound frames.
    ///
    /// # Errors
    ///
    /// Returns [`ChannelError::Connect`] if the handshake fails.
    pub async fn connect(url: &str) -> Result<(Self, mpsc::Receiver<Frame>), ChannelError> {
        let (stream, _) = connect_async(url)
            .await
            .map_err(|error| ChannelError::Connect(Box::new(error)))?;
        info!(%url, "channel: connected");

        let (mut sink, mut source) = stream.split();
        let (outbound, mut outbound_rx) = mpsc::channel::<Message>(OUTBOUND_CAPACITY);
        let (inbound_tx, inbound) = mpsc::channel::<Frame>(INBOUND_CAPACITY);

        let writer = tokio::spawn(async move {
            while let Some(message) = outbound_rx.recv().await {
                let closing = matches!(message, Message::Close(_));
                if let Err(error) = sink.send(message).await {
                    warn!(%error, "channel: send failed");
                    break;
                }
                if closing {
                    break;
                }
            }
        });

        let reader = tokio::spawn(async move {
            while let Some(message) = source.next().await {
                let frame = match message {
                    Ok(Message::Binary(bytes)) => match frames::decode_frame(&bytes) {
                        Ok(frame) => frame,
                        Err(error) => {
                            warn!(%error, "channel: dropping undecodable frame");
                            continue;
                        }
                    },
                    Ok(Message::Text(text)) => match serde_json::from_str::<Frame>(text.as_str()) {
                        Ok(frame) => frame,
                        Err(error) => {
                            warn!(%error, "channel: dropping undecodable text frame");
                            continue;
                        }
                    },
                    Ok(Message::Close(_)) => break,
                    Ok(_) => continue,
                    Err(error) => {
                        warn!(%error, "channel: receive failed");
                        break;
                    }
                };
                debug!(syscall = %frame.syscall, "channel: inbound frame");
                if inbound_tx.send(frame).await.is_err() {
                    break;
                }
            }
            info!("channel: reader finished");
        });

        Ok((Self { outbound, writer, reader }, inbound))
    }

    /// Flush queued frames, send a close message and stop both tasks.
    pub async fn close(mut self) {
        if self.outbound.send(Message::Close(None)).await.is_err() {
            debug!("channel: writer already gone");
        }
        if let Err(error) = (&mut self.writer).await {
            warn!(%error, "channel: writer task failed");
        }
        info!("channel: closed");
    }
}

impl Drop for WsChannel {
    fn drop(&mut self) {
        self.writer.abort();
        self.reader.abort();
    }
}

#[async_trait]
impl Channel for WsChannel {
    async fn emit(&self, frame: Frame) -> Result<(), ChannelError> {
        debug!(syscall = %frame.syscall, id = %frame.id, "channel: emit");
        self.outbound
            .send(Message::Binary(frames::encode_frame(&frame).into()))
            .await
            .map_err(|_| ChannelError::Closed)
    }
}

#[cfg(test)]
#[path = "channel_test.rs"]
mod tests;
