//! One WebSocket connection per search.
//!
//! The reader runs as a spawned task and forwards frames to the owning
//! session over an mpsc channel, tagged with the search generation so the
//! session can discard events from connections it has already replaced.

use common::SearchRequest;
use futures_util::{SinkExt, StreamExt};
use tokio::sync::{mpsc, oneshot};
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, info, warn};

use crate::error::{ClientError, Result};

pub type Generation = u64;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionEvent {
    Message { generation: Generation, text: String },
    Closed { generation: Generation },
    Failed { generation: Generation, error: String },
}

impl ConnectionEvent {
    pub fn generation(&self) -> Generation {
        match self {
            ConnectionEvent::Message { generation, .. }
            | ConnectionEvent::Closed { generation }
            | ConnectionEvent::Failed { generation, .. } => *generation,
        }
    }
}

/// Handle to an open connection. Dropping it closes the socket.
pub struct Connection {
    generation: Generation,
    close_tx: Option<oneshot::Sender<()>>,
}

impl Connection {
    /// Connects, sends `request` once and starts forwarding incoming frames.
    pub async fn open(
        url: &str,
        request: &SearchRequest,
        generation: Generation,
        events: mpsc::UnboundedSender<ConnectionEvent>,
    ) -> Result<Self> {
        info!(url, generation, "Connecting");

        let (stream, response) = connect_async(url)
            .await
            .map_err(|source| ClientError::Connect {
                url: url.to_string(),
                source,
            })?;
        debug!(status = %response.status(), "Handshake complete");

        let (mut write, mut read) = stream.split();

        let payload = serde_json::to_string(request)?;
        write
            .send(Message::Text(payload.into()))
            .await
            .map_err(ClientError::Send)?;

        let (close_tx, mut close_rx) = oneshot::channel::<()>();

        tokio::spawn(async move {
            loop {
                tokio::select! {
                    _ = &mut close_rx => {
                        debug!(generation, "Closing connection");
                        if let Err(e) = write.send(Message::Close(None)).await {
                            debug!(generation, "Close frame not sent: {}", e);
                        }
                        break;
                    }
                    frame = read.next() => match frame {
                        Some(Ok(Message::Text(text))) => {
                            let event = ConnectionEvent::Message {
                                generation,
                                text: text.as_str().to_owned(),
                            };
                            if events.send(event).is_err() {
                                break;
                            }
                        }
                        Some(Ok(Message::Binary(data))) => {
                            warn!(generation, "Ignoring binary frame ({} bytes)", data.len());
                        }
                        Some(Ok(Message::Close(frame))) => {
                            let reason = frame.map(|f| f.reason.as_str().to_owned()).unwrap_or_default();
                            info!(generation, reason = %reason, "Server closed connection");
                            let _ = events.send(ConnectionEvent::Closed { generation });
                            break;
                        }
                        // Ping/Pong are answered by tungstenite
                        Some(Ok(_)) => {}
                        Some(Err(e)) => {
                            let _ = events.send(ConnectionEvent::Failed {
                                generation,
                                error: e.to_string(),
                            });
                            break;
                        }
                        None => {
                            let _ = events.send(ConnectionEvent::Closed { generation });
                            break;
                        }
                    }
                }
            }
            debug!(generation, "Reader finished");
        });

        Ok(Self {
            generation,
            close_tx: Some(close_tx),
        })
    }

    pub fn generation(&self) -> Generation {
        self.generation
    }

    /// Sends a Close frame and stops forwarding.
    pub fn close(mut self) {
        self.signal_close();
    }

    fn signal_close(&mut self) {
        if let Some(tx) = self.close_tx.take() {
            // Err means the reader already finished
            let _ = tx.send(());
        }
    }
}

impl Drop for Connection {
    fn drop(&mut self) {
        self.signal_close();
    }
}
