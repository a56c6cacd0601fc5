use crate::config::SignalingConfig;
use crate::error::SignalingError;
use crate::signaling::SignalingTransport;
use async_trait::async_trait;
use futures::{SinkExt, StreamExt};
use huddle_core::{ClientSignal, ServerSignal};
use std::sync::Mutex;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, error, info, warn};

#[derive(Default)]
struct Connection {
    outbound: Option<mpsc::UnboundedSender<ClientSignal>>,
    tasks: Vec<JoinHandle<()>>,
}

/// JSON over WebSocket: `{"event": "...", "data": {...}}` per text frame.
pub struct WsSignalingTransport {
    config: SignalingConfig,
    connection: Mutex<Connection>,
}

impl WsSignalingTransport {
    pub fn new(config: SignalingConfig) -> Self {
        Self {
            config,
            connection: Mutex::new(Connection::default()),
        }
    }

    pub fn url(&self) -> &str {
        &self.config.url
    }

    fn take_connection(&self) -> Connection {
        match self.connection.lock() {
            Ok(mut conn) => std::mem::take(&mut *conn),
            Err(poisoned) => std::mem::take(&mut *poisoned.into_inner()),
        }
    }
}

fn decode_frame(text: &str) -> Result<ServerSignal, SignalingError> {
    Ok(serde_json::from_str(text)?)
}

#[async_trait]
impl SignalingTransport for WsSignalingTransport {
    async fn connect(&self) -> Result<mpsc::Receiver<ServerSignal>, SignalingError> {
        let (ws_stream, _) = connect_async(self.config.url.as_str()).await?;
        info!("Signaling connected to {}", self.config.url);

        let (mut ws_write, mut ws_read) = ws_stream.split();
        let (out_tx, mut out_rx) = mpsc::unbounded_channel::<ClientSignal>();
        let (in_tx, in_rx) = mpsc::channel::<ServerSignal>(self.config.inbound_capacity);

        let writer = tokio::spawn(async move {
            while let Some(signal) = out_rx.recv().await {
                let text = match serde_json::to_string(&signal) {
                    Ok(text) => text,
                    Err(e) => {
                        error!("Failed to encode {} signal: {}", signal.event_name(), e);
                        continue;
                    }
                };
                if let Err(e) = ws_write.send(Message::Text(text)).await {
                    error!("Signaling write failed: {}", e);
                    break;
                }
            }
            let _ = ws_write.close().await;
        });

        let reader = tokio::spawn(async move {
            while let Some(msg) = ws_read.next().await {
                match msg {
                    Ok(Message::Text(text)) => match decode_frame(&text) {
                        Ok(signal) => {
                            if in_tx.send(signal).await.is_err() {
                                break;
                            }
                        }
                        Err(e) => warn!("Skipping malformed signaling frame: {}", e),
                    },
                    Ok(Message::Close(_)) => break,
                    Ok(_) => {}
                    Err(e) => {
                        error!("Signaling read failed: {}", e);
                        break;
                    }
                }
            }
            debug!("Signaling reader finished");
        });

        let mut conn = self
            .connection
            .lock()
            .map_err(|_| SignalingError::Connect("connection state poisoned".into()))?;
        for task in conn.tasks.drain(..) {
            task.abort();
        }
        conn.outbound = Some(out_tx);
        conn.tasks = vec![writer, reader];

        Ok(in_rx)
    }

    async fn send(&self, signal: ClientSignal) -> Result<(), SignalingError> {
        let outbound = self
            .connection
            .lock()
            .ok()
            .and_then(|conn| conn.outbound.clone())
            .ok_or(SignalingError::NotConnected)?;

        debug!("Sending {} signal", signal.event_name());
        outbound
            .send(signal)
            .map_err(|_| SignalingError::NotConnected)
    }

    async fn disconnect(&self) {
        let conn = self.take_connection();
        if conn.outbound.is_none() && conn.tasks.is_empty() {
            return;
        }
        // Dropping the sender lets the writer flush and close the socket.
        drop(conn.outbound);
        for task in conn.tasks.into_iter().skip(1) {
            task.abort();
        }
        info!("Signaling disconnected from {}", self.config.url);
    }
}
