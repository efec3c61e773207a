//! CDP WebSocket connection management.
//!
//! A single [`CdpConnection`] multiplexes every browser-level and
//! target-level command over one WebSocket, using CDP's own `sessionId`
//! field to route target-scoped commands — the same "flat" session model
//! the browser itself expects once `Target.attachToTarget` is called with
//! `flatten: true`.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tokio::sync::{broadcast, mpsc, oneshot, Mutex};
use tokio::time::timeout;
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, error, info, instrument, trace, warn};

use crate::error::CdpError;
use crate::transport::{CdpEvent, CdpMessage, CdpRequest, CdpResponse};

/// Default timeout applied to commands that don't specify their own.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Capacity of the broadcast channel events are fanned out on.
const EVENT_CHANNEL_SIZE: usize = 1024;

/// A live connection to a Chromium-family browser's CDP WebSocket endpoint.
#[derive(Debug)]
pub struct CdpConnection {
    tx: mpsc::Sender<CdpRequest>,
    event_tx: broadcast::Sender<CdpEvent>,
    pending: Arc<Mutex<HashMap<u64, oneshot::Sender<CdpResponse>>>>,
    message_id: AtomicU64,
    _read_handle: tokio::task::JoinHandle<()>,
    _write_handle: tokio::task::JoinHandle<()>,
}

impl CdpConnection {
    /// Connects to a CDP WebSocket endpoint.
    ///
    /// # Errors
    ///
    /// Returns an error if the WebSocket handshake fails.
    #[instrument(level = "info", skip(ws_url), fields(ws_url = %ws_url))]
    pub async fn connect(ws_url: &str) -> Result<Self, CdpError> {
        info!("connecting to CDP endpoint");
        let (ws_stream, response) = tokio_tungstenite::connect_async(ws_url)
            .await
            .map_err(CdpError::from)?;
        info!(status = %response.status(), "CDP WebSocket established");

        let (write, read) = ws_stream.split();

        let (tx, rx) = mpsc::channel::<CdpRequest>(64);
        let (event_tx, _) = broadcast::channel::<CdpEvent>(EVENT_CHANNEL_SIZE);
        let pending: Arc<Mutex<HashMap<u64, oneshot::Sender<CdpResponse>>>> =
            Arc::new(Mutex::new(HashMap::new()));

        let write_handle = tokio::spawn(Self::write_loop(rx, write));
        let read_pending = pending.clone();
        let read_event_tx = event_tx.clone();
        let read_handle = tokio::spawn(Self::read_loop(read, read_pending, read_event_tx));

        Ok(Self {
            tx,
            event_tx,
            pending,
            message_id: AtomicU64::new(1),
            _read_handle: read_handle,
            _write_handle: write_handle,
        })
    }

    async fn write_loop<S>(mut rx: mpsc::Receiver<CdpRequest>, mut sink: S)
    where
        S: futures_util::Sink<Message, Error = tokio_tungstenite::tungstenite::Error> + Unpin,
    {
        while let Some(request) = rx.recv().await {
            let method = request.method.clone();
            let id = request.id;

            let json = match serde_json::to_string(&request) {
                Ok(j) => j,
                Err(e) => {
                    error!(error = %e, method = %method, "failed to serialize CDP request");
                    continue;
                }
            };

            trace!(id, method = %method, "sending CDP request");
            if sink.send(Message::Text(json.into())).await.is_err() {
                warn!("CDP WebSocket sink closed, ending write loop");
                break;
            }
        }
    }

    async fn read_loop<S>(
        mut stream: S,
        pending: Arc<Mutex<HashMap<u64, oneshot::Sender<CdpResponse>>>>,
        event_tx: broadcast::Sender<CdpEvent>,
    ) where
        S: futures_util::Stream<Item = Result<Message, tokio_tungstenite::tungstenite::Error>>
            + Unpin,
    {
        while let Some(msg) = stream.next().await {
            let text = match msg {
                Ok(Message::Text(text)) => text,
                Ok(Message::Close(frame)) => {
                    info!(?frame, "CDP WebSocket closed by browser");
                    break;
                }
                Err(e) => {
                    warn!(error = %e, "CDP WebSocket error, ending read loop");
                    break;
                }
                Ok(_) => continue,
            };

            let cdp_msg: CdpMessage = match serde_json::from_str(&text) {
                Ok(m) => m,
                Err(e) => {
                    error!(error = %e, "failed to parse CDP message");
                    continue;
                }
            };

            match cdp_msg {
                CdpMessage::Response(resp) => {
                    let id = resp.id;
                    let mut pending = pending.lock().await;
                    if let Some(sender) = pending.remove(&id) {
                        let _ = sender.send(resp);
                    } else {
                        warn!(id, "response for unknown request id");
                    }
                }
                CdpMessage::Event(event) => {
                    trace!(method = %event.method, session_id = ?event.session_id, "CDP event");
                    let _ = event_tx.send(event);
                }
            }
        }
    }

    /// Sends a CDP command and awaits its response, using [`DEFAULT_TIMEOUT`].
    ///
    /// # Errors
    ///
    /// Returns an error if the command cannot be sent, the response times
    /// out, or the browser reports a protocol error.
    pub async fn send_command<P, R>(
        &self,
        method: &str,
        params: Option<P>,
        session_id: Option<&str>,
    ) -> Result<R, CdpError>
    where
        P: Serialize,
        R: DeserializeOwned,
    {
        self.send_command_with_timeout(method, params, session_id, DEFAULT_TIMEOUT)
            .await
    }

    /// Sends a CDP command with a caller-supplied timeout.
    ///
    /// # Errors
    ///
    /// Returns an error if the command cannot be sent, the response times
    /// out, or the browser reports a protocol error.
    #[instrument(level = "debug", skip(self, params), fields(method = %method, session_id = ?session_id))]
    pub async fn send_command_with_timeout<P, R>(
        &self,
        method: &str,
        params: Option<P>,
        session_id: Option<&str>,
        timeout_duration: Duration,
    ) -> Result<R, CdpError>
    where
        P: Serialize,
        R: DeserializeOwned,
    {
        let id = self.message_id.fetch_add(1, Ordering::Relaxed);
        let params_value = params.map(serde_json::to_value).transpose()?;

        let request = CdpRequest {
            id,
            method: method.to_string(),
            params: params_value,
            session_id: session_id.map(ToString::to_string),
        };

        let (resp_tx, resp_rx) = oneshot::channel();
        {
            let mut pending = self.pending.lock().await;
            pending.insert(id, resp_tx);
        }

        self.tx
            .send(request)
            .await
            .map_err(|_| CdpError::ConnectionLost)?;

        let response = timeout(timeout_duration, resp_rx)
            .await
            .map_err(|_| {
                warn!(id, method = %method, "CDP command timed out");
                CdpError::Timeout(timeout_duration)
            })?
            .map_err(|_| CdpError::ConnectionLost)?;

        if let Some(error) = response.error {
            return Err(CdpError::Protocol {
                code: error.code,
                message: error.message,
            });
        }

        let result = response.result.unwrap_or(Value::Null);
        serde_json::from_value(result).map_err(CdpError::from)
    }

    /// Subscribes to the broadcast stream of CDP events.
    ///
    /// Each subscriber receives every event independently; events are not
    /// filtered by session here — callers filter by `session_id`/`method`.
    pub fn subscribe_events(&self) -> broadcast::Receiver<CdpEvent> {
        self.event_tx.subscribe()
    }
}

#[cfg(test)]
mod tests;
