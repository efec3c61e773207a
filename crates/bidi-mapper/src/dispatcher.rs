//! The `Dispatcher` and `CommandProcessor` (spec §4.1).
//!
//! Commands are processed in arrival order *per channel* but may complete
//! out of order relative to other channels: each channel gets its own
//! worker task draining an ordered queue, so a slow `browsingContext.navigate`
//! on channel A never blocks a `session.status` on channel B, while two
//! commands on the same channel still resolve (and respond) in the order
//! they arrived.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use bidi_types::{CommandFrame, ErrorCode, ErrorFrame, SuccessFrame};
use parking_lot::Mutex;
use tokio::sync::mpsc;
use tracing::{instrument, warn};

use crate::engine::MapperEngine;
use crate::error::MapperError;
use crate::modules;

/// A command still awaiting a result, kept for diagnostics (spec §4.1
/// "the dispatcher holds a per-in-flight record").
struct InFlight {
    channel: Option<String>,
    method: String,
    started_at: Instant,
}

/// Per-channel command queues plus the in-flight record table. One
/// dispatcher per mapper engine/session.
pub struct Dispatcher {
    engine: Arc<MapperEngine>,
    queues: Mutex<HashMap<Option<String>, mpsc::UnboundedSender<CommandFrame>>>,
    in_flight: Mutex<HashMap<u64, InFlight>>,
}

impl Dispatcher {
    #[must_use]
    pub fn new(engine: Arc<MapperEngine>) -> Self {
        Self {
            engine,
            queues: Mutex::new(HashMap::new()),
            in_flight: Mutex::new(HashMap::new()),
        }
    }

    /// Accepts an inbound command frame, resolving `channel`/`goog:channel`
    /// (spec §9) and enqueuing it on that channel's worker. Returns
    /// immediately; the result is emitted asynchronously via the engine's
    /// outbound stream.
    pub fn dispatch(self: &Arc<Self>, frame: CommandFrame) {
        let channel = match frame.resolve_channel() {
            Ok(channel) => channel.map(str::to_string),
            Err(error) => {
                self.engine
                    .emit_error(ErrorFrame::new(Some(frame.id), error, "channel and goog:channel disagree"));
                return;
            }
        };

        self.in_flight.lock().insert(
            frame.id,
            InFlight {
                channel: channel.clone(),
                method: frame.method.clone(),
                started_at: Instant::now(),
            },
        );

        let sender = {
            let mut queues = self.queues.lock();
            queues
                .entry(channel.clone())
                .or_insert_with(|| self.spawn_worker(channel))
                .clone()
        };

        if sender.send(frame).is_err() {
            // The worker task died (should only happen on process
            // teardown); nothing left to respond to.
        }
    }

    /// Spawns the worker task that drains a single channel's queue in
    /// arrival order, returning the sender the caller enqueues onto.
    fn spawn_worker(self: &Arc<Self>, channel: Option<String>) -> mpsc::UnboundedSender<CommandFrame> {
        let (tx, mut rx) = mpsc::unbounded_channel::<CommandFrame>();
        let dispatcher = Arc::clone(self);
        tokio::spawn(async move {
            while let Some(frame) = rx.recv().await {
                dispatcher.process(frame).await;
            }
        });
        tx
    }

    #[instrument(skip(self, frame), fields(method = %frame.method, id = frame.id))]
    async fn process(&self, frame: CommandFrame) {
        let id = frame.id;
        let channel = frame.channel.clone().or_else(|| frame.goog_channel.clone());
        let method = frame.method.clone();

        // A handler panic (spec §7 "Unexpected panics ... are caught and
        // surfaced as `unknown error` without tearing down the session")
        // must not take the per-channel worker down with it, so it runs
        // in its own task and the panic is observed through the `JoinHandle`.
        let engine = Arc::clone(&self.engine);
        let channel_for_handler = channel.clone();
        let join = tokio::spawn(async move {
            modules::handle(&engine, &method, frame.params, channel_for_handler.as_deref()).await
        });

        let outcome = join.await;

        if let Some(in_flight) = self.in_flight.lock().remove(&id) {
            tracing::trace!(
                method = %in_flight.method,
                elapsed_ms = in_flight.started_at.elapsed().as_millis() as u64,
                "command completed"
            );
        }

        match outcome {
            Ok(Ok(value)) => {
                self.engine.emit_success(SuccessFrame::new(id, value, channel));
            }
            Ok(Err(err)) => {
                self.emit_error(id, channel, err);
            }
            Err(join_err) => {
                warn!(%join_err, "command handler panicked");
                self.emit_error(
                    id,
                    channel,
                    MapperError::unknown_error("handler panicked"),
                );
            }
        }
    }

    fn emit_error(&self, id: u64, channel: Option<String>, err: MapperError) {
        self.engine.emit_error(
            ErrorFrame::new(Some(id), err.code, err.message).with_channel(channel),
        );
    }

    /// Resolves every in-flight command with `unknown error: session ended`
    /// (spec §5 "Cancellation and timeouts" — `session.end` and transport
    /// close resolve every pending command this way).
    pub fn fail_all_in_flight(&self) {
        let pending: Vec<(u64, Option<String>)> = self
            .in_flight
            .lock()
            .drain()
            .map(|(id, record)| (id, record.channel))
            .collect();
        for (id, channel) in pending {
            self.engine.emit_error(
                ErrorFrame::new(Some(id), ErrorCode::UnknownError, "session ended").with_channel(channel),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bidi_types::ErrorCode;
    use serde_json::json;

    #[test]
    fn resolve_channel_conflict_is_detected_before_touching_the_dispatcher() {
        let frame = CommandFrame {
            id: 1,
            method: "session.status".into(),
            params: json!({}),
            channel: Some("a".into()),
            goog_channel: Some("b".into()),
        };
        assert_eq!(frame.resolve_channel(), Err(ErrorCode::InvalidArgument));
    }
}
