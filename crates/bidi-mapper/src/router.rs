//! Event routing (spec §4.6 "Ordering guarantees" / event fan-out):
//! consult the subscription manager once per event, serialize the payload
//! once, and fan it out per subscribed channel.

use std::sync::Arc;

use bidi_types::EventFrame;
use serde::Serialize;
use tracing::warn;

use crate::engine::MapperEngine;

/// Emits `event` with `payload` to every channel currently subscribed to
/// it at `top_level_context`. A no-op if nobody is subscribed.
pub fn route(engine: &Arc<MapperEngine>, event: &str, top_level_context: &str, payload: impl Serialize) {
    let value = match serde_json::to_value(payload) {
        Ok(value) => value,
        Err(err) => {
            warn!(event, %err, "failed to serialize event payload");
            return;
        }
    };

    let channels = engine
        .subscriptions
        .read()
        .channels_for(event, top_level_context);

    for channel in channels {
        engine.emit_event(EventFrame::new(event, value.clone(), channel));
    }
}
