//! # bidi-mapper — the BiDi/CDP mapper engine
//!
//! The core engine the spec describes as "Dispatcher -> CommandProcessor
//! -> Modules" on the way in and "EventProcessors -> EventRouter" on the
//! way out: per-module command handlers, the process-wide stores and
//! their state machines, the subscription manager, the CDP event
//! processor, and the command dispatcher. The concrete transport (the
//! client-facing WebSocket listener and the CDP connection setup) lives
//! in the `bidi-mapper-session` binary crate; this crate only needs an
//! already-connected [`bidi_cdp::CdpConnection`] to run.

pub mod config;
pub mod dispatcher;
pub mod engine;
pub mod error;
pub mod events;
pub mod modules;
pub mod network;
pub mod router;
pub mod script;
pub mod stores;
pub mod subscription;

pub use config::MapperConfig;
pub use dispatcher::Dispatcher;
pub use engine::{MapperEngine, MapperOutput};
pub use error::MapperError;
pub use events::spawn_event_loop;
