//! # bidi-cdp — Chrome DevTools Protocol client
//!
//! Southbound transport for the BiDi mapper: a single WebSocket connection
//! to a Chromium-family browser's CDP endpoint, multiplexing browser-level
//! and per-target commands using CDP's flat session addressing.
//!
//! This crate handles:
//! - WebSocket connection management to the browser's CDP endpoint
//! - CDP message (de)serialization
//! - Command/response correlation by message id, with timeouts
//! - Event broadcast to every interested subscriber
//!
//! It does not discover or launch a browser process, and does not attempt
//! to model the full CDP surface — only the domains and methods the mapper
//! drives (see [`protocol`]).
//!
//! ## Quick start
//!
//! ```no_run
//! use bidi_cdp::CdpConnection;
//! use bidi_cdp::protocol::target::CreateTargetParams;
//!
//! # async fn example() -> Result<(), bidi_cdp::CdpError> {
//! let conn = CdpConnection::connect("ws://localhost:9222/devtools/browser/...").await?;
//!
//! let result: bidi_cdp::protocol::target::CreateTargetResult = conn
//!     .send_command(
//!         "Target.createTarget",
//!         Some(CreateTargetParams {
//!             url: "about:blank".to_string(),
//!             browser_context_id: None,
//!             background: None,
//!         }),
//!         None,
//!     )
//!     .await?;
//!
//! println!("created target {}", result.target_id);
//! # Ok(())
//! # }
//! ```
//!
//! ## Subscribing to events
//!
//! ```no_run
//! use bidi_cdp::CdpConnection;
//!
//! # async fn example(conn: &CdpConnection) {
//! let mut events = conn.subscribe_events();
//! while let Ok(event) = events.recv().await {
//!     match event.method.as_str() {
//!         "Page.loadEventFired" => { /* ... */ }
//!         "Network.requestWillBeSent" => { /* ... */ }
//!         _ => {}
//!     }
//! }
//! # }
//! ```
//!
//! ## Module organization
//!
//! - [`connection`] — WebSocket connection management
//! - [`transport`] — Wire message types
//! - [`protocol`] — CDP domain type definitions
//! - [`error`] — Error types

pub mod connection;
pub mod error;
pub mod protocol;
pub mod transport;

pub use connection::{CdpConnection, DEFAULT_TIMEOUT};
pub use error::CdpError;
pub use transport::{CdpEvent, CdpMessage, CdpRequest, CdpResponse};
