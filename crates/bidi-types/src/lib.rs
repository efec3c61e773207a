//! # bidi-types — WebDriver BiDi wire schema
//!
//! Hand-written Rust types mirroring the fixed BiDi/Permissions/`goog:*`
//! wire schema: the frame envelope, the `ErrorCode` taxonomy, and
//! per-module params/results. Treated the way the teacher treats its CDP
//! `protocol` modules — plain serde structs/enums, no runtime logic.
//!
//! Only the methods, events, and fields the mapper engine actually speaks
//! are modeled here; this is not a full BiDi binding.

pub mod browser;
pub mod browsing_context;
pub mod error;
pub mod frame;
pub mod input;
pub mod network;
pub mod permissions;
pub mod script;
pub mod session;
pub mod storage;

pub use error::ErrorCode;
pub use frame::{CommandFrame, ErrorFrame, EventFrame, SuccessFrame};
