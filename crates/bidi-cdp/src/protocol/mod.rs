//! Typed parameter/result structs for the CDP domains the mapper drives.
//!
//! These are hand-written against the stable CDP domains listed in §6 of
//! the mapper specification (`Target`, `Page`, `Runtime`, `Network`,
//! `Fetch`, `Input`, `Browser`, `Storage`, `Emulation`). Only the methods
//! and fields the mapper actually sends/receives are modeled — this is not
//! a full CDP binding.

pub mod browser;
pub mod emulation;
pub mod fetch;
pub mod input;
pub mod network;
pub mod page;
pub mod runtime;
pub mod storage;
pub mod target;
