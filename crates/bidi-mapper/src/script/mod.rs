//! Script/realm support code: the console log formatter (spec §4.5).

pub mod log_formatter;
