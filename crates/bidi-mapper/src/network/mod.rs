//! Network-request support code shared by the stores and the `network`
//! module handlers: URL-pattern matching and header representation
//! conversions (spec §4.3).

pub mod headers;
pub mod url_pattern;
