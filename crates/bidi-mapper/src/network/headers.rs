//! Header representation conversions (spec §4.3 "Header representation
//! invariants", testable property #5).

use std::collections::HashMap;

use bidi_cdp::protocol::fetch::HeaderEntry as CdpHeaderEntry;
use bidi_types::network::{BytesValue, Header};

/// Converts a BiDi header to its CDP wire form: the string form is used
/// where available, base64 is decoded otherwise.
#[must_use]
pub fn to_cdp(header: &Header) -> CdpHeaderEntry {
    CdpHeaderEntry {
        name: header.name.clone(),
        value: header.value.to_cdp_string(),
    }
}

/// Converts a CDP header to BiDi form. CDP never reports base64 values, so
/// this always yields the string variant.
#[must_use]
pub fn from_cdp(header: &CdpHeaderEntry) -> Header {
    Header {
        name: header.name.clone(),
        value: BytesValue::String {
            value: header.value.clone(),
        },
    }
}

/// Converts the `Network` domain's map-shaped headers to BiDi form. Unlike
/// `Fetch`, `Network.Request`/`Response` never carry duplicate header names
/// or base64 values, so this is a direct, lossless conversion.
#[must_use]
pub fn headers_from_map(map: &HashMap<String, String>) -> Vec<Header> {
    map.iter()
        .map(|(name, value)| Header {
            name: name.clone(),
            value: BytesValue::String {
                value: value.clone(),
            },
        })
        .collect()
}

/// `computeHeadersSize` applied to typed BiDi headers (spec §4.3).
#[must_use]
pub fn headers_size(headers: &[Header]) -> i64 {
    headers
        .iter()
        .map(|h| {
            let value = h.value.to_cdp_string();
            (h.name.len() + 2 + value.len() + 2) as i64
        })
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bidi_to_cdp_to_bidi_roundtrips_string_headers() {
        let original = Header {
            name: "X-Test".into(),
            value: BytesValue::String {
                value: "value".into(),
            },
        };
        let cdp = to_cdp(&original);
        let back = from_cdp(&cdp);
        assert_eq!(back, original);
    }

    #[test]
    fn base64_header_converts_to_cdp_string_form() {
        use base64::Engine;
        let encoded = base64::engine::general_purpose::STANDARD.encode(b"hi");
        let header = Header {
            name: "X-Bin".into(),
            value: BytesValue::Base64 { value: encoded },
        };
        let cdp = to_cdp(&header);
        assert_eq!(cdp.value, "hi");
    }

    #[test]
    fn headers_from_map_converts_every_entry() {
        let mut map = HashMap::new();
        map.insert("X-Test".to_string(), "value".to_string());
        let headers = headers_from_map(&map);
        assert_eq!(headers.len(), 1);
        assert_eq!(headers[0].name, "X-Test");
        assert_eq!(headers[0].value.to_cdp_string(), "value");
    }

    #[test]
    fn headers_size_matches_formula() {
        let headers = vec![Header {
            name: "A".into(),
            value: BytesValue::String { value: "B".into() },
        }];
        assert_eq!(headers_size(&headers), 6);
    }
}
