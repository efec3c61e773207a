//! URL-pattern matching (spec §4.3 "URL-pattern matching" — normative and
//! testable as specified in S2).

use bidi_types::network::UrlPattern;
use url::Url;

/// Returns whether `pattern` matches `request_url`.
#[must_use]
pub fn matches(pattern: &UrlPattern, request_url: &str) -> bool {
    let Ok(target) = Url::parse(request_url) else {
        return false;
    };
    match pattern {
        UrlPattern::String { pattern } => matches_string_pattern(pattern, &target),
        UrlPattern::Pattern {
            protocol,
            hostname,
            port,
            pathname,
            search,
        } => matches_structured_pattern(
            protocol.as_deref(),
            hostname.as_deref(),
            port.as_deref(),
            pathname.as_deref(),
            search.as_deref(),
            &target,
        ),
    }
}

/// A string pattern is compared against the request URL after both are
/// parsed and reserialized, so trivial textual differences that don't
/// change the URL's meaning (e.g. default-port spelling) don't break the
/// match.
fn matches_string_pattern(pattern: &str, target: &Url) -> bool {
    let Ok(pattern_url) = Url::parse(pattern) else {
        return pattern == target.as_str();
    };
    reserialize(&pattern_url) == reserialize(target)
}

fn reserialize(url: &Url) -> String {
    let mut out = String::new();
    out.push_str(url.scheme());
    out.push_str("://");
    if let Some(host) = url.host_str() {
        out.push_str(&host.to_ascii_lowercase());
    }
    if let Some(port) = url.port() {
        out.push(':');
        out.push_str(&port.to_string());
    }
    out.push_str(url.path());
    if let Some(query) = url.query() {
        out.push('?');
        out.push_str(query);
    }
    out
}

#[allow(clippy::too_many_arguments)]
fn matches_structured_pattern(
    protocol: Option<&str>,
    hostname: Option<&str>,
    port: Option<&str>,
    pathname: Option<&str>,
    search: Option<&str>,
    target: &Url,
) -> bool {
    if let Some(protocol) = protocol {
        if protocol != target.scheme() {
            return false;
        }
    }
    if let Some(hostname) = hostname {
        let host = target.host_str().unwrap_or_default();
        if !hostname.eq_ignore_ascii_case(host) {
            return false;
        }
    }
    if let Some(port) = port {
        let actual = target.port_or_known_default().map(|p| p.to_string());
        if actual.as_deref() != Some(port) {
            return false;
        }
    }

    // `pathname` defaulting: absent field still requires the URL's path to
    // be "/" or empty.
    let path_matches = match pathname {
        Some(p) => p == target.path(),
        None => target.path() == "/" || target.path().is_empty(),
    };
    if !path_matches {
        return false;
    }

    // `search` is compared with a leading "?" stripped from both sides;
    // absent field only matches an empty query.
    let search_matches = match search {
        Some(s) => {
            let stripped = s.strip_prefix('?').unwrap_or(s);
            let actual = target.query().unwrap_or("");
            stripped == actual
        }
        None => target.query().is_none() || target.query() == Some(""),
    };
    search_matches
}

#[cfg(test)]
mod tests {
    use super::*;

    fn string_pattern(s: &str) -> UrlPattern {
        UrlPattern::String {
            pattern: s.to_string(),
        }
    }

    #[test]
    fn string_pattern_matches_exact_url_with_query() {
        let pattern = string_pattern("https://example.test/test?query");
        assert!(matches(&pattern, "https://example.test/test?query"));
        assert!(!matches(&pattern, "https://example2.test/test?query"));
    }

    #[test]
    fn empty_structured_pattern_with_search_wildcard_requires_default_path_and_query() {
        let pattern = UrlPattern::Pattern {
            protocol: None,
            hostname: None,
            port: None,
            pathname: None,
            search: Some(String::new()),
        };
        // search:"" matches only an empty query — a URL with a non-empty
        // query string does not match even though all other fields are
        // wildcards.
        assert!(!matches(&pattern, "https://web-platform.test/?search"));
    }

    #[test]
    fn hostname_comparison_is_case_insensitive() {
        let pattern = UrlPattern::Pattern {
            protocol: None,
            hostname: Some("WEB-PLATFORM.TEST".to_string()),
            port: None,
            pathname: None,
            search: None,
        };
        assert!(matches(&pattern, "https://web-platform.test/"));
    }

    #[test]
    fn pathname_default_requires_root_or_empty_path() {
        let pattern = UrlPattern::Pattern {
            protocol: None,
            hostname: Some("a.test".to_string()),
            port: None,
            pathname: None,
            search: None,
        };
        assert!(matches(&pattern, "https://a.test/"));
        assert!(!matches(&pattern, "https://a.test/sub"));
    }

    #[test]
    fn search_stripped_of_leading_question_mark_both_sides() {
        let pattern = UrlPattern::Pattern {
            protocol: None,
            hostname: Some("a.test".to_string()),
            port: None,
            pathname: Some("/".to_string()),
            search: Some("?q=1".to_string()),
        };
        assert!(matches(&pattern, "https://a.test/?q=1"));
    }
}
