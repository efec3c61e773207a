//! `InterceptStore` and intercept matching (spec §4.3 "Intercept matching").

use std::collections::HashMap;

use bidi_types::network::{InterceptPhase, UrlPattern};

use crate::error::MapperError;
use crate::network::url_pattern;

/// A registered interception filter.
pub struct Intercept {
    pub id: String,
    pub phases: Vec<InterceptPhase>,
    pub url_patterns: Vec<UrlPattern>,
    pub contexts: Option<Vec<String>>,
}

/// Tracks every live intercept, keyed by minted id.
#[derive(Default)]
pub struct InterceptStore {
    intercepts: HashMap<String, Intercept>,
}

impl InterceptStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, intercept: Intercept) {
        self.intercepts.insert(intercept.id.clone(), intercept);
    }

    /// # Errors
    ///
    /// Returns `ErrorCode::NoSuchIntercept` if `id` is unknown.
    pub fn remove(&mut self, id: &str) -> Result<(), MapperError> {
        self.intercepts
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| MapperError::no_such_intercept(id))
    }

    /// Every intercept matching `phase`/`url`/`context` (spec §4.3:
    /// "(a) one of its phases equals the current phase; (b) one of its
    /// URL patterns matches; (c) the request's context is in the
    /// intercept's contexts filter (or filter is absent)").
    #[must_use]
    pub fn matching(&self, phase: InterceptPhase, url: &str, context: &str) -> Vec<String> {
        self.intercepts
            .values()
            .filter(|intercept| {
                intercept.phases.contains(&phase)
                    && intercept
                        .url_patterns
                        .iter()
                        .any(|pattern| url_pattern::matches(pattern, url))
                    && intercept
                        .contexts
                        .as_ref()
                        .is_none_or(|contexts| contexts.iter().any(|c| c == context))
            })
            .map(|intercept| intercept.id.clone())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn string_pattern(url: &str) -> UrlPattern {
        UrlPattern::String {
            pattern: url.to_string(),
        }
    }

    #[test]
    fn matches_only_declared_phase_and_pattern() {
        let mut store = InterceptStore::new();
        store.add(Intercept {
            id: "i1".into(),
            phases: vec![InterceptPhase::BeforeRequestSent],
            url_patterns: vec![string_pattern("https://a.test/")],
            contexts: None,
        });

        assert_eq!(
            store.matching(InterceptPhase::BeforeRequestSent, "https://a.test/", "ctx1"),
            vec!["i1".to_string()]
        );
        assert!(store
            .matching(InterceptPhase::ResponseStarted, "https://a.test/", "ctx1")
            .is_empty());
        assert!(store
            .matching(InterceptPhase::BeforeRequestSent, "https://b.test/", "ctx1")
            .is_empty());
    }

    #[test]
    fn context_filter_restricts_matches() {
        let mut store = InterceptStore::new();
        store.add(Intercept {
            id: "i1".into(),
            phases: vec![InterceptPhase::BeforeRequestSent],
            url_patterns: vec![string_pattern("https://a.test/")],
            contexts: Some(vec!["ctx1".to_string()]),
        });

        assert!(store
            .matching(InterceptPhase::BeforeRequestSent, "https://a.test/", "ctx2")
            .is_empty());
        assert_eq!(
            store.matching(InterceptPhase::BeforeRequestSent, "https://a.test/", "ctx1"),
            vec!["i1".to_string()]
        );
    }
}
