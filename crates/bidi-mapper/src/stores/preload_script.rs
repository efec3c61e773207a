//! `PreloadScriptStore` (spec §3 `PreloadScript`, §4.5 "Preload scripts").

use std::collections::HashMap;

use crate::error::MapperError;

/// A registered preload script, replayed into every newly created realm
/// matching its filter before any page script runs.
pub struct PreloadScript {
    pub id: String,
    pub function_declaration: String,
    pub sandbox: Option<String>,
    pub contexts: Option<Vec<String>>,
    pub user_contexts: Option<Vec<String>>,
}

impl PreloadScript {
    /// Whether this script applies to a realm created in `context` under
    /// `user_context`.
    #[must_use]
    pub fn applies_to(&self, context: &str, user_context: &str) -> bool {
        let context_ok = self
            .contexts
            .as_ref()
            .is_none_or(|ctxs| ctxs.iter().any(|c| c == context));
        let user_context_ok = self
            .user_contexts
            .as_ref()
            .is_none_or(|ucs| ucs.iter().any(|u| u == user_context));
        context_ok && user_context_ok
    }
}

/// Tracks every live preload script, keyed by minted id. `order` holds
/// ids in registration order; `scripts` isn't a `HashMap`-only store
/// because iterating it directly would replay scripts in an arbitrary
/// order, and `applicable` must replay them in the order they were
/// registered.
#[derive(Default)]
pub struct PreloadScriptStore {
    scripts: HashMap<String, PreloadScript>,
    order: Vec<String>,
}

impl PreloadScriptStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, script: PreloadScript) {
        self.order.push(script.id.clone());
        self.scripts.insert(script.id.clone(), script);
    }

    /// # Errors
    ///
    /// Returns `ErrorCode::NoSuchScript` if `id` is unknown.
    pub fn remove(&mut self, id: &str) -> Result<(), MapperError> {
        self.scripts
            .remove(id)
            .map(|_| {
                self.order.retain(|existing| existing != id);
            })
            .ok_or_else(|| MapperError::no_such_script(id))
    }

    /// Every script that should be replayed into a new realm created in
    /// `context` under `user_context`, in registration order.
    #[must_use]
    pub fn applicable(&self, context: &str, user_context: &str) -> Vec<&PreloadScript> {
        self.order
            .iter()
            .filter_map(|id| self.scripts.get(id))
            .filter(|s| s.applies_to(context, user_context))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn script_with_no_filters_applies_everywhere() {
        let script = PreloadScript {
            id: "s1".into(),
            function_declaration: "() => {}".into(),
            sandbox: None,
            contexts: None,
            user_contexts: None,
        };
        assert!(script.applies_to("ctx1", "default"));
        assert!(script.applies_to("ctx2", "other"));
    }

    #[test]
    fn script_scoped_to_context_excludes_others() {
        let script = PreloadScript {
            id: "s1".into(),
            function_declaration: "() => {}".into(),
            sandbox: None,
            contexts: Some(vec!["ctx1".to_string()]),
            user_contexts: None,
        };
        assert!(script.applies_to("ctx1", "default"));
        assert!(!script.applies_to("ctx2", "default"));
    }

    #[test]
    fn remove_unknown_script_fails() {
        let mut store = PreloadScriptStore::new();
        assert!(store.remove("missing").is_err());
    }

    #[test]
    fn applicable_replays_in_registration_order() {
        let mut store = PreloadScriptStore::new();
        for id in ["s3", "s1", "s2"] {
            store.add(PreloadScript {
                id: id.into(),
                function_declaration: "() => {}".into(),
                sandbox: None,
                contexts: None,
                user_contexts: None,
            });
        }
        let ids: Vec<&str> = store
            .applicable("ctx1", "default")
            .iter()
            .map(|s| s.id.as_str())
            .collect();
        assert_eq!(ids, vec!["s3", "s1", "s2"]);
    }

    #[test]
    fn removing_a_script_drops_it_from_the_order() {
        let mut store = PreloadScriptStore::new();
        for id in ["s1", "s2"] {
            store.add(PreloadScript {
                id: id.into(),
                function_declaration: "() => {}".into(),
                sandbox: None,
                contexts: None,
                user_contexts: None,
            });
        }
        store.remove("s1").unwrap();
        let ids: Vec<&str> = store
            .applicable("ctx1", "default")
            .iter()
            .map(|s| s.id.as_str())
            .collect();
        assert_eq!(ids, vec!["s2"]);
    }
}
