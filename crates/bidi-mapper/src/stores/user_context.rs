//! `UserContextStore` (spec §3 `UserContext`).

use std::collections::HashSet;

use crate::error::MapperError;

/// The default user context id, which can never be destroyed (spec §3).
pub const DEFAULT_USER_CONTEXT: &str = "default";

/// Tracks every live user context id.
pub struct UserContextStore {
    contexts: HashSet<String>,
}

impl Default for UserContextStore {
    fn default() -> Self {
        let mut contexts = HashSet::new();
        contexts.insert(DEFAULT_USER_CONTEXT.to_string());
        Self { contexts }
    }
}

impl UserContextStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create(&mut self, id: String) {
        self.contexts.insert(id);
    }

    /// Destroys `id`. The caller is responsible for closing all of its
    /// browsing contexts first (spec §3 lifecycle).
    ///
    /// # Errors
    ///
    /// Returns `ErrorCode::InvalidArgument` if `id` is `"default"`
    /// (indestructible), or `ErrorCode::NoSuchUserContext` if unknown.
    pub fn destroy(&mut self, id: &str) -> Result<(), MapperError> {
        if id == DEFAULT_USER_CONTEXT {
            return Err(MapperError::invalid_argument(
                "the default user context cannot be removed",
            ));
        }
        if self.contexts.remove(id) {
            Ok(())
        } else {
            Err(MapperError::no_such_user_context(id))
        }
    }

    #[must_use]
    pub fn exists(&self, id: &str) -> bool {
        self.contexts.contains(id)
    }

    #[must_use]
    pub fn all(&self) -> Vec<String> {
        self.contexts.iter().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_user_context_cannot_be_destroyed() {
        let mut store = UserContextStore::new();
        assert!(store.destroy(DEFAULT_USER_CONTEXT).is_err());
    }

    #[test]
    fn unknown_user_context_destroy_fails() {
        let mut store = UserContextStore::new();
        assert!(store.destroy("missing").is_err());
    }

    #[test]
    fn created_user_context_can_be_destroyed() {
        let mut store = UserContextStore::new();
        store.create("uc1".into());
        assert!(store.exists("uc1"));
        store.destroy("uc1").unwrap();
        assert!(!store.exists("uc1"));
    }
}
