//! `RealmStore` (spec §4.5, §3 `Realm`).

use std::collections::HashMap;

use crate::error::MapperError;

/// A JavaScript execution environment: the default realm of a context, or
/// a sandbox/worker/worklet realm.
#[derive(Debug, Clone)]
pub struct Realm {
    pub id: String,
    pub context: Option<String>,
    pub origin: String,
    pub realm_type: String,
    pub sandbox: Option<String>,
    /// The CDP `Runtime.executionContextId` this realm corresponds to, so
    /// `script.evaluate`/`callFunction` can target it precisely instead of
    /// falling back to a context's default execution context.
    pub execution_context_id: Option<i64>,
    /// Handles minted by `script.evaluate`/`callFunction` in this realm,
    /// valid until the realm is destroyed or `script.disown` releases them.
    pub handles: Vec<String>,
}

/// Tracks every live realm, keyed by realm id.
#[derive(Debug, Default)]
pub struct RealmStore {
    realms: HashMap<String, Realm>,
}

impl RealmStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create(&mut self, realm: Realm) {
        self.realms.insert(realm.id.clone(), realm);
    }

    /// # Errors
    ///
    /// Returns `ErrorCode::UnknownError` if `id` is unknown — realms have
    /// no dedicated BiDi error code, unlike contexts/scripts/intercepts.
    pub fn get(&self, id: &str) -> Result<&Realm, MapperError> {
        self.realms
            .get(id)
            .ok_or_else(|| MapperError::unknown_error(format!("no such realm: {id}")))
    }

    /// Destroys a realm, invalidating every handle it owned.
    pub fn destroy(&mut self, id: &str) -> Option<Realm> {
        self.realms.remove(id)
    }

    /// Every realm belonging to `context` (its default realm plus any
    /// sandbox realms).
    #[must_use]
    pub fn realms_for_context(&self, context: &str) -> Vec<&Realm> {
        self.realms
            .values()
            .filter(|r| r.context.as_deref() == Some(context))
            .collect()
    }

    /// The realm matching `context` and `sandbox` (`None` selects the
    /// context's default, non-sandboxed realm).
    ///
    /// # Errors
    ///
    /// Returns `ErrorCode::UnknownError` if no matching realm exists.
    pub fn realm_for_target(
        &self,
        context: &str,
        sandbox: Option<&str>,
    ) -> Result<&Realm, MapperError> {
        self.realms
            .values()
            .find(|r| r.context.as_deref() == Some(context) && r.sandbox.as_deref() == sandbox)
            .ok_or_else(|| MapperError::unknown_error(format!("no realm for context: {context}")))
    }

    /// The realm backing a CDP `Runtime.executionContextId`, for resolving
    /// `Runtime` domain events (`consoleAPICalled`, `exceptionThrown`,
    /// `executionContextDestroyed`) back to their BiDi realm.
    #[must_use]
    pub fn find_by_execution_context(&self, execution_context_id: i64) -> Option<&Realm> {
        self.realms
            .values()
            .find(|r| r.execution_context_id == Some(execution_context_id))
    }

    /// Removes every realm belonging to `context`, e.g. when the context
    /// is destroyed.
    pub fn destroy_for_context(&mut self, context: &str) -> Vec<Realm> {
        let ids: Vec<String> = self
            .realms
            .values()
            .filter(|r| r.context.as_deref() == Some(context))
            .map(|r| r.id.clone())
            .collect();
        ids.into_iter().filter_map(|id| self.realms.remove(&id)).collect()
    }

    /// Records a newly minted handle against its owning realm so it can be
    /// invalidated when the realm is destroyed.
    ///
    /// # Errors
    ///
    /// Returns `ErrorCode::UnknownError` if `realm` is unknown.
    pub fn register_handle(&mut self, realm: &str, handle: String) -> Result<(), MapperError> {
        self.realms
            .get_mut(realm)
            .ok_or_else(|| MapperError::unknown_error(format!("no such realm: {realm}")))?
            .handles
            .push(handle);
        Ok(())
    }

    /// Releases `handles` from `realm` (`script.disown`).
    ///
    /// # Errors
    ///
    /// Returns `ErrorCode::UnknownError` if `realm` is unknown.
    pub fn disown(&mut self, realm: &str, handles: &[String]) -> Result<(), MapperError> {
        let r = self
            .realms
            .get_mut(realm)
            .ok_or_else(|| MapperError::unknown_error(format!("no such realm: {realm}")))?;
        r.handles.retain(|h| !handles.contains(h));
        Ok(())
    }

    /// Whether `handle` is currently valid in `realm`.
    #[must_use]
    pub fn is_handle_valid(&self, realm: &str, handle: &str) -> bool {
        self.realms
            .get(realm)
            .is_some_and(|r| r.handles.iter().any(|h| h == handle))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn realm(id: &str, context: &str) -> Realm {
        Realm {
            id: id.to_string(),
            context: Some(context.to_string()),
            origin: "https://example.test".into(),
            realm_type: "window".into(),
            sandbox: None,
            execution_context_id: None,
            handles: Vec::new(),
        }
    }

    #[test]
    fn destroy_for_context_removes_only_matching_realms() {
        let mut store = RealmStore::new();
        store.create(realm("r1", "ctx1"));
        store.create(realm("r2", "ctx2"));
        let destroyed = store.destroy_for_context("ctx1");
        assert_eq!(destroyed.len(), 1);
        assert!(store.get("r2").is_ok());
        assert!(store.get("r1").is_err());
    }

    #[test]
    fn handle_invalid_after_realm_destroyed() {
        let mut store = RealmStore::new();
        store.create(realm("r1", "ctx1"));
        store.register_handle("r1", "h1".into()).unwrap();
        assert!(store.is_handle_valid("r1", "h1"));
        store.destroy("r1");
        assert!(!store.is_handle_valid("r1", "h1"));
    }

    #[test]
    fn find_by_execution_context_matches_registered_realm() {
        let mut store = RealmStore::new();
        let mut r = realm("r1", "ctx1");
        r.execution_context_id = Some(7);
        store.create(r);
        assert_eq!(store.find_by_execution_context(7).unwrap().id, "r1");
        assert!(store.find_by_execution_context(8).is_none());
    }

    #[test]
    fn disown_invalidates_handle_without_destroying_realm() {
        let mut store = RealmStore::new();
        store.create(realm("r1", "ctx1"));
        store.register_handle("r1", "h1".into()).unwrap();
        store.disown("r1", &["h1".to_string()]).unwrap();
        assert!(!store.is_handle_valid("r1", "h1"));
        assert!(store.get("r1").is_ok());
    }
}
