//! `BrowsingContextStore` and the per-context navigation state machine
//! (spec §4.2) — one of the mapper's four hardest subsystems.

use std::collections::HashMap;

use uuid::Uuid;

use crate::error::MapperError;

/// A navigation's place in the per-context state machine.
///
/// ```text
/// idle ──willSend──► pending ──responseReceived──► committing ──loadEventFired──► committed
///   ▲                   │                              │
///   │                   ├── failed ──────────────► aborted
///   │                   └── canceled (new nav replaces)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationState {
    Pending,
    Committing,
    Committed,
    Aborted,
    Failed,
}

/// A single navigation attempt.
#[derive(Debug, Clone)]
pub struct Navigation {
    pub id: String,
    pub url: String,
    pub state: NavigationState,
}

/// A single node in the browsing-context tree.
#[derive(Debug, Clone)]
pub struct BrowsingContext {
    pub id: String,
    pub parent: Option<String>,
    pub children: Vec<String>,
    pub url: String,
    pub user_context: String,
    /// The navigation currently in flight, if any. At most one `pending`
    /// navigation exists per context at a time (spec §3 invariant).
    pub pending_navigation: Option<Navigation>,
    /// The most recently committed navigation, once the pending one above
    /// resolves (spec §4.2: "committed becomes previous on next commit").
    pub committed_navigation: Option<Navigation>,
}

impl BrowsingContext {
    fn new(id: String, parent: Option<String>, user_context: String) -> Self {
        Self {
            id,
            parent,
            children: Vec::new(),
            url: "about:blank".to_string(),
            user_context,
            pending_navigation: None,
            committed_navigation: None,
        }
    }
}

/// A `browsingContext.navigationAborted` should be emitted for the
/// superseded navigation before the new one's `willSend` fires (spec
/// §4.2). Returned by [`BrowsingContextStore::navigate`] so the caller
/// (the `browsingContext` module / event router) can emit events in the
/// right order without the store reaching into the router itself.
pub struct NavigateOutcome {
    pub navigation_id: String,
    pub superseded: Option<String>,
}

/// The authoritative tree of browsing contexts (spec §4.2).
#[derive(Debug, Default)]
pub struct BrowsingContextStore {
    contexts: HashMap<String, BrowsingContext>,
}

impl BrowsingContextStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Looks up a context by id.
    ///
    /// # Errors
    ///
    /// Returns `ErrorCode::NoSuchFrame` if `id` is unknown.
    pub fn get(&self, id: &str) -> Result<&BrowsingContext, MapperError> {
        self.contexts.get(id).ok_or_else(|| MapperError::no_such_frame(id))
    }

    fn get_mut(&mut self, id: &str) -> Result<&mut BrowsingContext, MapperError> {
        self.contexts
            .get_mut(id)
            .ok_or_else(|| MapperError::no_such_frame(id))
    }

    /// The top-level ancestor of `id`: itself if it has no parent.
    ///
    /// # Errors
    ///
    /// Returns `ErrorCode::NoSuchFrame` if `id` is unknown.
    pub fn find_top_level(&self, id: &str) -> Result<String, MapperError> {
        let mut current = self.get(id)?;
        while let Some(parent_id) = &current.parent {
            current = self.get(parent_id)?;
        }
        Ok(current.id.clone())
    }

    /// Direct children of `id`.
    ///
    /// # Errors
    ///
    /// Returns `ErrorCode::NoSuchFrame` if `id` is unknown.
    pub fn children(&self, id: &str) -> Result<Vec<String>, MapperError> {
        Ok(self.get(id)?.children.clone())
    }

    /// All top-level contexts (those with no parent), in insertion order.
    #[must_use]
    pub fn top_level_contexts(&self) -> Vec<String> {
        self.contexts
            .values()
            .filter(|c| c.parent.is_none())
            .map(|c| c.id.clone())
            .collect()
    }

    /// Creates a new context.
    ///
    /// # Errors
    ///
    /// Returns `ErrorCode::NoSuchFrame` if `parent` is supplied but unknown
    /// (spec §4.2: "Creating a context whose parent is unknown fails").
    pub fn create(
        &mut self,
        id: String,
        parent: Option<&str>,
        user_context: &str,
    ) -> Result<(), MapperError> {
        if let Some(parent_id) = parent {
            self.get_mut(parent_id)?.children.push(id.clone());
        }
        self.contexts.insert(
            id.clone(),
            BrowsingContext::new(id, parent.map(str::to_string), user_context.to_string()),
        );
        Ok(())
    }

    /// Destroys `id` and, if `cascade`, every descendant, returning the
    /// destroyed ids in strict post-order (children before parents) so the
    /// caller can emit `browsingContext.contextDestroyed` in that order
    /// (spec §4.2, testable property #7).
    ///
    /// # Errors
    ///
    /// Returns `ErrorCode::NoSuchFrame` if `id` is unknown.
    pub fn destroy(&mut self, id: &str, cascade: bool) -> Result<Vec<String>, MapperError> {
        self.get(id)?;
        let mut order = Vec::new();
        self.destroy_post_order(id, cascade, &mut order);

        if let Some(destroyed) = self.contexts.get(id) {
            if let Some(parent_id) = destroyed.parent.clone() {
                if let Some(parent) = self.contexts.get_mut(&parent_id) {
                    parent.children.retain(|c| c != id);
                }
            }
        }
        for destroyed_id in &order {
            self.contexts.remove(destroyed_id);
        }
        Ok(order)
    }

    fn destroy_post_order(&self, id: &str, cascade: bool, order: &mut Vec<String>) {
        let Some(ctx) = self.contexts.get(id) else {
            return;
        };
        if cascade {
            for child in ctx.children.clone() {
                self.destroy_post_order(&child, cascade, order);
            }
        }
        order.push(id.to_string());
    }

    /// Starts a new navigation on `context`. If a `pending` navigation is
    /// already in flight it is superseded: the caller must emit
    /// `navigation.navigationAborted` for `superseded` before emitting
    /// `willSend`/`navigationStarted` for the new id (spec §4.2).
    ///
    /// # Errors
    ///
    /// Returns `ErrorCode::NoSuchFrame` if `context` is unknown.
    pub fn navigate(&mut self, context: &str, url: &str) -> Result<NavigateOutcome, MapperError> {
        let ctx = self.get_mut(context)?;
        let superseded = ctx
            .pending_navigation
            .take()
            .filter(|nav| nav.state == NavigationState::Pending)
            .map(|nav| nav.id);

        let navigation_id = Uuid::new_v4().to_string();
        ctx.pending_navigation = Some(Navigation {
            id: navigation_id.clone(),
            url: url.to_string(),
            state: NavigationState::Pending,
        });
        Ok(NavigateOutcome {
            navigation_id,
            superseded,
        })
    }

    /// `responseReceived`: transitions the context's pending navigation
    /// `pending → committing`.
    ///
    /// # Errors
    ///
    /// Returns `ErrorCode::NoSuchFrame` if `context` is unknown, or
    /// `ErrorCode::UnknownError` if there is no pending navigation matching
    /// `navigation_id`.
    pub fn response_received(
        &mut self,
        context: &str,
        navigation_id: &str,
    ) -> Result<(), MapperError> {
        let ctx = self.get_mut(context)?;
        match &mut ctx.pending_navigation {
            Some(nav) if nav.id == navigation_id => {
                nav.state = NavigationState::Committing;
                Ok(())
            }
            _ => Err(MapperError::unknown_error(format!(
                "no pending navigation {navigation_id} on {context}"
            ))),
        }
    }

    /// `loadEventFired`: transitions `committing → committed`, moving the
    /// now-committed navigation out of `pending_navigation`.
    ///
    /// # Errors
    ///
    /// Returns `ErrorCode::NoSuchFrame` if `context` is unknown, or
    /// `ErrorCode::UnknownError` if there is no matching navigation.
    pub fn load_event_fired(
        &mut self,
        context: &str,
        navigation_id: &str,
        url: &str,
    ) -> Result<(), MapperError> {
        let ctx = self.get_mut(context)?;
        match &ctx.pending_navigation {
            Some(nav) if nav.id == navigation_id => {
                let mut committed = ctx.pending_navigation.take().unwrap();
                committed.state = NavigationState::Committed;
                ctx.committed_navigation = Some(committed);
                ctx.url = url.to_string();
                Ok(())
            }
            _ => Err(MapperError::unknown_error(format!(
                "no pending navigation {navigation_id} on {context}"
            ))),
        }
    }

    /// Marks the context's pending navigation as `failed`/`aborted`,
    /// clearing it from `pending_navigation`.
    ///
    /// # Errors
    ///
    /// Returns `ErrorCode::NoSuchFrame` if `context` is unknown.
    pub fn fail_navigation(
        &mut self,
        context: &str,
        navigation_id: &str,
        aborted: bool,
    ) -> Result<(), MapperError> {
        let ctx = self.get_mut(context)?;
        if matches!(&ctx.pending_navigation, Some(nav) if nav.id == navigation_id) {
            let mut nav = ctx.pending_navigation.take().unwrap();
            nav.state = if aborted {
                NavigationState::Aborted
            } else {
                NavigationState::Failed
            };
        }
        Ok(())
    }

    /// Sets a context's URL directly (used for non-navigation URL updates,
    /// e.g. same-document navigation).
    ///
    /// # Errors
    ///
    /// Returns `ErrorCode::NoSuchFrame` if `context` is unknown.
    pub fn set_url(&mut self, context: &str, url: &str) -> Result<(), MapperError> {
        self.get_mut(context)?.url = url.to_string();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_with_root() -> BrowsingContextStore {
        let mut store = BrowsingContextStore::new();
        store.create("root".into(), None, "default").unwrap();
        store
    }

    #[test]
    fn create_with_unknown_parent_fails() {
        let mut store = BrowsingContextStore::new();
        let err = store.create("child".into(), Some("missing"), "default");
        assert!(err.is_err());
    }

    #[test]
    fn find_top_level_walks_to_root() {
        let mut store = store_with_root();
        store.create("child".into(), Some("root"), "default").unwrap();
        store.create("grandchild".into(), Some("child"), "default").unwrap();
        assert_eq!(store.find_top_level("grandchild").unwrap(), "root");
    }

    #[test]
    fn cascading_destroy_emits_post_order() {
        // top -> F1 -> F1a, top -> F2 (spec §8 S6)
        let mut store = store_with_root();
        store.create("F1".into(), Some("root"), "default").unwrap();
        store.create("F2".into(), Some("root"), "default").unwrap();
        store.create("F1a".into(), Some("F1"), "default").unwrap();

        let order = store.destroy("root", true).unwrap();
        assert_eq!(order, vec!["F1a", "F1", "F2", "root"]);
    }

    #[test]
    fn destroy_removes_from_parent_children() {
        let mut store = store_with_root();
        store.create("child".into(), Some("root"), "default").unwrap();
        store.destroy("child", true).unwrap();
        assert!(store.children("root").unwrap().is_empty());
    }

    #[test]
    fn navigate_supersedes_prior_pending_navigation() {
        let mut store = store_with_root();
        let first = store.navigate("root", "https://a.test/").unwrap();
        assert!(first.superseded.is_none());

        let second = store.navigate("root", "https://b.test/").unwrap();
        assert_eq!(second.superseded, Some(first.navigation_id));
    }

    #[test]
    fn navigation_state_machine_progresses_to_committed() {
        let mut store = store_with_root();
        let outcome = store.navigate("root", "https://a.test/").unwrap();
        store
            .response_received("root", &outcome.navigation_id)
            .unwrap();
        store
            .load_event_fired("root", &outcome.navigation_id, "https://a.test/")
            .unwrap();

        let ctx = store.get("root").unwrap();
        assert!(ctx.pending_navigation.is_none());
        assert_eq!(ctx.committed_navigation.as_ref().unwrap().id, outcome.navigation_id);
        assert_eq!(ctx.url, "https://a.test/");
    }
}
