//! The `SubscriptionManager` (spec §4.4).
//!
//! Per `(channel, context, event)` it holds an integer priority, minted
//! from a single process-wide monotonic counter so a later subscription
//! compares higher than an earlier one. `context = None` represents a
//! session-wide subscription; a context key is always normalized to its
//! top-level ancestor before being stored.

use std::collections::HashMap;

use crate::error::MapperError;

/// Expands a BiDi event-or-group name into its constituent atomic events.
/// Group events (e.g. `"browsingContext"`) are module names that stand for
/// every event the module defines; an already-atomic name (containing a
/// `.`) expands to itself.
#[must_use]
pub fn expand_event_group(event: &str) -> Vec<String> {
    if event.contains('.') {
        return vec![event.to_string()];
    }
    match event {
        "browsingContext" => BROWSING_CONTEXT_EVENTS
            .iter()
            .map(|e| (*e).to_string())
            .collect(),
        "network" => NETWORK_EVENTS.iter().map(|e| (*e).to_string()).collect(),
        "script" => SCRIPT_EVENTS.iter().map(|e| (*e).to_string()).collect(),
        "log" => LOG_EVENTS.iter().map(|e| (*e).to_string()).collect(),
        other => vec![other.to_string()],
    }
}

const BROWSING_CONTEXT_EVENTS: &[&str] = &[
    "browsingContext.contextCreated",
    "browsingContext.contextDestroyed",
    "browsingContext.navigationStarted",
    "browsingContext.navigationAborted",
    "browsingContext.navigationFailed",
    "browsingContext.domContentLoaded",
    "browsingContext.load",
    "browsingContext.userPromptOpened",
    "browsingContext.userPromptClosed",
];

const NETWORK_EVENTS: &[&str] = &[
    "network.beforeRequestSent",
    "network.responseStarted",
    "network.responseCompleted",
    "network.authRequired",
    "network.fetchError",
];

const SCRIPT_EVENTS: &[&str] = &[
    "script.realmCreated",
    "script.realmDestroyed",
    "script.message",
];

const LOG_EVENTS: &[&str] = &["log.entryAdded"];

/// Key a single subscription is stored under. `context` is the top-level
/// ancestor id, or `None` for a session-wide subscription.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct SubscriptionKey {
    channel: Option<String>,
    context: Option<String>,
    event: String,
}

/// Tracks every live subscription and the monotonic priority each was
/// minted with.
#[derive(Debug, Default)]
pub struct SubscriptionManager {
    priorities: HashMap<SubscriptionKey, u64>,
    next_priority: u64,
}

impl SubscriptionManager {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribes `channel` to `events` (expanding any group names) scoped
    /// to `context` (its top-level ancestor, or session-wide if `None`).
    /// An event/context pair already subscribed keeps its earlier
    /// priority — "do nothing" rather than re-minting (spec §4.4,
    /// testable property #1).
    pub fn subscribe(&mut self, events: &[String], context: Option<&str>, channel: Option<&str>) {
        for raw_event in events {
            for event in expand_event_group(raw_event) {
                let key = SubscriptionKey {
                    channel: channel.map(str::to_string),
                    context: context.map(str::to_string),
                    event,
                };
                self.priorities.entry(key).or_insert_with(|| {
                    let p = self.next_priority;
                    self.next_priority += 1;
                    p
                });
            }
        }
    }

    /// Validates then removes every `(event, context)` pair under
    /// `channel`, atomically: if any pair is missing a subscription, the
    /// whole call fails and nothing is removed (spec §4.4, testable
    /// property #2).
    ///
    /// # Errors
    ///
    /// Returns `ErrorCode::InvalidArgument` if any pair lacks a
    /// subscription.
    pub fn unsubscribe_all(
        &mut self,
        events: &[String],
        contexts: &[Option<String>],
        channel: Option<&str>,
    ) -> Result<(), MapperError> {
        let expanded: Vec<String> = events.iter().flat_map(|e| expand_event_group(e)).collect();
        let contexts: Vec<Option<String>> = if contexts.is_empty() {
            vec![None]
        } else {
            contexts.clone()
        };

        let mut keys_to_remove = Vec::new();
        for event in &expanded {
            for context in &contexts {
                let key = SubscriptionKey {
                    channel: channel.map(str::to_string),
                    context: context.clone(),
                    event: event.clone(),
                };
                if !self.priorities.contains_key(&key) {
                    return Err(MapperError::invalid_argument(format!(
                        "not subscribed to {event} on {context:?}"
                    )));
                }
                keys_to_remove.push(key);
            }
        }

        for key in keys_to_remove {
            self.priorities.remove(&key);
        }
        Ok(())
    }

    /// Returns every channel subscribed to `event` on `context` (its
    /// top-level ancestor) — either via a session-wide (`None`) or a
    /// context-scoped subscription — sorted ascending by priority
    /// (oldest subscription first; spec §4.4, testable property #3).
    #[must_use]
    pub fn channels_for(&self, event: &str, top_level_context: &str) -> Vec<Option<String>> {
        let mut matches: Vec<(u64, Option<String>)> = self
            .priorities
            .iter()
            .filter(|(key, _)| {
                key.event == event
                    && (key.context.is_none()
                        || key.context.as_deref() == Some(top_level_context))
            })
            .map(|(key, priority)| (*priority, key.channel.clone()))
            .collect();
        matches.sort_by_key(|(priority, _)| *priority);
        matches.into_iter().map(|(_, channel)| channel).collect()
    }

    /// Number of live `(channel, context, event)` subscriptions. Exposed
    /// for tests and diagnostics.
    #[must_use]
    pub fn len(&self) -> usize {
        self.priorities.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.priorities.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn events(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| (*n).to_string()).collect()
    }

    #[test]
    fn duplicate_subscribe_preserves_earlier_priority() {
        let mut mgr = SubscriptionManager::new();
        mgr.subscribe(&events(&["browsingContext.load"]), Some("ctx1"), Some("ch"));
        let before = mgr.len();
        mgr.subscribe(&events(&["browsingContext.load"]), Some("ctx1"), Some("ch"));
        assert_eq!(mgr.len(), before);
    }

    #[test]
    fn duplicate_subscribe_keeps_original_ordering() {
        let mut mgr = SubscriptionManager::new();
        mgr.subscribe(&events(&["browsingContext.load"]), None, Some("first"));
        mgr.subscribe(&events(&["browsingContext.load"]), None, Some("second"));
        // Re-subscribing "first" must not bump it after "second".
        mgr.subscribe(&events(&["browsingContext.load"]), None, Some("first"));
        let channels = mgr.channels_for("browsingContext.load", "ctx1");
        assert_eq!(
            channels,
            vec![Some("first".to_string()), Some("second".to_string())]
        );
    }

    #[test]
    fn unsubscribe_all_is_atomic_on_partial_failure() {
        let mut mgr = SubscriptionManager::new();
        mgr.subscribe(&events(&["browsingContext.load"]), Some("ctx1"), Some("ch"));
        let before = mgr.len();

        let result = mgr.unsubscribe_all(
            &events(&["browsingContext.load", "network.fetchError"]),
            &[Some("ctx1".to_string())],
            Some("ch"),
        );

        assert!(result.is_err());
        assert_eq!(mgr.len(), before, "no subscription should have been removed");
    }

    #[test]
    fn unsubscribe_all_removes_every_pair_on_success() {
        let mut mgr = SubscriptionManager::new();
        mgr.subscribe(&events(&["browsingContext.load"]), Some("ctx1"), Some("ch"));
        mgr.subscribe(&events(&["network.fetchError"]), Some("ctx1"), Some("ch"));

        mgr.unsubscribe_all(
            &events(&["browsingContext.load", "network.fetchError"]),
            &[Some("ctx1".to_string())],
            Some("ch"),
        )
        .unwrap();

        assert!(mgr.is_empty());
    }

    #[test]
    fn channels_for_returns_session_wide_and_context_scoped_sorted_by_priority() {
        let mut mgr = SubscriptionManager::new();
        mgr.subscribe(&events(&["browsingContext.load"]), None, Some("global"));
        mgr.subscribe(
            &events(&["browsingContext.load"]),
            Some("ctx1"),
            Some("scoped"),
        );
        mgr.subscribe(
            &events(&["browsingContext.load"]),
            Some("other-ctx"),
            Some("irrelevant"),
        );

        let channels = mgr.channels_for("browsingContext.load", "ctx1");
        assert_eq!(
            channels,
            vec![Some("global".to_string()), Some("scoped".to_string())]
        );
    }

    #[test]
    fn group_event_expands_to_constituents() {
        let expanded = expand_event_group("browsingContext");
        assert!(expanded.contains(&"browsingContext.load".to_string()));
        assert!(expanded.contains(&"browsingContext.contextDestroyed".to_string()));
    }

    #[test]
    fn atomic_event_expands_to_itself() {
        assert_eq!(
            expand_event_group("network.fetchError"),
            vec!["network.fetchError".to_string()]
        );
    }
}
