//! `MapperEngine` — the object that owns every store, the CDP connection,
//! and the bookkeeping needed to drive navigation/intercept suspension
//! points (spec §2, §5).
//!
//! One engine per mapper process (spec §3 `Session`: "exactly one;
//! created at startup, destroyed at shutdown"). Store mutations happen
//! under short-lived `parking_lot` locks that are never held across an
//! `.await`, matching the teacher's `RwLock`-guarded registries.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use bidi_cdp::CdpConnection;
use bidi_types::browsing_context::ReadinessState;
use parking_lot::{Mutex, RwLock};
use tokio::sync::{mpsc, watch};
use uuid::Uuid;

use crate::config::MapperConfig;
use crate::error::MapperError;
use crate::stores::{
    BrowsingContextStore, InterceptStore, NetworkStore, PreloadScriptStore, RealmStore,
    UserContextStore,
};
use crate::subscription::SubscriptionManager;

/// A frame ready to leave the mapper, already tagged with its destination
/// channel. The concrete transport (out of scope, spec §1) demultiplexes
/// by `channel` onto the right client connection.
#[derive(Debug, Clone)]
pub enum MapperOutput {
    Success(bidi_types::SuccessFrame),
    Error(bidi_types::ErrorFrame),
    Event(bidi_types::EventFrame),
}

/// How far a navigation has progressed, for `waitForNavigation` callers
/// (spec §4.2 `wait` parameter). Distinct from [`crate::stores::context::NavigationState`]:
/// this tracks the BiDi-visible readiness milestones (`interactive`/
/// `complete`), not the internal commit state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Milestone {
    Started,
    Interactive,
    Complete,
    Failed,
}

impl Milestone {
    fn satisfies(self, wait: ReadinessState) -> bool {
        match wait {
            ReadinessState::None => self >= Milestone::Started,
            ReadinessState::Interactive => self >= Milestone::Interactive,
            ReadinessState::Complete => self >= Milestone::Complete,
        }
    }
}

/// Per-navigation milestone state. Backed by `watch` rather than `Notify`:
/// a `watch::Receiver` latches the most recently sent value, so a waiter
/// that subscribes *after* a milestone was reached still observes it —
/// unlike `Notify::notify_waiters()`, which wakes only tasks already
/// parked at the moment it's called and drops the signal otherwise.
#[derive(Default)]
struct NavigationTracker {
    channels: HashMap<String, watch::Sender<Milestone>>,
}

/// The mapper engine: process-wide stores, the CDP connection, and the
/// async bookkeeping for navigation-wait/intercept suspension points
/// (spec §5 "Suspension points").
pub struct MapperEngine {
    pub contexts: RwLock<BrowsingContextStore>,
    pub realms: RwLock<RealmStore>,
    pub network: RwLock<NetworkStore>,
    pub intercepts: RwLock<InterceptStore>,
    pub preload_scripts: RwLock<PreloadScriptStore>,
    pub user_contexts: RwLock<UserContextStore>,
    pub subscriptions: RwLock<SubscriptionManager>,
    pub cdp: CdpConnection,
    pub config: MapperConfig,

    /// CDP session id for each browsing context's target. One CDP target
    /// per browsing context, attached via `Target.setAutoAttach`.
    sessions: RwLock<HashMap<String, String>>,
    /// BiDi `userContext` id -> CDP `browserContextId`. `"default"` has no
    /// entry: CDP commands for it simply omit `browserContextId`.
    browser_contexts: RwLock<HashMap<String, String>>,
    navigation: Mutex<NavigationTracker>,
    outbound: mpsc::UnboundedSender<MapperOutput>,
}

impl MapperEngine {
    /// Builds a new engine and its outbound frame stream. The caller (the
    /// binary crate's transport glue) drains the returned receiver and
    /// forwards frames to the WebSocket connection(s) per `channel`.
    #[must_use]
    pub fn new(
        cdp: CdpConnection,
        config: MapperConfig,
    ) -> (Arc<Self>, mpsc::UnboundedReceiver<MapperOutput>) {
        let (outbound, rx) = mpsc::unbounded_channel();
        let engine = Arc::new(Self {
            contexts: RwLock::new(BrowsingContextStore::new()),
            realms: RwLock::new(RealmStore::new()),
            network: RwLock::new(NetworkStore::new()),
            intercepts: RwLock::new(InterceptStore::new()),
            preload_scripts: RwLock::new(PreloadScriptStore::new()),
            user_contexts: RwLock::new(UserContextStore::new()),
            subscriptions: RwLock::new(SubscriptionManager::new()),
            cdp,
            config,
            sessions: RwLock::new(HashMap::new()),
            browser_contexts: RwLock::new(HashMap::new()),
            navigation: Mutex::new(NavigationTracker::default()),
            outbound,
        });
        (engine, rx)
    }

    /// Mints an opaque identifier for a client-facing entity (`intercept`,
    /// `script`, `navigationId`) — spec §3: "minted `navigationId` (UUID)".
    #[must_use]
    pub fn mint_id(&self) -> String {
        Uuid::new_v4().to_string()
    }

    /// The CDP session id a context's target was attached under.
    ///
    /// # Errors
    ///
    /// Returns `ErrorCode::NoSuchFrame` if `context` has no known session
    /// (not yet attached, or already detached).
    pub fn session_for(&self, context: &str) -> Result<String, MapperError> {
        self.sessions
            .read()
            .get(context)
            .cloned()
            .ok_or_else(|| MapperError::no_such_frame(context))
    }

    pub fn register_session(&self, context: &str, session_id: &str) {
        self.sessions
            .write()
            .insert(context.to_string(), session_id.to_string());
    }

    pub fn forget_session(&self, context: &str) {
        self.sessions.write().remove(context);
    }

    /// The browsing context a CDP session id was attached under, if any.
    /// Used by the event processor to resolve a `Page`/`Network`/`Runtime`
    /// event's `sessionId` back to its owning context.
    #[must_use]
    pub fn context_for_session(&self, session_id: &str) -> Option<String> {
        self.sessions
            .read()
            .iter()
            .find(|(_, sid)| sid.as_str() == session_id)
            .map(|(context, _)| context.clone())
    }

    /// The CDP `browserContextId` backing a BiDi `userContext`, if any
    /// beyond the implicit default.
    #[must_use]
    pub fn cdp_browser_context(&self, user_context: &str) -> Option<String> {
        self.browser_contexts.read().get(user_context).cloned()
    }

    /// The BiDi `userContext` backed by a CDP `browserContextId`, if any.
    /// Used by the event processor to assign a popup's `userContext` when
    /// a new target attaches under a non-default browser context.
    #[must_use]
    pub fn user_context_for_cdp(&self, browser_context_id: &str) -> Option<String> {
        self.browser_contexts
            .read()
            .iter()
            .find(|(_, cdp_id)| cdp_id.as_str() == browser_context_id)
            .map(|(user_context, _)| user_context.clone())
    }

    pub fn register_browser_context(&self, user_context: &str, cdp_browser_context_id: &str) {
        self.browser_contexts
            .write()
            .insert(user_context.to_string(), cdp_browser_context_id.to_string());
    }

    pub fn forget_browser_context(&self, user_context: &str) -> Option<String> {
        self.browser_contexts.write().remove(user_context)
    }

    /// Records that `navigation_id` reached `milestone`, waking any
    /// `waitForNavigation` callers whose requested readiness is now
    /// satisfied.
    fn advance_milestone(&self, navigation_id: &str, milestone: Milestone) {
        let mut tracker = self.navigation.lock();
        let sender = tracker
            .channels
            .entry(navigation_id.to_string())
            .or_insert_with(|| watch::channel(Milestone::Started).0);
        sender.send_if_modified(|reached| {
            if milestone > *reached {
                *reached = milestone;
                true
            } else {
                false
            }
        });
    }

    pub fn mark_navigation_started(&self, navigation_id: &str) {
        self.advance_milestone(navigation_id, Milestone::Started);
    }

    pub fn mark_navigation_interactive(&self, navigation_id: &str) {
        self.advance_milestone(navigation_id, Milestone::Interactive);
    }

    pub fn mark_navigation_complete(&self, navigation_id: &str) {
        self.advance_milestone(navigation_id, Milestone::Complete);
    }

    pub fn mark_navigation_failed(&self, navigation_id: &str) {
        self.advance_milestone(navigation_id, Milestone::Failed);
    }

    /// Blocks until `navigation_id` reaches `wait`, or fails, or the
    /// configured idle timeout elapses (spec §5 "Cancellation and
    /// timeouts").
    ///
    /// # Errors
    ///
    /// Returns `ErrorCode::UnknownError` if the navigation fails before
    /// reaching `wait`, or if the idle timeout elapses first.
    pub async fn wait_for_navigation(
        &self,
        navigation_id: &str,
        wait: ReadinessState,
    ) -> Result<(), MapperError> {
        // Subscribing while holding the lock, before ever checking the
        // current milestone, means a `watch::Receiver` is already latched
        // onto the channel's current value by the time we look at it — an
        // `advance_milestone` racing with this call either lands before
        // `subscribe()` (and we see it in `borrow()`) or after (and
        // `changed()` observes it); there is no window where it's missed.
        let mut receiver = {
            let mut tracker = self.navigation.lock();
            tracker
                .channels
                .entry(navigation_id.to_string())
                .or_insert_with(|| watch::channel(Milestone::Started).0)
                .subscribe()
        };

        loop {
            let reached = *receiver.borrow_and_update();
            if reached == Milestone::Failed {
                return Err(MapperError::unknown_error(format!(
                    "navigation {navigation_id} failed before reaching the requested readiness"
                )));
            }
            if reached.satisfies(wait) {
                return Ok(());
            }

            let changed = match self.config.idle_timeout {
                Some(timeout) => tokio::time::timeout(timeout, receiver.changed())
                    .await
                    .map_err(|_| {
                        MapperError::unknown_error(format!(
                            "timed out waiting for navigation {navigation_id}"
                        ))
                    })?,
                None => receiver.changed().await,
            };
            changed.map_err(|_| {
                MapperError::unknown_error(format!(
                    "navigation {navigation_id} tracker was dropped while waiting"
                ))
            })?;
        }
    }

    /// Drops bookkeeping for a completed/aborted navigation so the
    /// tracker doesn't grow unbounded across a long session.
    pub fn forget_navigation(&self, navigation_id: &str) {
        let mut tracker = self.navigation.lock();
        tracker.channels.remove(navigation_id);
    }

    pub fn emit_success(&self, frame: bidi_types::SuccessFrame) {
        let _ = self.outbound.send(MapperOutput::Success(frame));
    }

    pub fn emit_error(&self, frame: bidi_types::ErrorFrame) {
        let _ = self.outbound.send(MapperOutput::Error(frame));
    }

    pub fn emit_event(&self, frame: bidi_types::EventFrame) {
        let _ = self.outbound.send(MapperOutput::Event(frame));
    }
}

/// Wall-clock milliseconds since the Unix epoch, for event `timestamp`
/// fields (spec §4.2/§4.3 event payloads).
#[must_use]
pub fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
