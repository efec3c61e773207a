//! `NetworkRequest` entity and phase state machine (spec §4.3) — one of
//! the mapper's four hardest subsystems.

use std::collections::HashMap;

use bidi_types::network::{Header, InterceptPhase, ResponseData};

use crate::error::MapperError;

/// A single in-flight (or just-finished) network request.
#[derive(Debug, Clone)]
pub struct NetworkRequest {
    pub id: String,
    pub context: String,
    pub url: String,
    pub method: String,
    pub headers: Vec<Header>,
    pub navigation: Option<String>,
    pub redirect_count: u32,
    pub phase: RequestPhase,
    /// Intercept ids currently blocking this request, if any. Cleared when
    /// the blocking call resolves.
    pub blocking_intercepts: Vec<String>,
    /// Whether the current blocking phase has already been resolved once;
    /// a second resolution attempt is `invalid argument` (spec §4.3
    /// "Double-resolution").
    pub resolved: bool,
    /// The CDP `Fetch` domain's request id for this request, if `Fetch` has
    /// paused it at least once. `Fetch` and `Network` request ids share a
    /// namespace but are not guaranteed equal — `Fetch.requestPaused`'s
    /// `networkId` is the only thing that correlates them, so every
    /// `Fetch.*` call must resolve through this field rather than using the
    /// BiDi-visible `id` (which is always the `Network` domain id).
    pub fetch_request_id: Option<String>,
    /// The most recent response snapshot, cached from `Network.responseReceived`
    /// or a `Fetch.requestPaused` response-stage event, so `Network.loadingFinished`
    /// can emit a complete `network.responseCompleted` without re-querying the browser.
    pub last_response: Option<ResponseData>,
}

/// The ordered phase a request is currently in (spec §4.3).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestPhase {
    BeforeRequestSent,
    ResponseStarted,
    AuthRequired,
    ResponseCompleted,
    FetchError,
}

impl RequestPhase {
    #[must_use]
    pub fn as_intercept_phase(self) -> Option<InterceptPhase> {
        match self {
            Self::BeforeRequestSent => Some(InterceptPhase::BeforeRequestSent),
            Self::ResponseStarted => Some(InterceptPhase::ResponseStarted),
            Self::AuthRequired => Some(InterceptPhase::AuthRequired),
            Self::ResponseCompleted | Self::FetchError => None,
        }
    }
}

/// Tracks every live network request, keyed by CDP `requestId`.
#[derive(Debug, Default)]
pub struct NetworkStore {
    requests: HashMap<String, NetworkRequest>,
}

impl NetworkStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create(&mut self, request: NetworkRequest) {
        self.requests.insert(request.id.clone(), request);
    }

    /// # Errors
    ///
    /// Returns `ErrorCode::NoSuchRequest` if `id` is unknown.
    pub fn get(&self, id: &str) -> Result<&NetworkRequest, MapperError> {
        self.requests
            .get(id)
            .ok_or_else(|| MapperError::no_such_request(id))
    }

    /// # Errors
    ///
    /// Returns `ErrorCode::NoSuchRequest` if `id` is unknown.
    pub fn get_mut(&mut self, id: &str) -> Result<&mut NetworkRequest, MapperError> {
        self.requests
            .get_mut(id)
            .ok_or_else(|| MapperError::no_such_request(id))
    }

    /// Advances `id` to `next`, clearing any stale blocking state — each
    /// new phase starts unresolved.
    ///
    /// # Errors
    ///
    /// Returns `ErrorCode::NoSuchRequest` if `id` is unknown.
    pub fn advance_phase(&mut self, id: &str, next: RequestPhase) -> Result<(), MapperError> {
        let req = self.get_mut(id)?;
        req.phase = next;
        req.resolved = false;
        req.blocking_intercepts.clear();
        Ok(())
    }

    /// Marks `id` as blocked on `intercepts` at its current phase. Fails
    /// if the request was already resolved this phase (double-resolution
    /// guard lives in `resolve`, not here — this only records the block).
    ///
    /// # Errors
    ///
    /// Returns `ErrorCode::NoSuchRequest` if `id` is unknown.
    pub fn block_on(&mut self, id: &str, intercepts: Vec<String>) -> Result<(), MapperError> {
        let req = self.get_mut(id)?;
        req.blocking_intercepts = intercepts;
        Ok(())
    }

    /// Resolves the current blocking phase for `id` (`continueRequest`,
    /// `continueResponse`, `provideResponse`, `continueWithAuth`,
    /// `failRequest`). A second resolution for the same phase fails with
    /// `invalid argument` (spec §4.3 "Double-resolution").
    ///
    /// # Errors
    ///
    /// Returns `ErrorCode::NoSuchRequest` if `id` is unknown, or
    /// `ErrorCode::InvalidArgument` if already resolved.
    pub fn resolve(&mut self, id: &str) -> Result<(), MapperError> {
        let req = self.get_mut(id)?;
        if req.resolved {
            return Err(MapperError::invalid_argument(format!(
                "request {id} already resolved at this phase"
            )));
        }
        req.resolved = true;
        req.blocking_intercepts.clear();
        Ok(())
    }

    pub fn destroy(&mut self, id: &str) -> Option<NetworkRequest> {
        self.requests.remove(id)
    }

    /// Finds the request whose `fetch_request_id` matches `fetch_id`, for
    /// correlating a `Fetch.authRequired` event (which carries no
    /// `networkId`) back to its `Network`-domain request.
    #[must_use]
    pub fn find_by_fetch_id(&self, fetch_id: &str) -> Option<&NetworkRequest> {
        self.requests
            .values()
            .find(|r| r.fetch_request_id.as_deref() == Some(fetch_id))
    }
}

/// `computeHeadersSize` (spec §4.3): Σ over headers of
/// `len(name) + len(": ") + len(value) + len("\r\n")`; empty list yields 0.
#[must_use]
pub fn compute_headers_size(headers: &[(&str, &str)]) -> i64 {
    headers
        .iter()
        .map(|(name, value)| (name.len() + 2 + value.len() + 2) as i64)
        .sum()
}

/// `getTiming` (spec §4.3): coerces any input to a non-negative finite
/// number — `undefined`/negative/NaN map to 0, otherwise `max(0, floor(x))`.
#[must_use]
pub fn get_timing(value: Option<f64>) -> f64 {
    match value {
        Some(v) if v.is_finite() && v >= 0.0 => v.floor(),
        _ => 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(id: &str) -> NetworkRequest {
        NetworkRequest {
            id: id.to_string(),
            context: "ctx1".into(),
            url: "https://a.test/".into(),
            method: "GET".into(),
            headers: Vec::new(),
            navigation: None,
            redirect_count: 0,
            phase: RequestPhase::BeforeRequestSent,
            blocking_intercepts: Vec::new(),
            resolved: false,
            fetch_request_id: None,
            last_response: None,
        }
    }

    #[test]
    fn compute_headers_size_empty_is_zero() {
        assert_eq!(compute_headers_size(&[]), 0);
    }

    #[test]
    fn compute_headers_size_sums_name_colon_space_value_crlf() {
        // len("A")+len(": ")+len("B")+len("\r\n") = 1+2+1+2 = 6.
        assert_eq!(compute_headers_size(&[("A", "B")]), 6);
    }

    #[test]
    fn get_timing_coerces_undefined_negative_nan_to_zero() {
        assert_eq!(get_timing(None), 0.0);
        assert_eq!(get_timing(Some(-5.0)), 0.0);
        assert_eq!(get_timing(Some(f64::NAN)), 0.0);
    }

    #[test]
    fn get_timing_floors_finite_positive_values() {
        assert_eq!(get_timing(Some(12.9)), 12.0);
    }

    #[test]
    fn double_resolution_of_same_phase_fails() {
        let mut store = NetworkStore::new();
        store.create(sample("r1"));
        store.resolve("r1").unwrap();
        let err = store.resolve("r1");
        assert!(err.is_err());
    }

    #[test]
    fn advancing_phase_resets_resolution_state() {
        let mut store = NetworkStore::new();
        store.create(sample("r1"));
        store.resolve("r1").unwrap();
        store
            .advance_phase("r1", RequestPhase::ResponseStarted)
            .unwrap();
        store.resolve("r1").unwrap();
    }

    #[test]
    fn find_by_fetch_id_matches_registered_request() {
        let mut store = NetworkStore::new();
        let mut req = sample("r1");
        req.fetch_request_id = Some("f1".into());
        store.create(req);
        assert_eq!(store.find_by_fetch_id("f1").unwrap().id, "r1");
        assert!(store.find_by_fetch_id("missing").is_none());
    }
}
