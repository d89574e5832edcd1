//! Collection load sequencing.
//!
//! The transport itself lives in the plugin shim (`web_request`); this module
//! decides which responses are still wanted. Every fetch gets a fresh,
//! monotonically increasing [`RequestId`] that travels in the request context
//! and comes back with the response. Only the most recently issued id is ever
//! accepted, so a slow response to a superseded request can never overwrite
//! newer state.

use crate::domain::{decode_collection, Collection, Result, RosterError};
use std::fmt;
use std::time::Duration;

/// Key under which the request id is stored in the `web_request` context map.
pub const REQUEST_ID_CONTEXT_KEY: &str = "request_id";

/// Monotonic token identifying one collection request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestId(u64);

impl RequestId {
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }

    /// Parses the id back out of a response context value.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        value.trim().parse().ok().map(Self)
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy)]
struct PendingRequest {
    id: RequestId,
    issued_at_ms: i64,
}

/// Tracks the single in-flight collection request.
///
/// "Last requested wins": [`begin`](Self::begin) while a request is pending
/// supersedes it, and the superseded id is rejected by
/// [`settle`](Self::settle) when its response eventually arrives.
#[derive(Debug, Clone)]
pub struct LoadTracker {
    last_issued: u64,
    pending: Option<PendingRequest>,
    timeout: Option<Duration>,
}

impl LoadTracker {
    /// Creates a tracker. `timeout` of `None` lets requests wait indefinitely.
    #[must_use]
    pub const fn new(timeout: Option<Duration>) -> Self {
        Self {
            last_issued: 0,
            pending: None,
            timeout,
        }
    }

    #[must_use]
    pub const fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Issues a new request id, superseding any pending request.
    pub fn begin(&mut self, now_ms: i64) -> RequestId {
        self.last_issued += 1;
        let id = RequestId(self.last_issued);

        if let Some(previous) = self.pending.replace(PendingRequest {
            id,
            issued_at_ms: now_ms,
        }) {
            tracing::debug!(superseded = %previous.id, request_id = %id, "superseding pending load");
        }

        id
    }

    /// Marks `id` as answered.
    ///
    /// Returns `false` for ids that are not the pending request (superseded,
    /// expired or never issued); their responses must be discarded.
    pub fn settle(&mut self, id: RequestId) -> bool {
        match self.pending {
            Some(pending) if pending.id == id => {
                self.pending = None;
                true
            }
            _ => {
                tracing::debug!(request_id = %id, pending = ?self.pending.map(|p| p.id), "discarding stale response");
                false
            }
        }
    }

    /// Expires the pending request if it has outlived the timeout at `now_ms`.
    ///
    /// Returns the expired id. A response that arrives for it afterwards is
    /// rejected by [`settle`](Self::settle).
    pub fn expire(&mut self, now_ms: i64) -> Option<RequestId> {
        let timeout = self.timeout?;
        let pending = self.pending?;
        let timeout_ms = i64::try_from(timeout.as_millis()).unwrap_or(i64::MAX);

        if now_ms.saturating_sub(pending.issued_at_ms) >= timeout_ms {
            self.pending = None;
            Some(pending.id)
        } else {
            None
        }
    }

    #[must_use]
    pub const fn is_loading(&self) -> bool {
        self.pending.is_some()
    }
}

impl Default for LoadTracker {
    fn default() -> Self {
        Self::new(None)
    }
}

/// Turns an HTTP status and body into a collection or a load failure.
///
/// # Errors
///
/// - [`RosterError::Network`] for any non-2xx status
/// - [`RosterError::MalformedData`] if a 2xx body is not a people collection
pub fn interpret_response(status: u16, body: &[u8], loaded_at: i64) -> Result<Collection> {
    if !(200..300).contains(&status) {
        let detail = std::str::from_utf8(body)
            .ok()
            .map(str::trim)
            .filter(|text| !text.is_empty() && text.len() <= 120 && !text.starts_with('<'));

        return Err(RosterError::Network(match detail {
            Some(text) => format!("HTTP {status}: {text}"),
            None => format!("HTTP {status}"),
        }));
    }

    decode_collection(body, loaded_at)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_monotonic() {
        let mut tracker = LoadTracker::default();
        let first = tracker.begin(0);
        let second = tracker.begin(0);
        assert!(second > first);
        assert_eq!(RequestId::parse(&second.to_string()), Some(second));
    }

    #[test]
    fn last_requested_wins() {
        let mut tracker = LoadTracker::default();
        let first = tracker.begin(0);
        let second = tracker.begin(10);

        assert!(!tracker.settle(first));
        assert!(tracker.is_loading());
        assert!(tracker.settle(second));
        assert!(!tracker.is_loading());

        // a duplicate answer for the settled id is stale too
        assert!(!tracker.settle(second));
    }

    #[test]
    fn expiry_respects_timeout() {
        let mut tracker = LoadTracker::new(Some(Duration::from_secs(10)));
        let id = tracker.begin(1_000);

        assert_eq!(tracker.expire(10_999), None);
        assert_eq!(tracker.expire(11_000), Some(id));
        assert!(!tracker.is_loading());
        assert!(!tracker.settle(id));
    }

    #[test]
    fn no_timeout_never_expires() {
        let mut tracker = LoadTracker::new(None);
        tracker.begin(0);
        assert_eq!(tracker.expire(i64::MAX), None);
        assert!(tracker.is_loading());
    }

    #[test]
    fn non_success_status_is_network_failure() {
        let err = interpret_response(503, b"Service Unavailable", 0).unwrap_err();
        assert_eq!(err.user_message(), "HTTP 503: Service Unavailable");

        let err = interpret_response(404, b"<html><body>nope</body></html>", 0).unwrap_err();
        assert_eq!(err.user_message(), "HTTP 404");
    }

    #[test]
    fn success_status_decodes_body() {
        let collection = interpret_response(200, br#"[{"id": 1, "name": "Leanne"}]"#, 5).unwrap();
        assert_eq!(collection.len(), 1);
        assert_eq!(collection.loaded_at, 5);

        assert!(matches!(
            interpret_response(200, b"{}", 0),
            Err(RosterError::MalformedData(_))
        ));
    }
}
