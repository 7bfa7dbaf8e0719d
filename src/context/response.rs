use std::sync::Arc;

use http::StatusCode;
use smallvec::SmallVec;

/// Maximum inline headers before heap allocation
pub const MAX_INLINE_HEADERS: usize = 16;

/// Stack-allocated header storage for the hot path
///
/// Header names use `Arc<str>` since they repeat across requests
/// (`content-type`, `x-request-id`, ...).
pub type HeaderVec = SmallVec<[(Arc<str>, String); MAX_INLINE_HEADERS]>;

pub(crate) const REQUEST_ID_HEADER: &str = "x-request-id";

pub(crate) const TEXT_PLAIN: &str = "text/plain; charset=utf-8";
pub(crate) const APPLICATION_JSON: &str = "application/json";
pub(crate) const TEXT_HTML: &str = "text/html; charset=utf-8";

/// Buffered response produced by running a handler chain.
///
/// Nothing reaches the wire until the chain has finished and the transport
/// writes the whole response out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    /// HTTP status code (200 unless a handler set one)
    pub status: u16,
    /// Response headers in insertion order
    pub headers: HeaderVec,
    /// Response body bytes
    pub body: Vec<u8>,
}

impl Default for Response {
    fn default() -> Self {
        Self {
            status: 200,
            headers: HeaderVec::new(),
            body: Vec::new(),
        }
    }
}

impl Response {
    /// Get a header by name
    #[inline]
    #[must_use]
    pub fn get_header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Add or update a header
    pub fn set_header(&mut self, name: &str, value: String) {
        self.headers.retain(|(k, _)| !k.eq_ignore_ascii_case(name));
        self.headers.push((Arc::from(name), value));
    }

    /// Body interpreted as UTF-8 (lossy)
    #[must_use]
    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Drop everything written so far except the `x-request-id` header
    pub(crate) fn clear_for_error(&mut self) {
        self.headers
            .retain(|(k, _)| k.eq_ignore_ascii_case(REQUEST_ID_HEADER));
        self.body.clear();
    }
}

/// Canonical reason phrase for `status`, `"Unknown"` for unregistered codes
#[must_use]
pub fn status_reason(status: u16) -> &'static str {
    StatusCode::from_u16(status)
        .ok()
        .and_then(|s| s.canonical_reason())
        .unwrap_or("Unknown")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_reason() {
        assert_eq!(status_reason(200), "OK");
        assert_eq!(status_reason(404), "Not Found");
        assert_eq!(status_reason(500), "Internal Server Error");
        assert_eq!(status_reason(307), "Temporary Redirect");
        assert_eq!(status_reason(308), "Permanent Redirect");
        assert_eq!(status_reason(410), "Gone");
        assert_eq!(status_reason(418), "I'm a teapot");
        assert_eq!(status_reason(599), "Unknown");
    }

    #[test]
    fn test_clear_for_error_keeps_only_request_id() {
        let mut res = Response::default();
        res.set_header("x-request-id", "01ARZ3NDEKTSV4RRFFQ69G5FAV".to_string());
        res.set_header("cache-control", "max-age=3600".to_string());
        res.set_header("content-disposition", "attachment".to_string());
        res.body = b"partial".to_vec();
        res.clear_for_error();
        assert_eq!(res.headers.len(), 1);
        assert_eq!(
            res.get_header("X-Request-Id"),
            Some("01ARZ3NDEKTSV4RRFFQ69G5FAV")
        );
        assert!(res.body.is_empty());
    }

    #[test]
    fn test_set_header_replaces_case_insensitively() {
        let mut res = Response::default();
        res.set_header("Content-Type", "text/plain".to_string());
        res.set_header("content-type", "application/json".to_string());
        assert_eq!(res.headers.len(), 1);
        assert_eq!(res.get_header("CONTENT-TYPE"), Some("application/json"));
    }
}
