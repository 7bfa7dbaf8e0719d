use std::sync::Arc;

use http::Method;

use super::response::HeaderVec;

/// Transport-independent view of an inbound request.
///
/// The transport layer (see [`crate::server`]) builds this from the wire
/// request. Tests build it directly with [`Request::new`].
#[derive(Debug, Clone)]
pub struct Request {
    method: Method,
    path: String,
    raw_query: String,
    headers: HeaderVec,
    body: Vec<u8>,
}

impl Request {
    /// Create a request for `method` and `uri`.
    ///
    /// Everything after the first `?` in `uri` is kept as the raw query
    /// string. The path part is used verbatim.
    #[must_use]
    pub fn new(method: Method, uri: &str) -> Self {
        let (path, raw_query) = match uri.split_once('?') {
            Some((path, query)) => (path, query),
            None => (uri, ""),
        };
        Self::from_parts(method, path, raw_query)
    }

    /// Create a request from an already split path and raw query string
    #[must_use]
    pub fn from_parts(method: Method, path: &str, raw_query: &str) -> Self {
        let path = if path.is_empty() { "/" } else { path };
        Self {
            method,
            path: path.to_string(),
            raw_query: raw_query.to_string(),
            headers: HeaderVec::new(),
            body: Vec::new(),
        }
    }

    /// Add a header (names are matched case-insensitively)
    #[must_use]
    pub fn with_header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.headers.push((Arc::from(name), value.into()));
        self
    }

    /// Attach a request body
    #[must_use]
    pub fn with_body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = body.into();
        self
    }

    #[must_use]
    pub fn method(&self) -> &Method {
        &self.method
    }

    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    #[must_use]
    pub fn raw_query(&self) -> &str {
        &self.raw_query
    }

    #[must_use]
    pub fn headers(&self) -> &HeaderVec {
        &self.headers
    }

    #[must_use]
    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Get a header by name (case-insensitive per RFC 7230)
    #[inline]
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// First value of the URL query parameter `key`, percent-decoded
    #[must_use]
    pub fn query(&self, key: &str) -> Option<String> {
        form_value(self.raw_query.as_bytes(), key)
    }

    /// Value of the form field `key`.
    ///
    /// A `application/x-www-form-urlencoded` body takes precedence over the
    /// URL query string.
    #[must_use]
    pub fn post_form(&self, key: &str) -> Option<String> {
        if self.is_form_body() {
            if let Some(value) = form_value(&self.body, key) {
                return Some(value);
            }
        }
        self.query(key)
    }

    fn is_form_body(&self) -> bool {
        self.header("content-type")
            .map(|ct| {
                ct.split(';')
                    .next()
                    .unwrap_or("")
                    .trim()
                    .eq_ignore_ascii_case("application/x-www-form-urlencoded")
            })
            .unwrap_or(false)
    }
}

fn form_value(input: &[u8], key: &str) -> Option<String> {
    url::form_urlencoded::parse(input)
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.into_owned())
}
