use std::fmt;
use std::io::{self, Read};

use http::Method;
use tracing::debug;

use crate::context::Request;

/// Why a wire request could not be turned into a [`Request`]
#[derive(Debug)]
pub enum RequestError {
    /// The method token is not a valid HTTP method
    InvalidMethod(String),
    /// Reading the body failed
    Body(io::Error),
}

impl fmt::Display for RequestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequestError::InvalidMethod(m) => write!(f, "invalid method: {m}"),
            RequestError::Body(e) => write!(f, "failed to read request body: {e}"),
        }
    }
}

impl std::error::Error for RequestError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RequestError::Body(e) => Some(e),
            RequestError::InvalidMethod(_) => None,
        }
    }
}

/// Translate a `may_minihttp` request into a [`Request`].
///
/// The path is percent-decoded, the query string is kept raw, and header
/// names are lowercased.
pub fn parse_request(req: may_minihttp::Request) -> Result<Request, RequestError> {
    let method = req.method().to_string();
    let uri = req.path().to_string();
    let headers: Vec<(String, String)> = req
        .headers()
        .iter()
        .map(|h| {
            (
                h.name.to_ascii_lowercase(),
                String::from_utf8_lossy(h.value).into_owned(),
            )
        })
        .collect();

    let mut body = Vec::new();
    req.body()
        .read_to_end(&mut body)
        .map_err(RequestError::Body)?;

    build_request(&method, &uri, headers, body)
}

/// Transport-independent part of [`parse_request`]
pub fn build_request<I>(
    method: &str,
    uri: &str,
    headers: I,
    body: Vec<u8>,
) -> Result<Request, RequestError>
where
    I: IntoIterator<Item = (String, String)>,
{
    let method = Method::from_bytes(method.as_bytes())
        .map_err(|_| RequestError::InvalidMethod(method.to_string()))?;

    let (raw_path, raw_query) = uri.split_once('?').unwrap_or((uri, ""));
    let path = decode_path(raw_path);

    let mut request = Request::from_parts(method, &path, raw_query);
    for (name, value) in headers {
        request = request.with_header(&name.to_ascii_lowercase(), value);
    }
    let body_len = body.len();
    let request = request.with_body(body);

    debug!(
        method = %request.method(),
        path = %request.path(),
        headers_count = request.headers().len(),
        body_size_bytes = body_len,
        "HTTP request parsed"
    );
    Ok(request)
}

/// Percent-decode a request path, keeping it verbatim if the result is not
/// valid UTF-8
fn decode_path(raw: &str) -> String {
    match urlencoding::decode(raw) {
        Ok(decoded) => decoded.into_owned(),
        Err(_) => raw.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NO_HEADERS: [(String, String); 0] = [];

    #[test]
    fn test_build_request() {
        let req = build_request(
            "POST",
            "/hello%20world/x?name=a%20b",
            vec![("Content-Type".to_string(), "text/plain".to_string())],
            b"payload".to_vec(),
        )
        .unwrap();
        assert_eq!(req.method(), &Method::POST);
        assert_eq!(req.path(), "/hello world/x");
        assert_eq!(req.raw_query(), "name=a%20b");
        assert_eq!(req.query("name").as_deref(), Some("a b"));
        assert_eq!(req.headers()[0].0.as_ref(), "content-type");
        assert_eq!(req.body(), b"payload");
    }

    #[test]
    fn test_encoded_question_mark_stays_in_path() {
        let req = build_request("GET", "/a%3Fb?c=d", NO_HEADERS, Vec::new()).unwrap();
        assert_eq!(req.path(), "/a?b");
        assert_eq!(req.raw_query(), "c=d");
    }

    #[test]
    fn test_invalid_method() {
        let err = build_request("GE T", "/", NO_HEADERS, Vec::new()).unwrap_err();
        assert!(matches!(err, RequestError::InvalidMethod(_)));
        assert_eq!(err.to_string(), "invalid method: GE T");
    }

    #[test]
    fn test_invalid_utf8_path_kept_raw() {
        assert_eq!(decode_path("/a%FF"), "/a%FF");
        assert_eq!(decode_path("/caf%C3%A9"), "/café");
    }
}
