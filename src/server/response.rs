use std::collections::HashSet;
use std::sync::Mutex;

use once_cell::sync::Lazy;
use tracing::{trace, warn};

use crate::context::{
    status_reason, Response, APPLICATION_JSON, REQUEST_ID_HEADER, TEXT_HTML, TEXT_PLAIN,
};
use crate::static_files;

/// Upper bound on distinct handler-supplied header lines kept for the
/// process lifetime
pub const MAX_INTERNED_HEADER_LINES: usize = 4096;

/// Headers whose value changes on every request. They are never interned
/// and therefore not written to the wire.
const PER_REQUEST_HEADERS: &[&str] = &[REQUEST_ID_HEADER];

/// Headers computed by the transport itself
const TRANSPORT_HEADERS: &[&str] = &["content-length", "date", "server"];

/// `content-type` lines for every type the crate itself sets. Leaked once
/// and never counted against [`MAX_INTERNED_HEADER_LINES`].
static BUILTIN_LINES: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [TEXT_PLAIN, APPLICATION_JSON, TEXT_HTML]
        .into_iter()
        .chain(static_files::known_content_types())
        .map(|ct| &*Box::leak(format!("content-type: {ct}").into_boxed_str()))
        .collect()
});

/// `may_minihttp` only accepts `&'static str` header lines. Each distinct
/// line is leaked once and reused afterwards.
static HEADER_LINES: Lazy<Mutex<HeaderLineTable>> =
    Lazy::new(|| Mutex::new(HeaderLineTable::new(MAX_INTERNED_HEADER_LINES)));

/// Capped set of leaked header lines
#[derive(Debug)]
pub(crate) struct HeaderLineTable {
    lines: HashSet<&'static str>,
    limit: usize,
}

impl HeaderLineTable {
    pub(crate) fn new(limit: usize) -> Self {
        Self {
            lines: HashSet::new(),
            limit,
        }
    }

    /// Return the interned copy of `line`, leaking it on first sight.
    ///
    /// Built-in `content-type` lines always resolve. Anything else is
    /// `None` once `limit` distinct lines exist.
    pub(crate) fn intern(&mut self, line: String) -> Option<&'static str> {
        if let Some(builtin) = BUILTIN_LINES.get(line.as_str()) {
            return Some(*builtin);
        }
        if let Some(existing) = self.lines.get(line.as_str()) {
            return Some(*existing);
        }
        if self.lines.len() >= self.limit {
            return None;
        }
        let leaked: &'static str = Box::leak(line.into_boxed_str());
        self.lines.insert(leaked);
        Some(leaked)
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.lines.len()
    }
}

fn intern_header_line(line: String) -> Option<&'static str> {
    HEADER_LINES
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
        .intern(line)
}

fn is_writable(name: &str, value: &str) -> bool {
    !name.is_empty()
        && !name.contains([':', '\r', '\n'])
        && !value.contains(['\r', '\n'])
}

/// Write a buffered [`Response`] to the `may_minihttp` response.
pub fn write_response(res: &mut may_minihttp::Response, response: Response) {
    res.status_code(usize::from(response.status), status_reason(response.status));

    for (name, value) in &response.headers {
        let name = name.as_ref();
        if TRANSPORT_HEADERS.iter().any(|h| h.eq_ignore_ascii_case(name)) {
            continue;
        }
        if PER_REQUEST_HEADERS.iter().any(|h| h.eq_ignore_ascii_case(name)) {
            trace!(header = %name, "Per-request header kept in-process only");
            continue;
        }
        if !is_writable(name, value) {
            warn!(header = %name, "Dropping header with invalid characters");
            continue;
        }
        match intern_header_line(format!("{name}: {value}")) {
            Some(line) => {
                res.header(line);
            }
            None => warn!(
                header = %name,
                limit = MAX_INTERNED_HEADER_LINES,
                "Header line table full, dropping header"
            ),
        }
    }

    res.body_vec(response.body);
}
