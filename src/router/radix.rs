//! Segment trie used for per-method route matching.
//!
//! Each node represents one `/`-delimited segment of a registered pattern.
//! Three kinds of segments are stored:
//!
//! - **Literal** segments (`users`) match the same text exactly
//! - **Named** segments (`:id`) match any single segment
//! - **Catch-all** segments (`*filepath`) match every remaining segment and
//!   are always the last segment of a pattern
//!
//! A node only terminates a route when a pattern was inserted ending exactly
//! at it. Intermediate nodes are reachable during search but never match.
//!
//! ## Precedence
//!
//! During search, literal children are tried before wildcard children, and
//! within each kind children are tried in insertion order. The first complete
//! match wins, so `/p/go/doc` beats `/p/:lang/doc` for the request
//! `/p/go/doc` no matter which of the two was registered first.
//!
//! ## Distinct wildcard names
//!
//! Insertion reuses a child only when its segment text is identical. The
//! patterns `/p/:lang/x` and `/p/:id/y` therefore occupy two separate
//! wildcard slots under `/p`, and a request to `/p/go/y` binds `id`, never
//! `lang`.

use std::sync::Arc;

/// Split a pattern or request path into its non-empty segments.
///
/// Parsing stops after the first catch-all (`*`) segment, which swallows the
/// remainder of the path by construction.
pub(crate) fn parse_pattern(pattern: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    for item in pattern.split('/') {
        if item.is_empty() {
            continue;
        }
        parts.push(item);
        if item.starts_with('*') {
            break;
        }
    }
    parts
}

#[inline]
fn is_wild_segment(part: &str) -> bool {
    part.starts_with(':') || part.starts_with('*')
}

/// Node in the segment trie
#[derive(Debug, Clone, Default)]
pub(crate) struct Node {
    /// Full pattern of the route terminating at this node, if any
    pattern: Option<Arc<str>>,
    /// Segment this node represents (`users`, `:id`, `*filepath`)
    part: String,
    /// Children in insertion order
    children: Vec<Node>,
    /// True when `part` is a named or catch-all segment
    is_wild: bool,
}

impl Node {
    /// Create an empty root node
    pub(crate) fn root() -> Self {
        Self::default()
    }

    fn new(part: &str) -> Self {
        Self {
            pattern: None,
            part: part.to_string(),
            children: Vec::new(),
            is_wild: is_wild_segment(part),
        }
    }

    /// The full pattern terminating at this node
    pub(crate) fn pattern(&self) -> Option<&Arc<str>> {
        self.pattern.as_ref()
    }

    /// Insert `pattern` whose parsed segments are `parts`, starting at `height`.
    ///
    /// Re-inserting an existing pattern overwrites the terminal marker with an
    /// identical value and leaves the tree shape untouched.
    pub(crate) fn insert(&mut self, pattern: &str, parts: &[&str], height: usize) {
        if parts.len() == height {
            self.pattern = Some(Arc::from(pattern));
            return;
        }

        let part = parts[height];
        let idx = match self.children.iter().position(|child| child.part == part) {
            Some(idx) => idx,
            None => {
                self.children.push(Node::new(part));
                self.children.len() - 1
            }
        };
        self.children[idx].insert(pattern, parts, height + 1);
    }

    /// Find the terminal node matching the concrete request segments.
    pub(crate) fn search(&self, parts: &[&str], height: usize) -> Option<&Node> {
        if parts.len() == height || self.part.starts_with('*') {
            return self.pattern.as_ref().map(|_| self);
        }

        let part = parts[height];
        let literals = self
            .children
            .iter()
            .filter(|child| !child.is_wild && child.part == part);
        let wildcards = self.children.iter().filter(|child| child.is_wild);

        literals
            .chain(wildcards)
            .find_map(|child| child.search(parts, height + 1))
    }

    /// Collect every pattern stored at or below this node.
    pub(crate) fn collect_patterns(&self, out: &mut Vec<Arc<str>>) {
        if let Some(pattern) = &self.pattern {
            out.push(Arc::clone(pattern));
        }
        for child in &self.children {
            child.collect_patterns(out);
        }
    }
}
