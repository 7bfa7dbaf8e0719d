//! Serving files from a directory under a route prefix.
//!
//! [`StaticFiles`] maps the `filepath` bound by a `*filepath` catch-all
//! onto a base directory. Paths containing `..`, a root, or a drive prefix
//! never leave the base directory; they are rejected as not found.

use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use tracing::debug;

use crate::context::{Context, HandlerFunc};

/// Content type by file extension (lowercase)
const CONTENT_TYPES: &[(&[&str], &str)] = &[
    (&["html", "htm"], "text/html; charset=utf-8"),
    (&["css"], "text/css; charset=utf-8"),
    (&["js", "mjs"], "application/javascript"),
    (&["json"], "application/json"),
    (&["txt"], "text/plain; charset=utf-8"),
    (&["svg"], "image/svg+xml"),
    (&["png"], "image/png"),
    (&["jpg", "jpeg"], "image/jpeg"),
    (&["gif"], "image/gif"),
    (&["ico"], "image/x-icon"),
    (&["wasm"], "application/wasm"),
    (&["pdf"], "application/pdf"),
];

const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// Every content type [`StaticFiles`] can emit
pub(crate) fn known_content_types() -> impl Iterator<Item = &'static str> {
    CONTENT_TYPES
        .iter()
        .map(|(_, ct)| *ct)
        .chain(std::iter::once(DEFAULT_CONTENT_TYPE))
}

/// Directory of files served read-only
#[derive(Debug, Clone)]
pub struct StaticFiles {
    base_dir: PathBuf,
}

impl StaticFiles {
    pub fn new<P: Into<PathBuf>>(base: P) -> Self {
        Self {
            base_dir: base.into(),
        }
    }

    #[must_use]
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    fn map_path(&self, url_path: &str) -> Option<PathBuf> {
        let mut pb = self.base_dir.clone();
        for comp in Path::new(url_path.trim_start_matches('/')).components() {
            match comp {
                Component::Normal(s) => pb.push(s),
                Component::CurDir => {}
                _ => return None,
            }
        }
        Some(pb)
    }

    pub(crate) fn content_type(path: &Path) -> &'static str {
        let ext = path
            .extension()
            .and_then(|s| s.to_str())
            .unwrap_or("")
            .to_ascii_lowercase();
        CONTENT_TYPES
            .iter()
            .find(|(exts, _)| exts.contains(&ext.as_str()))
            .map_or(DEFAULT_CONTENT_TYPE, |(_, ct)| *ct)
    }

    /// Read the file at `url_path` relative to the base directory.
    ///
    /// Returns the bytes and a content type derived from the extension.
    /// Missing files, directories and escaping paths are `NotFound`.
    pub fn load(&self, url_path: &str) -> io::Result<(Vec<u8>, &'static str)> {
        let path = self
            .map_path(url_path)
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "invalid path"))?;
        if !path.is_file() {
            return Err(io::Error::new(io::ErrorKind::NotFound, "file not found"));
        }
        let bytes = fs::read(&path)?;
        Ok((bytes, Self::content_type(&path)))
    }

    /// Route handler serving the file named by the `filepath` parameter.
    ///
    /// Anything that cannot be served leaves an empty 404.
    #[must_use]
    pub fn handler(self) -> HandlerFunc {
        Arc::new(move |ctx: &mut Context| {
            let file = ctx.param("filepath").unwrap_or("").to_string();
            match self.load(&file) {
                Ok((bytes, content_type)) => {
                    ctx.set_header("content-type", content_type);
                    ctx.data(200, bytes);
                }
                Err(e) => {
                    debug!(
                        base_dir = %self.base_dir.display(),
                        file = %file,
                        error = %e,
                        "Static file not served"
                    );
                    ctx.set_status(404);
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_map_path_prevents_traversal() {
        let sf = StaticFiles::new("assets");
        assert!(sf.map_path("../Cargo.toml").is_none());
        assert!(sf.map_path("css/../../Cargo.toml").is_none());
        assert_eq!(
            sf.map_path("/css/./site.css"),
            Some(PathBuf::from("assets/css/site.css"))
        );
    }

    #[test]
    fn test_content_type() {
        assert_eq!(
            StaticFiles::content_type(Path::new("a/b.CSS")),
            "text/css; charset=utf-8"
        );
        assert_eq!(
            StaticFiles::content_type(Path::new("noext")),
            "application/octet-stream"
        );
        assert_eq!(StaticFiles::content_type(Path::new("logo.svg")), "image/svg+xml");
        assert!(known_content_types().any(|ct| ct == "application/octet-stream"));
    }

    #[test]
    fn test_load_plain_file() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("hello.txt"), "Hello\n").unwrap();
        let sf = StaticFiles::new(dir.path());
        let (bytes, ct) = sf.load("hello.txt").unwrap();
        assert_eq!(ct, "text/plain; charset=utf-8");
        assert_eq!(bytes, b"Hello\n");
    }

    #[test]
    fn test_directory_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();
        let sf = StaticFiles::new(dir.path());
        let err = sf.load("sub").unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }
}
