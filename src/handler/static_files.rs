//! Static file serving module
//!
//! Resolves wildcard-captured paths against configured mount roots and
//! streams file contents with the right content type, gzip-encoded when the
//! mount allows it and the client asked for it.
//!
//! Containment is enforced twice: parent-directory components are rejected
//! lexically before touching the filesystem, and the canonicalized result
//! must still live under the canonicalized mount root (symlinks).

use crate::http::{self, encoding, mime, response};
use crate::logger;
use hyper::body::Bytes;
use hyper::Response;
use std::io;
use std::path::{Component, Path, PathBuf};
use tokio::fs;

/// A named static directory with its compression policy, immutable after
/// construction
#[derive(Debug, Clone)]
pub struct StaticMount {
    name: String,
    root: PathBuf,
    gzip: bool,
}

impl StaticMount {
    pub fn new(name: impl Into<String>, root: PathBuf, gzip: bool) -> Self {
        Self {
            name: name.into(),
            root,
            gzip,
        }
    }
}

enum ResolveError {
    /// The suffix points outside the mount root
    Traversal,
    /// No such file under the root
    NotFound,
}

/// Serve a wildcard-captured suffix from a mount
pub async fn serve_mount(
    mount: &StaticMount,
    suffix: &str,
    accepts_gzip: bool,
) -> Response<Bytes> {
    match resolve(&mount.root, suffix).await {
        Ok(file_path) => read_and_respond(&file_path, mount.gzip && accepts_gzip).await,
        Err(ResolveError::Traversal) => {
            logger::log_warning(&format!(
                "Path traversal attempt blocked on mount '{}': {suffix}",
                mount.name
            ));
            http::build_403_response()
        }
        Err(ResolveError::NotFound) => http::build_404_response(),
    }
}

/// Serve a fixed whitelisted file (favicon and friends), never compressed
pub async fn serve_file(path: &Path) -> Response<Bytes> {
    read_and_respond(path, false).await
}

/// Resolve a captured suffix to a contained file path under `root`
async fn resolve(root: &Path, suffix: &str) -> Result<PathBuf, ResolveError> {
    let relative = suffix.trim_start_matches('/');
    if relative.is_empty() {
        return Err(ResolveError::NotFound);
    }

    // Lexical containment: no parent-directory or absolute components
    for component in Path::new(relative).components() {
        match component {
            Component::Normal(_) | Component::CurDir => {}
            _ => return Err(ResolveError::Traversal),
        }
    }

    let canonical_root = match fs::canonicalize(root).await {
        Ok(p) => p,
        Err(e) => {
            logger::log_warning(&format!(
                "Static mount root not found or inaccessible '{}': {e}",
                root.display()
            ));
            return Err(ResolveError::NotFound);
        }
    };

    let Ok(canonical) = fs::canonicalize(root.join(relative)).await else {
        return Err(ResolveError::NotFound);
    };

    // Filesystem containment: a symlink may still point outside the root
    if !canonical.starts_with(&canonical_root) {
        return Err(ResolveError::Traversal);
    }

    Ok(canonical)
}

/// Read the resolved file and build the response
async fn read_and_respond(path: &Path, use_gzip: bool) -> Response<Bytes> {
    let content = match fs::read(path).await {
        Ok(c) => c,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return http::build_404_response(),
        Err(e) => {
            // Directories fail the read; they are not listed, just missing
            if path.is_dir() {
                return http::build_404_response();
            }
            logger::log_error(&format!("Failed to read file '{}': {e}", path.display()));
            return http::build_500_response();
        }
    };

    let content_type = mime::get_content_type(path.extension().and_then(|e| e.to_str()));

    if use_gzip {
        match encoding::gzip_encode(&content) {
            Ok(compressed) => {
                return response::build_file_response(
                    Bytes::from(compressed),
                    content_type,
                    Some("gzip"),
                )
            }
            Err(e) => {
                logger::log_error(&format!("gzip encoding failed: {e}"));
            }
        }
    }

    response::build_file_response(Bytes::from(content), content_type, None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::read::GzDecoder;
    use std::io::Read;

    /// Create a unique scratch directory seeded with a couple of assets
    fn scratch_root(tag: &str) -> PathBuf {
        let root = std::env::temp_dir().join(format!(
            "cosr-front-static-{tag}-{}",
            std::process::id()
        ));
        let _ = std::fs::remove_dir_all(&root);
        std::fs::create_dir_all(root.join("vendor")).unwrap();
        std::fs::write(root.join("app.js"), b"var app = {};\n").unwrap();
        std::fs::write(root.join("vendor").join("lib.js"), b"var lib = {};\n").unwrap();
        root
    }

    #[tokio::test]
    async fn test_serves_file_with_content_type() {
        let root = scratch_root("plain");
        let mount = StaticMount::new("js", root.clone(), false);

        let resp = serve_mount(&mount, "/app.js", false).await;
        assert_eq!(resp.status(), 200);
        assert_eq!(
            resp.headers().get("Content-Type").unwrap(),
            "application/javascript"
        );
        assert_eq!(resp.body().as_ref(), b"var app = {};\n");

        let resp = serve_mount(&mount, "/vendor/lib.js", false).await;
        assert_eq!(resp.status(), 200);

        let _ = std::fs::remove_dir_all(root);
    }

    #[tokio::test]
    async fn test_missing_file_is_404() {
        let root = scratch_root("missing");
        let mount = StaticMount::new("js", root.clone(), true);

        let resp = serve_mount(&mount, "/nope.js", true).await;
        assert_eq!(resp.status(), 404);

        // Empty capture and bare directories are not served either
        assert_eq!(serve_mount(&mount, "/", false).await.status(), 404);
        assert_eq!(serve_mount(&mount, "/vendor", false).await.status(), 404);

        let _ = std::fs::remove_dir_all(root);
    }

    #[tokio::test]
    async fn test_traversal_is_403() {
        let root = scratch_root("traversal");
        let mount = StaticMount::new("js", root.clone(), false);

        let resp = serve_mount(&mount, "/../../etc/passwd", false).await;
        assert_eq!(resp.status(), 403);

        let resp = serve_mount(&mount, "/vendor/../../outside.js", false).await;
        assert_eq!(resp.status(), 403);

        let _ = std::fs::remove_dir_all(root);
    }

    #[tokio::test]
    async fn test_gzip_enabled_mount_negotiates() {
        let root = scratch_root("gzip");
        let mount = StaticMount::new("js", root.clone(), true);

        let resp = serve_mount(&mount, "/app.js", true).await;
        assert_eq!(resp.status(), 200);
        assert_eq!(resp.headers().get("Content-Encoding").unwrap(), "gzip");

        let mut decoder = GzDecoder::new(resp.body().as_ref());
        let mut restored = Vec::new();
        decoder.read_to_end(&mut restored).unwrap();
        assert_eq!(restored, b"var app = {};\n");

        // Same mount, client without gzip support
        let resp = serve_mount(&mount, "/app.js", false).await;
        assert!(resp.headers().get("Content-Encoding").is_none());
        assert_eq!(resp.body().as_ref(), b"var app = {};\n");

        let _ = std::fs::remove_dir_all(root);
    }

    #[tokio::test]
    async fn test_gzip_disabled_mount_never_compresses() {
        let root = scratch_root("nogzip");
        let mount = StaticMount::new("img", root.clone(), false);

        let resp = serve_mount(&mount, "/app.js", true).await;
        assert_eq!(resp.status(), 200);
        assert!(resp.headers().get("Content-Encoding").is_none());
        assert_eq!(resp.body().as_ref(), b"var app = {};\n");

        let _ = std::fs::remove_dir_all(root);
    }

    #[tokio::test]
    async fn test_serve_fixed_file() {
        let root = scratch_root("fixed");
        let resp = serve_file(&root.join("app.js")).await;
        assert_eq!(resp.status(), 200);
        assert!(resp.headers().get("Content-Encoding").is_none());

        let resp = serve_file(&root.join("missing.ico")).await;
        assert_eq!(resp.status(), 404);

        let _ = std::fs::remove_dir_all(root);
    }
}
