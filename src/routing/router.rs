//! Router module
//!
//! Maps (method, path pattern) pairs to handlers. The table is populated
//! during startup and is read-only afterwards, so concurrent dispatch needs
//! no locking.
//!
//! Matching policy: an exact literal match always beats a wildcard match;
//! among wildcard candidates the longest registered prefix wins.

use super::pattern::{PatternError, RoutePattern};
use hyper::Method;
use std::fmt;

/// A single registered route
#[derive(Debug, Clone)]
pub struct RouteEntry<H> {
    method: Method,
    pattern: RoutePattern,
    handler: H,
}

/// Startup-time registration failures
#[derive(Debug)]
pub enum RouterError {
    /// The pattern collides with an already-registered one for this method
    ConflictingRoute { method: Method, pattern: String },
    /// The pattern string is malformed
    InvalidPattern {
        pattern: String,
        source: PatternError,
    },
}

impl fmt::Display for RouterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConflictingRoute { method, pattern } => {
                write!(f, "conflicting route: {method} {pattern}")
            }
            Self::InvalidPattern { pattern, source } => {
                write!(f, "invalid route pattern '{pattern}': {source}")
            }
        }
    }
}

impl std::error::Error for RouterError {}

/// Dispatch failures, resolved into status responses by the caller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchError {
    /// No registered pattern matches the path
    RouteNotFound,
    /// The path is registered, but not under this method
    MethodNotAllowed,
}

/// A successful dispatch: the bound handler plus any wildcard capture
#[derive(Debug)]
pub struct RouteMatch<'r, 'p, H> {
    pub handler: &'r H,
    /// Wildcard capture, leading separator included (`/app.js`)
    pub capture: Option<&'p str>,
}

/// Request router, generic over the handler type it stores
#[derive(Debug, Default)]
pub struct Router<H> {
    entries: Vec<RouteEntry<H>>,
}

impl<H> Router<H> {
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Register a route
    ///
    /// All registration happens during startup; a collision with an existing
    /// pattern for the same method is a configuration error.
    pub fn register(&mut self, method: Method, pattern: &str, handler: H) -> Result<(), RouterError> {
        let parsed =
            RoutePattern::parse(pattern).map_err(|source| RouterError::InvalidPattern {
                pattern: pattern.to_string(),
                source,
            })?;

        if self
            .entries
            .iter()
            .any(|entry| entry.method == method && entry.pattern.conflicts_with(&parsed))
        {
            return Err(RouterError::ConflictingRoute {
                method,
                pattern: pattern.to_string(),
            });
        }

        self.entries.push(RouteEntry {
            method,
            pattern: parsed,
            handler,
        });
        Ok(())
    }

    /// Find the most specific route for a request
    pub fn dispatch<'r, 'p>(
        &'r self,
        method: &Method,
        path: &'p str,
    ) -> Result<RouteMatch<'r, 'p, H>, DispatchError> {
        let mut best: Option<(usize, &'r RouteEntry<H>, &'p str)> = None;
        let mut other_method = false;

        for entry in &self.entries {
            let Some(capture) = entry.pattern.matches(path) else {
                continue;
            };
            if entry.method != *method {
                other_method = true;
                continue;
            }

            match capture {
                // Exact literal match wins outright
                None => {
                    return Ok(RouteMatch {
                        handler: &entry.handler,
                        capture: None,
                    })
                }
                Some(suffix) => {
                    let prefix_len = entry.pattern.wildcard_prefix_len().unwrap_or(0);
                    if best.as_ref().map_or(true, |(len, _, _)| prefix_len > *len) {
                        best = Some((prefix_len, entry, suffix));
                    }
                }
            }
        }

        if let Some((_, entry, suffix)) = best {
            return Ok(RouteMatch {
                handler: &entry.handler,
                capture: Some(suffix),
            });
        }

        Err(if other_method {
            DispatchError::MethodNotAllowed
        } else {
            DispatchError::RouteNotFound
        })
    }

    /// Number of registered routes
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_router() -> Router<&'static str> {
        let mut router = Router::new();
        router.register(Method::GET, "/", "search-page").unwrap();
        router
            .register(Method::GET, "/api/search", "search-api")
            .unwrap();
        router
            .register(Method::GET, "/js/*filepath", "js-mount")
            .unwrap();
        router
            .register(Method::GET, "/img/*filepath", "img-mount")
            .unwrap();
        router
            .register(Method::GET, "/favicon.ico", "favicon")
            .unwrap();
        router
    }

    #[test]
    fn test_exact_dispatch() {
        let router = make_router();
        let m = router.dispatch(&Method::GET, "/").unwrap();
        assert_eq!(*m.handler, "search-page");
        assert_eq!(m.capture, None);

        let m = router.dispatch(&Method::GET, "/api/search").unwrap();
        assert_eq!(*m.handler, "search-api");
    }

    #[test]
    fn test_wildcard_dispatch_captures_suffix() {
        let router = make_router();
        let m = router.dispatch(&Method::GET, "/js/app.js").unwrap();
        assert_eq!(*m.handler, "js-mount");
        assert_eq!(m.capture, Some("/app.js"));

        let m = router.dispatch(&Method::GET, "/img/icons/logo.png").unwrap();
        assert_eq!(*m.handler, "img-mount");
        assert_eq!(m.capture, Some("/icons/logo.png"));
    }

    #[test]
    fn test_exact_beats_wildcard() {
        let mut router = make_router();
        router
            .register(Method::GET, "/js/pinned.js", "pinned")
            .unwrap();

        let m = router.dispatch(&Method::GET, "/js/pinned.js").unwrap();
        assert_eq!(*m.handler, "pinned");
        assert_eq!(m.capture, None);

        // Sibling paths still reach the mount
        let m = router.dispatch(&Method::GET, "/js/other.js").unwrap();
        assert_eq!(*m.handler, "js-mount");
    }

    #[test]
    fn test_longest_wildcard_prefix_wins() {
        let mut router: Router<&'static str> = Router::new();
        router
            .register(Method::GET, "/static/*filepath", "outer")
            .unwrap();
        router
            .register(Method::GET, "/static/vendor/*filepath", "inner")
            .unwrap();

        let m = router
            .dispatch(&Method::GET, "/static/vendor/lib.js")
            .unwrap();
        assert_eq!(*m.handler, "inner");
        assert_eq!(m.capture, Some("/lib.js"));

        let m = router.dispatch(&Method::GET, "/static/app.js").unwrap();
        assert_eq!(*m.handler, "outer");
        assert_eq!(m.capture, Some("/app.js"));
    }

    #[test]
    fn test_route_not_found() {
        let router = make_router();
        assert_eq!(
            router.dispatch(&Method::GET, "/unknown/path").unwrap_err(),
            DispatchError::RouteNotFound
        );
    }

    #[test]
    fn test_method_not_allowed() {
        let router = make_router();
        assert_eq!(
            router.dispatch(&Method::POST, "/api/search").unwrap_err(),
            DispatchError::MethodNotAllowed
        );
        assert_eq!(
            router.dispatch(&Method::POST, "/js/app.js").unwrap_err(),
            DispatchError::MethodNotAllowed
        );
    }

    #[test]
    fn test_conflicting_literal_rejected() {
        let mut router = make_router();
        let err = router
            .register(Method::GET, "/api/search", "duplicate")
            .unwrap_err();
        assert!(matches!(err, RouterError::ConflictingRoute { .. }));

        // Same pattern under another method is fine
        router
            .register(Method::POST, "/api/search", "post-api")
            .unwrap();
    }

    #[test]
    fn test_conflicting_wildcard_rejected() {
        let mut router = make_router();
        let err = router
            .register(Method::GET, "/js/*anything", "duplicate-mount")
            .unwrap_err();
        assert!(matches!(err, RouterError::ConflictingRoute { .. }));
    }

    #[test]
    fn test_invalid_pattern_rejected() {
        let mut router: Router<&'static str> = Router::new();
        let err = router
            .register(Method::GET, "no-slash", "handler")
            .unwrap_err();
        assert!(matches!(err, RouterError::InvalidPattern { .. }));
    }
}
