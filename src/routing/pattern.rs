//! Route pattern module
//!
//! Parses and matches registered path patterns. A pattern is either an exact
//! literal path or a prefix ending in a trailing `*name` capture marker, e.g.
//! `/js/*filepath`. The capture spans the remainder of the request path,
//! leading separator included.

use std::fmt;

/// A parsed route pattern
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoutePattern {
    /// Exact path match, e.g. `/api/search`
    Literal(String),
    /// Prefix match with a trailing capture, e.g. `/js/*filepath`
    Wildcard {
        /// Path prefix without the trailing slash, e.g. `/js`
        prefix: String,
        /// Name of the capture parameter, e.g. `filepath`
        param: String,
    },
}

/// Pattern parse failure reasons
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatternError {
    /// Pattern is empty or does not start with `/`
    MissingLeadingSlash,
    /// A `*` appears anywhere but as the whole last segment
    WildcardNotTrailing,
    /// The capture marker has no name after the `*`
    EmptyCaptureName,
}

impl fmt::Display for PatternError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingLeadingSlash => write!(f, "pattern must start with '/'"),
            Self::WildcardNotTrailing => {
                write!(f, "wildcard must occupy the entire last segment")
            }
            Self::EmptyCaptureName => write!(f, "wildcard capture must be named"),
        }
    }
}

impl RoutePattern {
    /// Parse a pattern string
    pub fn parse(pattern: &str) -> Result<Self, PatternError> {
        if !pattern.starts_with('/') {
            return Err(PatternError::MissingLeadingSlash);
        }

        let Some(star) = pattern.find('*') else {
            return Ok(Self::Literal(pattern.to_string()));
        };

        // The marker must be the whole last segment: "/js/*filepath"
        if pattern.as_bytes()[star - 1] != b'/' {
            return Err(PatternError::WildcardNotTrailing);
        }
        let param = &pattern[star + 1..];
        if param.is_empty() {
            return Err(PatternError::EmptyCaptureName);
        }
        if param.contains(['/', '*']) {
            return Err(PatternError::WildcardNotTrailing);
        }

        Ok(Self::Wildcard {
            prefix: pattern[..star - 1].to_string(),
            param: param.to_string(),
        })
    }

    /// Match a request path against this pattern
    ///
    /// Returns `None` on mismatch. On match, the inner option carries the
    /// wildcard capture (including its leading separator); literal patterns
    /// capture nothing.
    pub fn matches<'p>(&self, path: &'p str) -> Option<Option<&'p str>> {
        match self {
            Self::Literal(literal) => (path == literal).then_some(None),
            Self::Wildcard { prefix, .. } => {
                let rest = path.strip_prefix(prefix.as_str())?;
                rest.starts_with('/').then_some(Some(rest))
            }
        }
    }

    /// Check whether two patterns collide when registered under one method
    ///
    /// Duplicate literals collide, and wildcard mounts sharing the same
    /// prefix collide. A literal under a wildcard prefix is allowed: exact
    /// matches always win at dispatch time.
    pub fn conflicts_with(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Literal(a), Self::Literal(b)) => a == b,
            (Self::Wildcard { prefix: a, .. }, Self::Wildcard { prefix: b, .. }) => a == b,
            _ => false,
        }
    }

    /// Prefix length used to rank wildcard candidates (longest wins)
    pub fn wildcard_prefix_len(&self) -> Option<usize> {
        match self {
            Self::Literal(_) => None,
            Self::Wildcard { prefix, .. } => Some(prefix.len()),
        }
    }
}

impl fmt::Display for RoutePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Literal(literal) => write!(f, "{literal}"),
            Self::Wildcard { prefix, param } => write!(f, "{prefix}/*{param}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_literal() {
        let pattern = RoutePattern::parse("/api/search").unwrap();
        assert_eq!(pattern, RoutePattern::Literal("/api/search".to_string()));
    }

    #[test]
    fn test_parse_wildcard() {
        let pattern = RoutePattern::parse("/js/*filepath").unwrap();
        assert_eq!(
            pattern,
            RoutePattern::Wildcard {
                prefix: "/js".to_string(),
                param: "filepath".to_string(),
            }
        );
    }

    #[test]
    fn test_parse_root_wildcard() {
        let pattern = RoutePattern::parse("/*filepath").unwrap();
        assert_eq!(
            pattern,
            RoutePattern::Wildcard {
                prefix: String::new(),
                param: "filepath".to_string(),
            }
        );
    }

    #[test]
    fn test_parse_rejects_malformed() {
        assert_eq!(
            RoutePattern::parse("js/app.js"),
            Err(PatternError::MissingLeadingSlash)
        );
        assert_eq!(RoutePattern::parse(""), Err(PatternError::MissingLeadingSlash));
        assert_eq!(
            RoutePattern::parse("/js*filepath"),
            Err(PatternError::WildcardNotTrailing)
        );
        assert_eq!(
            RoutePattern::parse("/js/*file/path"),
            Err(PatternError::WildcardNotTrailing)
        );
        assert_eq!(
            RoutePattern::parse("/js/*"),
            Err(PatternError::EmptyCaptureName)
        );
    }

    #[test]
    fn test_literal_match() {
        let pattern = RoutePattern::parse("/favicon.ico").unwrap();
        assert_eq!(pattern.matches("/favicon.ico"), Some(None));
        assert_eq!(pattern.matches("/favicon.ico/"), None);
        assert_eq!(pattern.matches("/favicon"), None);
    }

    #[test]
    fn test_wildcard_capture_keeps_separator() {
        let pattern = RoutePattern::parse("/js/*filepath").unwrap();
        assert_eq!(pattern.matches("/js/app.js"), Some(Some("/app.js")));
        assert_eq!(
            pattern.matches("/js/vendor/lib.min.js"),
            Some(Some("/vendor/lib.min.js"))
        );
        // The bare prefix itself is not a wildcard match
        assert_eq!(pattern.matches("/js"), None);
        assert_eq!(pattern.matches("/jsx/app.js"), None);
    }

    #[test]
    fn test_conflicts() {
        let js = RoutePattern::parse("/js/*filepath").unwrap();
        let js_again = RoutePattern::parse("/js/*anything").unwrap();
        let css = RoutePattern::parse("/css/*filepath").unwrap();
        let literal = RoutePattern::parse("/js/app.js").unwrap();

        assert!(js.conflicts_with(&js_again));
        assert!(!js.conflicts_with(&css));
        // Exact literal under a wildcard prefix wins at dispatch, no conflict
        assert!(!js.conflicts_with(&literal));
        assert!(literal.conflicts_with(&RoutePattern::parse("/js/app.js").unwrap()));
    }
}
