//! Canonical host redirect middleware
//!
//! Requests arriving for the canonical bare domain or its `www` variant are
//! answered with a fixed `302 Found` pointing at the external landing page,
//! whatever the path. All other hosts pass through untouched.

use crate::http;
use hyper::body::Bytes;
use hyper::Response;
use std::fmt;

/// Per-request host inspection with a fixed redirect target
#[derive(Debug, Clone)]
pub struct HostRedirect {
    canonical_hosts: Vec<String>,
    target: String,
}

/// Startup validation failure: the redirect target points back into the
/// canonical host set, which would loop forever when fetched directly.
#[derive(Debug)]
pub struct RedirectMisconfiguration {
    target: String,
    host: String,
}

impl fmt::Display for RedirectMisconfiguration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "redirect target '{}' resolves to canonical host '{}', which would redirect to itself",
            self.target, self.host
        )
    }
}

impl std::error::Error for RedirectMisconfiguration {}

impl HostRedirect {
    /// Build the middleware, validating the target against the host set
    pub fn new(
        canonical_hosts: Vec<String>,
        target: String,
    ) -> Result<Self, RedirectMisconfiguration> {
        if let Some(host) = url_host(&target) {
            if canonical_hosts.iter().any(|h| h.eq_ignore_ascii_case(host)) {
                return Err(RedirectMisconfiguration {
                    host: host.to_string(),
                    target,
                });
            }
        }

        Ok(Self {
            canonical_hosts,
            target,
        })
    }

    /// Decide PASS or REDIRECT for a request's Host header
    ///
    /// Returns the redirect response when the port-stripped host is in the
    /// canonical set, `None` to pass the request through.
    pub fn check(&self, host: Option<&str>) -> Option<Response<Bytes>> {
        let host = host?;
        let bare = host.split(':').next().unwrap_or(host);
        if self
            .canonical_hosts
            .iter()
            .any(|h| h.eq_ignore_ascii_case(bare))
        {
            Some(http::build_redirect_response(&self.target))
        } else {
            None
        }
    }
}

/// Extract the host part of a URL, without scheme, userinfo, port or path
fn url_host(url: &str) -> Option<&str> {
    let rest = url.split_once("://").map_or(url, |(_, rest)| rest);
    let authority = rest.split(['/', '?', '#']).next().unwrap_or(rest);
    let host = authority.rsplit_once('@').map_or(authority, |(_, host)| host);
    let host = host.split(':').next().unwrap_or(host);
    (!host.is_empty()).then_some(host)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn canonical() -> Vec<String> {
        vec![
            "commonsearch.org".to_string(),
            "www.commonsearch.org".to_string(),
        ]
    }

    fn make_redirect() -> HostRedirect {
        HostRedirect::new(canonical(), "https://about.commonsearch.org/".to_string()).unwrap()
    }

    #[test]
    fn test_canonical_hosts_redirect() {
        let redirect = make_redirect();
        for host in ["commonsearch.org", "www.commonsearch.org"] {
            let resp = redirect.check(Some(host)).unwrap();
            assert_eq!(resp.status(), 302);
            assert_eq!(
                resp.headers().get("Location").unwrap(),
                "https://about.commonsearch.org/"
            );
        }
    }

    #[test]
    fn test_port_suffix_stripped() {
        let redirect = make_redirect();
        assert!(redirect.check(Some("commonsearch.org:8080")).is_some());
        assert!(redirect.check(Some("www.commonsearch.org:443")).is_some());
    }

    #[test]
    fn test_other_hosts_pass() {
        let redirect = make_redirect();
        assert!(redirect.check(Some("example.com")).is_none());
        assert!(redirect.check(Some("about.commonsearch.org")).is_none());
        assert!(redirect.check(None).is_none());
    }

    #[test]
    fn test_target_inside_canonical_set_rejected() {
        let err = HostRedirect::new(canonical(), "https://commonsearch.org/about".to_string())
            .unwrap_err();
        assert!(err.to_string().contains("commonsearch.org"));

        // Port on the target does not hide the loop
        assert!(
            HostRedirect::new(canonical(), "https://www.commonsearch.org:443/".to_string())
                .is_err()
        );
    }

    #[test]
    fn test_url_host_extraction() {
        assert_eq!(
            url_host("https://about.commonsearch.org/"),
            Some("about.commonsearch.org")
        );
        assert_eq!(url_host("http://example.com:8080/path"), Some("example.com"));
        assert_eq!(url_host("example.com/path"), Some("example.com"));
        assert_eq!(url_host(""), None);
    }
}
