//! Search collaborator module
//!
//! The page renderer and the JSON search API are external capabilities as
//! far as routing is concerned: they sit behind [`SearchService`] and
//! receive the method, path and raw query of a matched request, after
//! middleware has run. [`SearchApp`] is the built-in front-end shell bound
//! to that seam; result retrieval happens behind it.

use crate::http::response;
use crate::logger;
use hyper::body::Bytes;
use hyper::{Method, Response};
use serde::Serialize;

/// The slice of a matched request handed to the search handlers
#[derive(Debug, Clone, Copy)]
pub struct SearchRequest<'a> {
    pub method: &'a Method,
    pub path: &'a str,
    /// Raw query string, without the leading `?`
    pub query: Option<&'a str>,
}

impl<'a> SearchRequest<'a> {
    /// Look up a query parameter by name
    pub fn param(&self, name: &str) -> Option<&'a str> {
        self.query?.split('&').find_map(|pair| {
            let (key, value) = pair.split_once('=')?;
            (key == name).then_some(value)
        })
    }
}

/// External search handler contract
///
/// Invoked only on exact-literal match of `/` (page) and `/api/search`
/// (API); each call produces a complete response.
pub trait SearchService: Send + Sync {
    /// Render the HTML search page
    fn search_page(&self, req: &SearchRequest<'_>) -> Response<Bytes>;

    /// Answer the JSON search API
    fn search_api(&self, req: &SearchRequest<'_>) -> Response<Bytes>;
}

/// JSON envelope returned by the search API
#[derive(Debug, Serialize)]
struct ApiResponse<'a> {
    q: &'a str,
    hits: Vec<serde_json::Value>,
}

/// Built-in front-end shell
#[derive(Debug, Default)]
pub struct SearchApp;

impl SearchApp {
    pub const fn new() -> Self {
        Self
    }
}

impl SearchService for SearchApp {
    fn search_page(&self, req: &SearchRequest<'_>) -> Response<Bytes> {
        let q = req.param("q").unwrap_or("");
        response::build_html_response(render_page(q))
    }

    fn search_api(&self, req: &SearchRequest<'_>) -> Response<Bytes> {
        let envelope = ApiResponse {
            q: req.param("q").unwrap_or(""),
            hits: Vec::new(),
        };

        match serde_json::to_vec(&envelope) {
            Ok(body) => response::build_json_response(Bytes::from(body)),
            Err(e) => {
                logger::log_error(&format!("Failed to serialize API response: {e}"));
                crate::http::build_500_response()
            }
        }
    }
}

/// Render the search page shell referencing the static asset mounts
fn render_page(query: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1">
    <title>Common Search</title>
    <link rel="icon" type="image/x-icon" href="/favicon.ico">
    <link rel="stylesheet" href="/css/index.css">
</head>
<body>
    <div id="app">
        <form id="search" action="/" method="get">
            <input type="search" name="q" value="{}" autofocus>
            <button type="submit">Search</button>
        </form>
        <div id="results"></div>
    </div>
    <script src="/js/index.js"></script>
</body>
</html>"#,
        escape_html(query)
    )
}

/// Escape text interpolated into HTML attribute values
fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
