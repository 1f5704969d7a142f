//! Request handler module
//!
//! Entry point for HTTP request processing: builds the request context,
//! dispatches through the routing table and invokes the composed handler.
//! Also owns the startup construction of the routing table itself.

pub mod static_files;

use crate::config::Config;
use crate::http::{self, encoding};
use crate::logger::{self, AccessLogEntry};
use crate::middleware::{
    compose, ComposedHandler, GzipNegotiator, HostRedirect, Middleware, RedirectMisconfiguration,
};
use crate::routing::{DispatchError, Router, RouterError};
use crate::search::{SearchRequest, SearchService};
use http_body_util::Full;
use hyper::body::{Bytes, Incoming};
use hyper::header::{ACCEPT_ENCODING, HOST, REFERER, USER_AGENT};
use hyper::{Method, Request, Response};
use static_files::StaticMount;
use std::convert::Infallible;
use std::fmt;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

/// Request context encapsulating the information handlers need
pub struct RequestContext<'a> {
    pub method: &'a Method,
    pub path: &'a str,
    /// Raw query string, without the leading `?`
    pub query: Option<&'a str>,
    /// Host header value, port suffix included
    pub host: Option<&'a str>,
    pub accepts_gzip: bool,
    pub access_log: bool,
}

/// Terminal handlers bound to routes
pub enum Handler {
    /// HTML search page, delegated to the search collaborator
    SearchPage(Arc<dyn SearchService>),
    /// JSON search API, delegated to the search collaborator
    SearchApi(Arc<dyn SearchService>),
    /// Wildcard static mount
    StaticDir(StaticMount),
    /// Single whitelisted static file
    StaticFile(PathBuf),
}

impl Handler {
    /// Produce the response for a matched request
    pub async fn handle(&self, ctx: &RequestContext<'_>, capture: Option<&str>) -> Response<Bytes> {
        match self {
            Self::SearchPage(service) => service.search_page(&search_request(ctx)),
            Self::SearchApi(service) => service.search_api(&search_request(ctx)),
            Self::StaticDir(mount) => {
                static_files::serve_mount(mount, capture.unwrap_or(""), ctx.accepts_gzip).await
            }
            Self::StaticFile(path) => static_files::serve_file(path).await,
        }
    }
}

const fn search_request<'a>(ctx: &RequestContext<'a>) -> SearchRequest<'a> {
    SearchRequest {
        method: ctx.method,
        path: ctx.path,
        query: ctx.query,
    }
}

/// Process-wide read-only state: configuration plus the routing table,
/// built before the first request and never mutated afterwards
pub struct AppState {
    pub config: Config,
    pub routes: Router<ComposedHandler>,
    access_log: bool,
}

impl AppState {
    pub fn new(config: Config, routes: Router<ComposedHandler>) -> Self {
        let access_log = config.logging.access_log;
        Self {
            config,
            routes,
            access_log,
        }
    }
}

/// Startup-time route construction failures
#[derive(Debug)]
pub enum SetupError {
    Route(RouterError),
    Redirect(RedirectMisconfiguration),
}

impl fmt::Display for SetupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Route(e) => write!(f, "route table: {e}"),
            Self::Redirect(e) => write!(f, "redirect: {e}"),
        }
    }
}

impl std::error::Error for SetupError {}

impl From<RouterError> for SetupError {
    fn from(e: RouterError) -> Self {
        Self::Route(e)
    }
}

impl From<RedirectMisconfiguration> for SetupError {
    fn from(e: RedirectMisconfiguration) -> Self {
        Self::Redirect(e)
    }
}

/// Build the full routing table
///
/// Dynamic pages share the gzip + host-redirect chain; static routes carry
/// the host redirect only, with compression decided per mount. The table is
/// fixed here, at startup, and never changes afterwards.
pub fn build_routes(
    config: &Config,
    search: Arc<dyn SearchService>,
) -> Result<Router<ComposedHandler>, SetupError> {
    let redirect = HostRedirect::new(
        config.redirect.canonical_hosts.clone(),
        config.redirect.target.clone(),
    )?;

    let common = vec![
        Middleware::Gzip(GzipNegotiator),
        Middleware::HostRedirect(redirect.clone()),
    ];
    let static_chain = vec![Middleware::HostRedirect(redirect)];
    let static_root = config.static_root();

    let mut router = Router::new();

    // Main HTML search route
    router.register(
        Method::GET,
        "/",
        compose(common.clone(), Handler::SearchPage(Arc::clone(&search))),
    )?;

    // Main JSON search route
    router.register(
        Method::GET,
        "/api/search",
        compose(common, Handler::SearchApi(search)),
    )?;

    // Static asset directories
    for (name, gzip) in [("js", true), ("css", true), ("img", false)] {
        let mount = StaticMount::new(name, static_root.join(name), gzip);
        router.register(
            Method::GET,
            &format!("/{name}/*filepath"),
            compose(static_chain.clone(), Handler::StaticDir(mount)),
        )?;
    }

    // Whitelist of allowed static files in the root directory
    for file in ["favicon.ico", "apple-touch-icon-precomposed.png"] {
        router.register(
            Method::GET,
            &format!("/{file}"),
            compose(static_chain.clone(), Handler::StaticFile(static_root.join(file))),
        )?;
    }

    Ok(router)
}

/// Main entry point for HTTP request handling
pub async fn handle_request(
    req: Request<Incoming>,
    state: Arc<AppState>,
    peer_addr: SocketAddr,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let started = Instant::now();
    let uri = req.uri();

    let ctx = RequestContext {
        method: req.method(),
        path: uri.path(),
        query: uri.query(),
        host: req.headers().get(HOST).and_then(|v| v.to_str().ok()),
        accepts_gzip: encoding::accepts_gzip(
            req.headers().get(ACCEPT_ENCODING).and_then(|v| v.to_str().ok()),
        ),
        access_log: state.access_log,
    };

    let response = match state.routes.dispatch(ctx.method, ctx.path) {
        Ok(matched) => matched.handler.invoke(&ctx, matched.capture).await,
        Err(DispatchError::MethodNotAllowed) => http::build_405_response(),
        Err(DispatchError::RouteNotFound) => http::build_404_response(),
    };

    if ctx.access_log {
        let entry = AccessLogEntry {
            remote_addr: peer_addr.ip().to_string(),
            time: chrono::Local::now(),
            method: ctx.method.to_string(),
            path: ctx.path.to_string(),
            query: ctx.query.map(ToString::to_string),
            http_version: logger::http_version_label(req.version()).to_string(),
            status: response.status().as_u16(),
            body_bytes: response.body().len(),
            referer: req
                .headers()
                .get(REFERER)
                .and_then(|v| v.to_str().ok())
                .map(ToString::to_string),
            user_agent: req
                .headers()
                .get(USER_AGENT)
                .and_then(|v| v.to_str().ok())
                .map(ToString::to_string),
            request_time_us: u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX),
        };
        logger::log_access(&entry, &state.config.logging.access_log_format);
    }

    Ok(response.map(Full::new))
}
