//! Middleware module
//!
//! Ordered composition of cross-cutting wrappers around a terminal handler.
//! A chain is built once at startup and stored on its route; the link order
//! is identical for every request the route serves.
//!
//! Links run outermost-first. A link may short-circuit on entry (the host
//! redirect answering 302), in which case downstream links and the terminal
//! never run; links already entered still transform the response on the way
//! out, so the gzip link wraps whatever the inner chain produced.

mod gzip;
mod host_redirect;

pub use gzip::GzipNegotiator;
pub use host_redirect::{HostRedirect, RedirectMisconfiguration};

use crate::handler::{Handler, RequestContext};
use hyper::body::Bytes;
use hyper::Response;

/// A single cross-cutting wrapper
#[derive(Debug, Clone)]
pub enum Middleware {
    /// Response compression negotiation
    Gzip(GzipNegotiator),
    /// Canonical host redirect
    HostRedirect(HostRedirect),
}

impl Middleware {
    /// Entry phase: may short-circuit with a response
    fn enter(&self, ctx: &RequestContext<'_>) -> Option<Response<Bytes>> {
        match self {
            Self::Gzip(_) => None,
            Self::HostRedirect(redirect) => redirect.check(ctx.host),
        }
    }

    /// Exit phase: transform the response produced further in
    fn leave(&self, ctx: &RequestContext<'_>, response: Response<Bytes>) -> Response<Bytes> {
        match self {
            Self::Gzip(negotiator) => negotiator.apply(ctx.accepts_gzip, response),
            Self::HostRedirect(_) => response,
        }
    }
}

/// Ordered middleware links shared by a route
#[derive(Debug, Clone, Default)]
pub struct MiddlewareChain {
    links: Vec<Middleware>,
}

impl MiddlewareChain {
    /// Run entry phases in order; returns how many links were entered and
    /// the short-circuit response, if any link produced one.
    fn enter_all(&self, ctx: &RequestContext<'_>) -> (usize, Option<Response<Bytes>>) {
        for (entered, link) in self.links.iter().enumerate() {
            if let Some(response) = link.enter(ctx) {
                return (entered, Some(response));
            }
        }
        (self.links.len(), None)
    }

    /// Unwind exit phases of the links that were entered, innermost-first
    fn leave_entered(
        &self,
        entered: usize,
        ctx: &RequestContext<'_>,
        mut response: Response<Bytes>,
    ) -> Response<Bytes> {
        for link in self.links[..entered].iter().rev() {
            response = link.leave(ctx, response);
        }
        response
    }
}

/// A terminal handler with its middleware chain applied, bound to a route
/// at startup and immutable afterwards
pub struct ComposedHandler {
    chain: MiddlewareChain,
    terminal: Handler,
}

impl std::fmt::Debug for ComposedHandler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ComposedHandler")
            .field("chain", &self.chain)
            .finish_non_exhaustive()
    }
}

impl ComposedHandler {
    /// Run the chain around the terminal handler for one request
    pub async fn invoke(&self, ctx: &RequestContext<'_>, capture: Option<&str>) -> Response<Bytes> {
        let (entered, short_circuit) = self.chain.enter_all(ctx);
        let response = match short_circuit {
            Some(response) => response,
            None => self.terminal.handle(ctx, capture).await,
        };
        self.chain.leave_entered(entered, ctx, response)
    }
}

/// Compose a middleware chain around a terminal handler
pub fn compose(links: Vec<Middleware>, terminal: Handler) -> ComposedHandler {
    ComposedHandler {
        chain: MiddlewareChain { links },
        terminal,
    }
}
