//! Routing module
//!
//! Provides the request routing table:
//! - Pattern parsing (exact literal or trailing wildcard capture)
//! - Registration with startup-time conflict detection
//! - Per-request dispatch with exact-over-wildcard precedence

mod pattern;
mod router;

pub use pattern::{PatternError, RoutePattern};
pub use router::{DispatchError, RouteMatch, Router, RouterError};
