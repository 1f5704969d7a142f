//! Gzip response middleware
//!
//! Compresses successful response bodies for clients that advertise gzip
//! support. Redirects, error statuses, empty bodies and bodies that already
//! carry a `Content-Encoding` are left alone.

use crate::http::encoding;
use crate::logger;
use hyper::body::Bytes;
use hyper::header::{HeaderValue, CONTENT_ENCODING, CONTENT_LENGTH, VARY};
use hyper::{Response, StatusCode};

/// Response-side gzip negotiation
#[derive(Debug, Clone, Copy, Default)]
pub struct GzipNegotiator;

impl GzipNegotiator {
    /// Compress the response body when the client accepts gzip
    pub fn apply(self, accepts_gzip: bool, response: Response<Bytes>) -> Response<Bytes> {
        if !accepts_gzip
            || response.status() != StatusCode::OK
            || response.headers().contains_key(CONTENT_ENCODING)
        {
            return response;
        }

        let (mut parts, body) = response.into_parts();
        if body.is_empty() {
            return Response::from_parts(parts, body);
        }

        match encoding::gzip_encode(&body) {
            Ok(compressed) => {
                parts
                    .headers
                    .insert(CONTENT_ENCODING, HeaderValue::from_static("gzip"));
                parts
                    .headers
                    .insert(CONTENT_LENGTH, HeaderValue::from(compressed.len()));
                parts
                    .headers
                    .insert(VARY, HeaderValue::from_static("Accept-Encoding"));
                Response::from_parts(parts, Bytes::from(compressed))
            }
            Err(e) => {
                // Encoder failure falls back to the raw body
                logger::log_error(&format!("gzip encoding failed: {e}"));
                Response::from_parts(parts, body)
            }
        }
    }
}
