//! HTTP response building module
//!
//! Provides builders for the status responses used by the front-end,
//! decoupled from routing and dispatch logic.
//!
//! Bodies are plain [`Bytes`] so that middleware can still transform them;
//! the service boundary wraps the final response into a streamable body.

use hyper::body::Bytes;
use hyper::Response;

/// Build 404 Not Found response
pub fn build_404_response() -> Response<Bytes> {
    Response::builder()
        .status(404)
        .header("Content-Type", "text/plain")
        .body(Bytes::from_static(b"404 Not Found"))
        .unwrap_or_else(|e| {
            log_build_error("404", &e);
            Response::new(Bytes::from_static(b"404 Not Found"))
        })
}

/// Build 403 Forbidden response
pub fn build_403_response() -> Response<Bytes> {
    Response::builder()
        .status(403)
        .header("Content-Type", "text/plain")
        .body(Bytes::from_static(b"403 Forbidden"))
        .unwrap_or_else(|e| {
            log_build_error("403", &e);
            Response::new(Bytes::from_static(b"403 Forbidden"))
        })
}

/// Build 405 Method Not Allowed response
pub fn build_405_response() -> Response<Bytes> {
    Response::builder()
        .status(405)
        .header("Content-Type", "text/plain")
        .header("Allow", "GET")
        .body(Bytes::from_static(b"405 Method Not Allowed"))
        .unwrap_or_else(|e| {
            log_build_error("405", &e);
            Response::new(Bytes::from_static(b"405 Method Not Allowed"))
        })
}

/// Build 500 Internal Server Error response
pub fn build_500_response() -> Response<Bytes> {
    Response::builder()
        .status(500)
        .header("Content-Type", "text/plain")
        .body(Bytes::from_static(b"500 Internal Server Error"))
        .unwrap_or_else(|e| {
            log_build_error("500", &e);
            Response::new(Bytes::from_static(b"500 Internal Server Error"))
        })
}

/// Build 302 Found redirect response
pub fn build_redirect_response(target: &str) -> Response<Bytes> {
    Response::builder()
        .status(302)
        .header("Location", target)
        .header("Content-Type", "text/plain")
        .body(Bytes::from_static(b"Redirecting..."))
        .unwrap_or_else(|e| {
            log_build_error("302", &e);
            Response::new(Bytes::from_static(b"Redirecting..."))
        })
}

/// Build generic HTML response
pub fn build_html_response(content: String) -> Response<Bytes> {
    let body = Bytes::from(content);
    Response::builder()
        .status(200)
        .header("Content-Type", "text/html; charset=utf-8")
        .header("Content-Length", body.len())
        .body(body.clone())
        .unwrap_or_else(|e| {
            log_build_error("HTML", &e);
            Response::new(body)
        })
}

/// Build JSON response
pub fn build_json_response(body: Bytes) -> Response<Bytes> {
    Response::builder()
        .status(200)
        .header("Content-Type", "application/json")
        .header("Content-Length", body.len())
        .body(body.clone())
        .unwrap_or_else(|e| {
            log_build_error("JSON", &e);
            Response::new(body)
        })
}

/// Build static file response
///
/// `content_encoding` carries the transfer encoding already applied to
/// `data` (only gzip today), or `None` for a raw body.
pub fn build_file_response(
    data: Bytes,
    content_type: &'static str,
    content_encoding: Option<&'static str>,
) -> Response<Bytes> {
    let mut builder = Response::builder()
        .status(200)
        .header("Content-Type", content_type)
        .header("Content-Length", data.len());

    if let Some(encoding) = content_encoding {
        builder = builder
            .header("Content-Encoding", encoding)
            .header("Vary", "Accept-Encoding");
    }

    builder.body(data.clone()).unwrap_or_else(|e| {
        log_build_error("200", &e);
        Response::new(data)
    })
}

/// Log response build error
fn log_build_error(status: &str, error: &hyper::http::Error) {
    crate::logger::log_error(&format!("Failed to build {status} response: {error}"));
}
