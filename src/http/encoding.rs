//! Transport compression module
//!
//! Implements gzip content negotiation: parsing of the client's
//! `Accept-Encoding` header and gzip encoding of response bodies.

use flate2::write::GzEncoder;
use flate2::Compression;
use std::io::{self, Write};

/// Check whether an `Accept-Encoding` header value advertises gzip support
///
/// Accepts a token list such as `gzip, deflate, br` or `gzip;q=0.8`.
/// A `q=0` qvalue explicitly refuses the encoding.
pub fn accepts_gzip(accept_encoding: Option<&str>) -> bool {
    let Some(value) = accept_encoding else {
        return false;
    };

    value.split(',').any(|entry| {
        let mut parts = entry.split(';');
        let token = parts.next().unwrap_or("").trim();
        if !token.eq_ignore_ascii_case("gzip") {
            return false;
        }

        // Check for an explicit q=0 refusal
        for param in parts {
            let param = param.trim();
            if let Some(q) = param
                .strip_prefix("q=")
                .or_else(|| param.strip_prefix("Q="))
            {
                return q.trim().parse::<f32>().map_or(true, |q| q > 0.0);
            }
        }
        true
    })
}

/// Compress a body with gzip at the default compression level
pub fn gzip_encode(data: &[u8]) -> io::Result<Vec<u8>> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data)?;
    encoder.finish()
}
