//! Snapshotting incoming `http` requests for verification.

use http::request::Parts;
use http::uri::PathAndQuery;

use signet_core::CanonicalRequest;

/// Snapshot the parts of an incoming request that participate in signature
/// verification: method, request target (path and query), and all received
/// header values.
///
/// Header values that are not valid UTF-8 cannot appear in a signing string
/// and are skipped.
#[must_use]
pub fn canonical_request(parts: &Parts) -> CanonicalRequest {
    let target = parts
        .uri
        .path_and_query()
        .map_or("/", PathAndQuery::as_str);
    let mut request = CanonicalRequest::new(parts.method.as_str(), target);
    for (name, value) in &parts.headers {
        if let Ok(value) = value.to_str() {
            request.append_header(name.as_str(), value);
        }
    }
    request
}

/// The raw `Authorization` header value, if the request carries one that is
/// valid UTF-8.
#[must_use]
pub fn authorization_header(parts: &Parts) -> Option<&str> {
    parts
        .headers
        .get(http::header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
}
