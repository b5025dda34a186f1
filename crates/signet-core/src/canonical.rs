//! Canonical signing-string construction.
//!
//! The signing string is rebuilt from the request line and the covered header
//! list, one line per covered name:
//!
//! ```text
//! (request-target): post /foo?param=value
//! host: example.com
//! date: Tue, 07 Jun 2014 20:51:35 GMT
//! ```
//!
//! Lines are joined with a single `\n` and there is no trailing newline. The
//! result must be byte-identical to what the signer produced; header values
//! are therefore used exactly as received, with no trimming or whitespace
//! normalization.

use std::collections::BTreeMap;

use crate::error::BuildError;

/// Pseudo-header covering the request method and target.
pub const REQUEST_TARGET: &str = "(request-target)";

/// Immutable snapshot of the parts of a request that participate in
/// signature verification.
///
/// Header names are stored lowercased; a header may carry several values, in
/// the order they were received. The snapshot must reflect exactly what the
/// transport layer saw.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanonicalRequest {
    method: String,
    target: String,
    headers: BTreeMap<String, Vec<String>>,
}

impl CanonicalRequest {
    /// Create a snapshot from a method and a request target (path plus query).
    pub fn new(method: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            target: target.into(),
            headers: BTreeMap::new(),
        }
    }

    /// Builder-style variant of [`append_header`](Self::append_header).
    #[must_use]
    pub fn with_header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.append_header(name, value);
        self
    }

    /// Record one received header value. Repeated names accumulate values in
    /// call order.
    pub fn append_header(&mut self, name: &str, value: impl Into<String>) {
        self.headers
            .entry(name.to_ascii_lowercase())
            .or_default()
            .push(value.into());
    }

    /// The request method as received.
    #[must_use]
    pub fn method(&self) -> &str {
        &self.method
    }

    /// The request target (path and query) as received.
    #[must_use]
    pub fn target(&self) -> &str {
        &self.target
    }

    /// All received values for a header, looked up case-insensitively.
    #[must_use]
    pub fn header_values(&self, name: &str) -> Option<&[String]> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(Vec::as_slice)
    }
}

/// Build the canonical signing string for `request` over `covered` headers.
///
/// For each covered name, in order: the `(request-target)` pseudo-header
/// emits `(request-target): {lowercased method} {target}`; any other name is
/// looked up case-insensitively and emits `{name}: {values}` with repeated
/// values joined by `", "` in received order.
///
/// Deterministic and pure: identical inputs produce byte-identical output.
///
/// # Errors
///
/// Returns [`BuildError::MissingCoveredHeader`] when a covered header is
/// absent from the request. A header the signer claims to have signed must
/// never be skipped.
pub fn build_signing_string(
    request: &CanonicalRequest,
    covered: &[String],
) -> Result<String, BuildError> {
    let mut lines = Vec::with_capacity(covered.len());

    for name in covered {
        let name = name.to_ascii_lowercase();
        if name == REQUEST_TARGET {
            lines.push(format!(
                "{REQUEST_TARGET}: {} {}",
                request.method.to_ascii_lowercase(),
                request.target
            ));
        } else {
            let values = request
                .headers
                .get(&name)
                .ok_or_else(|| BuildError::MissingCoveredHeader(name.clone()))?;
            lines.push(format!("{name}: {}", values.join(", ")));
        }
    }

    Ok(lines.join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn covered(names: &[&str]) -> Vec<String> {
        names.iter().map(|&n| n.to_owned()).collect()
    }

    fn example_request() -> CanonicalRequest {
        CanonicalRequest::new("POST", "/foo?param=value")
            .with_header("Date", "Tue, 07 Jun 2014 20:51:35 GMT")
            .with_header("Host", "example.com")
    }

    #[test]
    fn test_should_build_example_signing_string() {
        let signing_string = build_signing_string(
            &example_request(),
            &covered(&["(request-target)", "host", "date"]),
        )
        .unwrap();
        assert_eq!(
            signing_string,
            "(request-target): post /foo?param=value\n\
             host: example.com\n\
             date: Tue, 07 Jun 2014 20:51:35 GMT"
        );
    }

    #[test]
    fn test_should_lowercase_method_in_request_target_line() {
        let request = CanonicalRequest::new("GET", "/");
        let signing_string =
            build_signing_string(&request, &covered(&["(request-target)"])).unwrap();
        assert_eq!(signing_string, "(request-target): get /");
    }

    #[test]
    fn test_should_join_repeated_header_values_in_received_order() {
        let request = CanonicalRequest::new("GET", "/")
            .with_header("X-Forwarded-For", "10.0.0.1")
            .with_header("X-Forwarded-For", "10.0.0.2");
        let signing_string =
            build_signing_string(&request, &covered(&["x-forwarded-for"])).unwrap();
        assert_eq!(signing_string, "x-forwarded-for: 10.0.0.1, 10.0.0.2");
    }

    #[test]
    fn test_should_fail_on_missing_covered_header() {
        let err = build_signing_string(&example_request(), &covered(&["date", "digest"]))
            .unwrap_err();
        assert!(matches!(err, BuildError::MissingCoveredHeader(name) if name == "digest"));
    }

    #[test]
    fn test_should_look_up_covered_names_case_insensitively() {
        let signing_string =
            build_signing_string(&example_request(), &covered(&["Host"])).unwrap();
        assert_eq!(signing_string, "host: example.com");
    }

    #[test]
    fn test_should_preserve_header_values_exactly() {
        let request = CanonicalRequest::new("GET", "/").with_header("x-note", "  spaced   out ");
        let signing_string = build_signing_string(&request, &covered(&["x-note"])).unwrap();
        assert_eq!(signing_string, "x-note:   spaced   out ");
    }

    #[test]
    fn test_should_emit_no_trailing_newline() {
        let signing_string =
            build_signing_string(&example_request(), &covered(&["host", "date"])).unwrap();
        assert!(!signing_string.ends_with('\n'));
        assert_eq!(signing_string.matches('\n').count(), 1);
    }

    #[test]
    fn test_should_be_deterministic() {
        let names = covered(&["(request-target)", "host", "date"]);
        let first = build_signing_string(&example_request(), &names).unwrap();
        let second = build_signing_string(&example_request(), &names).unwrap();
        assert_eq!(first.as_bytes(), second.as_bytes());
    }
}
