//! Error types for signature verification.
//!
//! Each stage of verification has its own error enum so that callers can tell
//! exactly where a request was rejected. All expected failure modes are
//! explicit result values; none of the verification paths panic.

/// Errors from parsing an `Authorization: Signature ...` header value.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    /// The authorization scheme is not `Signature`.
    #[error("unsupported authorization scheme `{0}`")]
    UnknownScheme(String),

    /// The parameter list does not follow the `name="value"` syntax.
    #[error("invalid signature header syntax: {0}")]
    Syntax(String),

    /// A mandatory parameter (`keyId`, `algorithm`, or `signature`) is absent.
    #[error("missing required parameter `{0}`")]
    MissingParameter(&'static str),

    /// A mandatory parameter is present but empty.
    #[error("parameter `{0}` must not be empty")]
    EmptyParameter(&'static str),

    /// The `headers` parameter contains no header names.
    #[error("`headers` parameter must name at least one header")]
    EmptyHeaderList,

    /// The `signature` parameter is not valid standard-alphabet base64.
    #[error("signature is not valid base64: {0}")]
    InvalidBase64(#[from] base64::DecodeError),
}

/// Errors from resolving a `keyId` to key material.
#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    /// No key is registered under the requested key id.
    #[error("no key registered for key id `{0}`")]
    UnknownKeyId(String),

    /// The key exists but may not be used with the requested algorithm.
    #[error("key `{key_id}` cannot be used with algorithm `{algorithm}`")]
    UnsupportedAlgorithm {
        /// The key id that was resolved.
        key_id: String,
        /// The algorithm token the caller requested.
        algorithm: String,
    },
}

/// Errors from building the canonical signing string.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    /// A header the signer claims to have covered is absent from the request.
    ///
    /// This must fail verification outright: silently skipping the header
    /// would let an attacker strip a signed header undetected.
    #[error("covered header `{0}` is missing from the request")]
    MissingCoveredHeader(String),
}

/// Errors from the algorithm registry.
///
/// These all mean the cryptographic check could not run. An evaluated
/// mismatch is reported as `Ok(false)` by the registry, never as an error.
#[derive(Debug, thiserror::Error)]
pub enum AlgorithmError {
    /// No verification routine is registered for the algorithm token.
    #[error("unsupported signature algorithm `{0}`")]
    UnsupportedAlgorithm(String),

    /// The resolved key's type does not fit the algorithm, e.g. a shared
    /// secret supplied to an asymmetric scheme.
    #[error("algorithm `{algorithm}` requires a {expected}")]
    KeyTypeMismatch {
        /// The algorithm token being evaluated.
        algorithm: &'static str,
        /// Human-readable description of the required key type.
        expected: &'static str,
    },

    /// The key material could not be decoded for the algorithm.
    #[error("invalid key material: {0}")]
    InvalidKey(String),
}
