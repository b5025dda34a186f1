//! Signature verification orchestration.
//!
//! [`SignatureVerifier`] composes the header parser, key resolver, signing
//! string builder, and algorithm registry into a single pass over one
//! request. Every step short-circuits on the first failure; there are no
//! retries, since verification is a pure function of its inputs and a second
//! attempt on the same inputs cannot succeed where the first failed.

use std::sync::Arc;

use base64::Engine;
use tracing::debug;

use crate::algorithm::AlgorithmRegistry;
use crate::canonical::{CanonicalRequest, build_signing_string};
use crate::error::{BuildError, ResolveError};
use crate::keys::KeyResolver;
use crate::params::{BASE64, parse_signature_header};

/// The result of verifying one request.
///
/// Single-use value: constructed per call, never persisted. Callers translate
/// it to transport-level behavior; the verifier itself formats no responses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VerificationOutcome {
    /// The signature matches the request content.
    Verified,
    /// The request is well-formed and the key resolved, but the
    /// cryptographic check failed.
    SignatureMismatch,
    /// No `Authorization` header was supplied.
    MissingHeader,
    /// The `Authorization` header could not be parsed; the detail names the
    /// syntax problem or missing parameter.
    MalformedHeader(String),
    /// No key is registered for the request's `keyId`.
    UnknownKeyId(String),
    /// The algorithm is not supported, the key may not be used with it, or
    /// the check could not run; the detail describes which.
    UnsupportedAlgorithm(String),
    /// A header the signer claims to have covered is absent from the request.
    MissingCoveredHeader(String),
}

impl VerificationOutcome {
    /// Whether the request's signature checked out.
    #[must_use]
    pub fn is_verified(&self) -> bool {
        matches!(self, Self::Verified)
    }
}

impl std::fmt::Display for VerificationOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Verified => f.write_str("signature verified"),
            Self::SignatureMismatch => f.write_str("signature does not match"),
            Self::MissingHeader => f.write_str("missing authorization header"),
            Self::MalformedHeader(detail) => {
                write!(f, "malformed authorization header: {detail}")
            }
            Self::UnknownKeyId(key_id) => write!(f, "unknown key id `{key_id}`"),
            Self::UnsupportedAlgorithm(detail) => {
                write!(f, "unsupported algorithm: {detail}")
            }
            Self::MissingCoveredHeader(name) => {
                write!(f, "covered header `{name}` is missing from the request")
            }
        }
    }
}

/// Verifies signed HTTP requests against a key store.
///
/// Stateless across calls: safe to share between any number of concurrent
/// request handlers as long as the resolver's backing store supports
/// concurrent reads.
pub struct SignatureVerifier {
    resolver: Arc<dyn KeyResolver>,
    registry: AlgorithmRegistry,
}

impl std::fmt::Debug for SignatureVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SignatureVerifier")
            .field("registry", &self.registry)
            .finish_non_exhaustive()
    }
}

impl SignatureVerifier {
    /// Create a verifier over `resolver` with the built-in algorithms.
    #[must_use]
    pub fn new(resolver: Arc<dyn KeyResolver>) -> Self {
        Self::with_registry(resolver, AlgorithmRegistry::with_default_algorithms())
    }

    /// Create a verifier with a custom algorithm registry.
    #[must_use]
    pub fn with_registry(resolver: Arc<dyn KeyResolver>, registry: AlgorithmRegistry) -> Self {
        Self { resolver, registry }
    }

    /// Verify the signature carried by `authorization` against `request`.
    ///
    /// `authorization` is the raw value of the request's `Authorization`
    /// header, or `None` when the request carried none.
    #[must_use]
    pub fn verify(
        &self,
        request: &CanonicalRequest,
        authorization: Option<&str>,
    ) -> VerificationOutcome {
        let Some(raw) = authorization else {
            debug!("request carries no authorization header");
            return VerificationOutcome::MissingHeader;
        };

        let params = match parse_signature_header(raw) {
            Ok(params) => params,
            Err(error) => {
                debug!(%error, "rejecting malformed signature header");
                return VerificationOutcome::MalformedHeader(error.to_string());
            }
        };

        let key = match self.resolver.resolve(&params.key_id, &params.algorithm) {
            Ok(key) => key,
            Err(ResolveError::UnknownKeyId(key_id)) => {
                debug!(key_id = %key_id, "no key registered");
                return VerificationOutcome::UnknownKeyId(key_id);
            }
            Err(error @ ResolveError::UnsupportedAlgorithm { .. }) => {
                debug!(%error, "key incompatible with requested algorithm");
                return VerificationOutcome::UnsupportedAlgorithm(error.to_string());
            }
        };

        let signing_string = match build_signing_string(request, &params.headers) {
            Ok(signing_string) => signing_string,
            Err(BuildError::MissingCoveredHeader(name)) => {
                debug!(header = %name, "covered header absent from request");
                return VerificationOutcome::MissingCoveredHeader(name);
            }
        };

        // Already validated during parsing; a decode failure here would mean
        // the params were constructed outside the parser.
        let signature = match BASE64.decode(&params.signature) {
            Ok(signature) => signature,
            Err(error) => {
                return VerificationOutcome::MalformedHeader(format!(
                    "signature is not valid base64: {error}"
                ));
            }
        };

        match self.registry.verify(
            &params.algorithm,
            &key,
            signing_string.as_bytes(),
            &signature,
        ) {
            Ok(true) => {
                debug!(key_id = %params.key_id, algorithm = %params.algorithm, "signature verified");
                VerificationOutcome::Verified
            }
            Ok(false) => {
                debug!(key_id = %params.key_id, algorithm = %params.algorithm, "signature mismatch");
                VerificationOutcome::SignatureMismatch
            }
            Err(error) => {
                debug!(%error, "signature check could not run");
                VerificationOutcome::UnsupportedAlgorithm(error.to_string())
            }
        }
    }
}
