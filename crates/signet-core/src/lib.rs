//! Verification of signed HTTP messages.
//!
//! This crate verifies cryptographic request signatures carried in an
//! `Authorization: Signature ...` header: it parses the signature parameters,
//! deterministically rebuilds the canonical signing string from the request
//! line and the covered header list, resolves the key named by `keyId`, and
//! performs the cryptographic comparison. The answer is a single
//! [`VerificationOutcome`] per request.
//!
//! # Overview
//!
//! Verification is a pure, synchronous, single-pass computation: no I/O, no
//! shared mutable state, no retries. A [`SignatureVerifier`] can be shared
//! freely across concurrent request handlers; the only concurrency
//! requirement is that the [`KeyResolver`] backing store supports concurrent
//! reads.
//!
//! # Usage
//!
//! ```rust
//! use std::sync::Arc;
//! use signet_core::{
//!     CanonicalRequest, KeyMaterial, ResolvedKey, SignatureVerifier, StaticKeyResolver,
//!     VerificationOutcome,
//! };
//!
//! let resolver = StaticKeyResolver::new();
//! resolver.insert(
//!     "service-a",
//!     ResolvedKey::new(KeyMaterial::SharedSecret(b"secret".to_vec()), ["hmac-sha256"]),
//! );
//! let verifier = SignatureVerifier::new(Arc::new(resolver));
//!
//! let request = CanonicalRequest::new("GET", "/status")
//!     .with_header("date", "Tue, 07 Jun 2014 20:51:35 GMT");
//! let authorization = "Signature keyId=\"service-a\",algorithm=\"hmac-sha256\",\
//!     signature=\"c2lnbmF0dXJl\"";
//!
//! // The signature bytes do not match, so the outcome is a mismatch.
//! let outcome = verifier.verify(&request, Some(authorization));
//! assert_eq!(outcome, VerificationOutcome::SignatureMismatch);
//! ```
//!
//! # Modules
//!
//! - [`params`] - `Authorization` header parsing
//! - [`canonical`] - Canonical request snapshot and signing-string construction
//! - [`keys`] - Key resolution trait and in-memory implementation
//! - [`algorithm`] - Algorithm registry and verification routines
//! - [`verifier`] - The orchestrating state machine
//! - [`error`] - Per-component error types

pub mod algorithm;
pub mod canonical;
pub mod error;
pub mod keys;
pub mod params;
pub mod verifier;

pub use algorithm::{AlgorithmRegistry, SignatureAlgorithm};
pub use canonical::{CanonicalRequest, REQUEST_TARGET, build_signing_string};
pub use error::{AlgorithmError, BuildError, ParseError, ResolveError};
pub use keys::{KeyMaterial, KeyResolver, ResolvedKey, StaticKeyResolver};
pub use params::{DEFAULT_COVERED_HEADERS, SignatureParams, parse_signature_header};
pub use verifier::{SignatureVerifier, VerificationOutcome};
