//! HTTP boundary for signet signature verification.
//!
//! The verification core is transport-agnostic; this crate supplies the two
//! translations a hosting layer needs:
//!
//! - [`canonical_request`] / [`authorization_header`] snapshot an incoming
//!   [`http::request::Parts`] into the core's input types, and
//! - [`respond`] turns a [`signet_core::VerificationOutcome`] into an
//!   `http::Response`: success for a verified signature, unauthorized with a
//!   `WWW-Authenticate: Signature headers="..."` challenge for anything else.
//!
//! The challenged header list comes from [`ChallengeConfig`] — deployment
//! configuration, never derived from the request that failed.

pub mod challenge;
pub mod request;

pub use challenge::{CHALLENGE_HEADERS_ENV, ChallengeConfig, respond};
pub use request::{authorization_header, canonical_request};
