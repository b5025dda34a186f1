//! Parsing of `Authorization: Signature ...` header values.
//!
//! The wire format is the signed-HTTP-message scheme:
//!
//! ```text
//! Signature keyId="<id>",algorithm="<token>",headers="<names>",signature="<base64>"
//! ```
//!
//! Parameter order is not significant and unrecognized parameters are ignored
//! for forward compatibility. Parsing is pure: it performs no I/O and no
//! cryptography.

use base64::Engine;
use base64::alphabet;
use base64::engine::general_purpose::{GeneralPurpose, GeneralPurposeConfig};

use crate::error::ParseError;

/// Base64 engine for signature values.
///
/// Standard alphabet; padding is accepted but not required on decode, since
/// signer implementations differ on whether they emit it.
pub(crate) const BASE64: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_padding_mode(base64::engine::DecodePaddingMode::Indifferent),
);

/// The covered-header list assumed when the `headers` parameter is absent.
///
/// Both signer and verifier must agree on this default; diverging defaults
/// are a silent interoperability bug, so it is fixed here rather than made
/// configurable.
pub const DEFAULT_COVERED_HEADERS: &[&str] = &["date"];

/// Parsed signature parameters from an `Authorization` header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignatureParams {
    /// Opaque identifier used to look up the verification key.
    pub key_id: String,
    /// Lowercased algorithm token, e.g. `rsa-sha256`.
    pub algorithm: String,
    /// Lowercased header names in the exact order they were signed.
    /// Never empty; defaults to [`DEFAULT_COVERED_HEADERS`].
    pub headers: Vec<String>,
    /// Base64-encoded signature bytes, validated during parsing.
    pub signature: String,
}

/// Parse the raw value of an `Authorization` header into [`SignatureParams`].
///
/// # Errors
///
/// Returns a [`ParseError`] if the scheme is not `Signature`, the parameter
/// list is syntactically invalid, a mandatory parameter is missing or empty,
/// the `headers` list is empty, or the signature is not valid base64.
pub fn parse_signature_header(raw: &str) -> Result<SignatureParams, ParseError> {
    let trimmed = raw.trim();
    let (scheme, rest) = trimmed.split_once(' ').unwrap_or((trimmed, ""));
    if !scheme.eq_ignore_ascii_case("Signature") {
        return Err(ParseError::UnknownScheme(scheme.to_owned()));
    }

    let mut key_id = None;
    let mut algorithm = None;
    let mut headers = None;
    let mut signature = None;

    for (name, value) in parse_parameters(rest)? {
        // Duplicate parameters: last occurrence wins.
        match name {
            "keyId" => key_id = Some(value),
            "algorithm" => algorithm = Some(value.to_ascii_lowercase()),
            "headers" => headers = Some(value),
            "signature" => signature = Some(value),
            // Unrecognized parameters are ignored for forward compatibility.
            _ => {}
        }
    }

    let key_id = require("keyId", key_id)?;
    let algorithm = require("algorithm", algorithm)?;
    let signature = require("signature", signature)?;

    let headers = match headers {
        None => DEFAULT_COVERED_HEADERS
            .iter()
            .map(|&name| name.to_owned())
            .collect(),
        Some(list) => {
            let names: Vec<String> = list
                .split(' ')
                .filter(|token| !token.is_empty())
                .map(str::to_ascii_lowercase)
                .collect();
            if names.is_empty() {
                return Err(ParseError::EmptyHeaderList);
            }
            names
        }
    };

    // Validate the encoding now so every later decode of this value succeeds.
    BASE64.decode(&signature)?;

    Ok(SignatureParams {
        key_id,
        algorithm,
        headers,
        signature,
    })
}

/// Scan a comma-separated list of `name="value"` pairs.
///
/// Values are terminated by the next `"`; a quote can therefore never appear
/// inside a value, and anything between a closing quote and the next comma is
/// a syntax error. Commas inside quoted values are preserved.
fn parse_parameters(input: &str) -> Result<Vec<(&str, String)>, ParseError> {
    let mut pairs = Vec::new();
    let mut rest = input.trim_start();

    while !rest.is_empty() {
        let eq = rest
            .find('=')
            .ok_or_else(|| ParseError::Syntax(format!("expected `=` in `{rest}`")))?;
        let name = rest[..eq].trim();
        if name.is_empty()
            || name
                .chars()
                .any(|c| c.is_ascii_whitespace() || c == '"' || c == ',')
        {
            return Err(ParseError::Syntax(format!("invalid parameter name `{name}`")));
        }

        let after_eq = &rest[eq + 1..];
        let value_body = after_eq.strip_prefix('"').ok_or_else(|| {
            ParseError::Syntax(format!("parameter `{name}` value must be quoted"))
        })?;
        let close = value_body.find('"').ok_or_else(|| {
            ParseError::Syntax(format!("unterminated quoted value for `{name}`"))
        })?;
        pairs.push((name, value_body[..close].to_owned()));

        rest = value_body[close + 1..].trim_start();
        if let Some(after_comma) = rest.strip_prefix(',') {
            rest = after_comma.trim_start();
            if rest.is_empty() {
                return Err(ParseError::Syntax("trailing comma".to_owned()));
            }
        } else if !rest.is_empty() {
            return Err(ParseError::Syntax(format!(
                "expected `,` between parameters, found `{rest}`"
            )));
        }
    }

    Ok(pairs)
}

/// Reject absent or empty mandatory parameters, naming the offender.
fn require(name: &'static str, value: Option<impl Into<String>>) -> Result<String, ParseError> {
    match value {
        None => Err(ParseError::MissingParameter(name)),
        Some(value) => {
            let value = value.into();
            if value.is_empty() {
                Err(ParseError::EmptyParameter(name))
            } else {
                Ok(value)
            }
        }
    }
}
