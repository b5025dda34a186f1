//! Algorithm registry and verification routines.
//!
//! The registry maps an algorithm token to a verification routine and is
//! closed over the set of supported algorithms at construction time. Adding
//! an algorithm means registering a new [`SignatureAlgorithm`], not branching
//! deeper in the verifier.

use std::collections::HashMap;

use hmac::digest::KeyInit;
use hmac::{Hmac, Mac};
use sha2::{Sha256, Sha512};
use subtle::ConstantTimeEq;

use crate::error::AlgorithmError;
use crate::keys::{KeyMaterial, ResolvedKey};

/// RSA PKCS#1 v1.5 with SHA-256 digest.
pub const RSA_SHA256: &str = "rsa-sha256";
/// HMAC-SHA256 over a shared secret.
pub const HMAC_SHA256: &str = "hmac-sha256";
/// HMAC-SHA512 over a shared secret.
pub const HMAC_SHA512: &str = "hmac-sha512";
/// Ed25519 (EdDSA over Curve25519).
pub const ED25519: &str = "ed25519";

/// One signature verification routine.
///
/// `Ok(true)` / `Ok(false)` report an evaluated signature; `Err` means the
/// check could not run at all (wrong key type, undecodable key material).
/// The two must never be conflated.
pub trait SignatureAlgorithm: Send + Sync {
    /// Check `signature` over `message` with `key`.
    ///
    /// # Errors
    ///
    /// Returns an [`AlgorithmError`] when the key does not fit the algorithm
    /// or cannot be decoded.
    fn verify(
        &self,
        key: &ResolvedKey,
        message: &[u8],
        signature: &[u8],
    ) -> Result<bool, AlgorithmError>;
}

/// Maps algorithm tokens to verification routines.
pub struct AlgorithmRegistry {
    algorithms: HashMap<String, Box<dyn SignatureAlgorithm>>,
}

impl std::fmt::Debug for AlgorithmRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut tokens: Vec<&str> = self.algorithms.keys().map(String::as_str).collect();
        tokens.sort_unstable();
        f.debug_struct("AlgorithmRegistry")
            .field("algorithms", &tokens)
            .finish()
    }
}

impl Default for AlgorithmRegistry {
    fn default() -> Self {
        Self::with_default_algorithms()
    }
}

impl AlgorithmRegistry {
    /// Create a registry with no algorithms registered.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            algorithms: HashMap::new(),
        }
    }

    /// Create a registry with the built-in algorithms: [`RSA_SHA256`],
    /// [`HMAC_SHA256`], [`HMAC_SHA512`], and [`ED25519`].
    #[must_use]
    pub fn with_default_algorithms() -> Self {
        let mut registry = Self::empty();
        registry.register(RSA_SHA256, Box::new(RsaSha256));
        registry.register(HMAC_SHA256, Box::new(HmacSha256));
        registry.register(HMAC_SHA512, Box::new(HmacSha512));
        registry.register(ED25519, Box::new(Ed25519));
        registry
    }

    /// Register a verification routine under `token`, replacing any previous
    /// registration.
    pub fn register(&mut self, token: impl Into<String>, algorithm: Box<dyn SignatureAlgorithm>) {
        self.algorithms
            .insert(token.into().to_ascii_lowercase(), algorithm);
    }

    /// Whether a routine is registered for `token`.
    #[must_use]
    pub fn supports(&self, token: &str) -> bool {
        self.algorithms.contains_key(token)
    }

    /// Verify `signature` over `message` using the routine registered for
    /// `token`.
    ///
    /// # Errors
    ///
    /// [`AlgorithmError::UnsupportedAlgorithm`] for an unregistered token;
    /// otherwise whatever the routine itself reports.
    pub fn verify(
        &self,
        token: &str,
        key: &ResolvedKey,
        message: &[u8],
        signature: &[u8],
    ) -> Result<bool, AlgorithmError> {
        let algorithm = self
            .algorithms
            .get(token)
            .ok_or_else(|| AlgorithmError::UnsupportedAlgorithm(token.to_owned()))?;
        algorithm.verify(key, message, signature)
    }
}

/// RSA PKCS#1 v1.5 verification with a SHA-256 digest.
///
/// Expects [`KeyMaterial::PublicKey`] holding a PEM-encoded SPKI document.
#[derive(Debug)]
pub struct RsaSha256;

impl SignatureAlgorithm for RsaSha256 {
    fn verify(
        &self,
        key: &ResolvedKey,
        message: &[u8],
        signature: &[u8],
    ) -> Result<bool, AlgorithmError> {
        use rsa::pkcs8::DecodePublicKey;
        use rsa::signature::Verifier;

        let KeyMaterial::PublicKey(pem) = key.material() else {
            return Err(AlgorithmError::KeyTypeMismatch {
                algorithm: RSA_SHA256,
                expected: "public key",
            });
        };
        let pem = std::str::from_utf8(pem)
            .map_err(|_| AlgorithmError::InvalidKey("RSA public key is not UTF-8 PEM".to_owned()))?;
        let public_key = rsa::RsaPublicKey::from_public_key_pem(pem)
            .map_err(|e| AlgorithmError::InvalidKey(e.to_string()))?;
        let verifying_key = rsa::pkcs1v15::VerifyingKey::<Sha256>::new(public_key);

        // A signature of the wrong size for the modulus can never match.
        let Ok(signature) = rsa::pkcs1v15::Signature::try_from(signature) else {
            return Ok(false);
        };
        Ok(verifying_key.verify(message, &signature).is_ok())
    }
}

/// Ed25519 (EdDSA) verification.
///
/// Expects [`KeyMaterial::PublicKey`] holding the raw 32-byte public key.
#[derive(Debug)]
pub struct Ed25519;

impl SignatureAlgorithm for Ed25519 {
    fn verify(
        &self,
        key: &ResolvedKey,
        message: &[u8],
        signature: &[u8],
    ) -> Result<bool, AlgorithmError> {
        use ed25519_dalek::{PUBLIC_KEY_LENGTH, Signature, Verifier, VerifyingKey};

        let KeyMaterial::PublicKey(bytes) = key.material() else {
            return Err(AlgorithmError::KeyTypeMismatch {
                algorithm: ED25519,
                expected: "public key",
            });
        };
        let bytes: &[u8; PUBLIC_KEY_LENGTH] = bytes.as_slice().try_into().map_err(|_| {
            AlgorithmError::InvalidKey(format!(
                "Ed25519 public key must be {PUBLIC_KEY_LENGTH} bytes, got {}",
                bytes.len()
            ))
        })?;
        let verifying_key = VerifyingKey::from_bytes(bytes)
            .map_err(|e| AlgorithmError::InvalidKey(e.to_string()))?;

        let Ok(signature) = Signature::from_slice(signature) else {
            return Ok(false);
        };
        Ok(verifying_key.verify(message, &signature).is_ok())
    }
}

/// HMAC-SHA256 verification against a shared secret.
#[derive(Debug)]
pub struct HmacSha256;

impl SignatureAlgorithm for HmacSha256 {
    fn verify(
        &self,
        key: &ResolvedKey,
        message: &[u8],
        signature: &[u8],
    ) -> Result<bool, AlgorithmError> {
        hmac_matches::<Hmac<Sha256>>(HMAC_SHA256, key, message, signature)
    }
}

/// HMAC-SHA512 verification against a shared secret.
#[derive(Debug)]
pub struct HmacSha512;

impl SignatureAlgorithm for HmacSha512 {
    fn verify(
        &self,
        key: &ResolvedKey,
        message: &[u8],
        signature: &[u8],
    ) -> Result<bool, AlgorithmError> {
        hmac_matches::<Hmac<Sha512>>(HMAC_SHA512, key, message, signature)
    }
}

/// Recompute the MAC and compare in constant time.
///
/// The comparison must be constant-time for any secret-based scheme; this is
/// a hard correctness requirement, not an optimization.
fn hmac_matches<M: Mac + KeyInit>(
    token: &'static str,
    key: &ResolvedKey,
    message: &[u8],
    signature: &[u8],
) -> Result<bool, AlgorithmError> {
    let KeyMaterial::SharedSecret(secret) = key.material() else {
        return Err(AlgorithmError::KeyTypeMismatch {
            algorithm: token,
            expected: "shared secret",
        });
    };
    let mut mac = <M as Mac>::new_from_slice(secret).expect("HMAC can accept any key length");
    mac.update(message);
    let computed = mac.finalize().into_bytes();
    Ok(computed.as_slice().ct_eq(signature).into())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn secret_key() -> ResolvedKey {
        ResolvedKey::new(
            KeyMaterial::SharedSecret(b"secret".to_vec()),
            [HMAC_SHA256, HMAC_SHA512],
        )
    }

    fn hmac_sha256(secret: &[u8], message: &[u8]) -> Vec<u8> {
        let mut mac =
            <Hmac<Sha256> as Mac>::new_from_slice(secret).expect("HMAC can accept any key length");
        mac.update(message);
        mac.finalize().into_bytes().to_vec()
    }

    #[test]
    fn test_should_verify_matching_hmac() {
        let registry = AlgorithmRegistry::with_default_algorithms();
        let signature = hmac_sha256(b"secret", b"message");
        let verified = registry
            .verify(HMAC_SHA256, &secret_key(), b"message", &signature)
            .unwrap();
        assert!(verified);
    }

    #[test]
    fn test_should_reject_mismatching_hmac() {
        let registry = AlgorithmRegistry::with_default_algorithms();
        let signature = hmac_sha256(b"other-secret", b"message");
        let verified = registry
            .verify(HMAC_SHA256, &secret_key(), b"message", &signature)
            .unwrap();
        assert!(!verified);
    }

    #[test]
    fn test_should_reject_truncated_hmac() {
        let registry = AlgorithmRegistry::with_default_algorithms();
        let mut signature = hmac_sha256(b"secret", b"message");
        signature.truncate(16);
        let verified = registry
            .verify(HMAC_SHA256, &secret_key(), b"message", &signature)
            .unwrap();
        assert!(!verified);
    }

    #[test]
    fn test_should_fail_on_unknown_token() {
        let registry = AlgorithmRegistry::with_default_algorithms();
        let err = registry
            .verify("rsa-md5", &secret_key(), b"message", b"sig")
            .unwrap_err();
        assert!(matches!(err, AlgorithmError::UnsupportedAlgorithm(t) if t == "rsa-md5"));
    }

    #[test]
    fn test_should_fail_on_key_type_mismatch() {
        let registry = AlgorithmRegistry::with_default_algorithms();
        let public = ResolvedKey::new(KeyMaterial::PublicKey(vec![0; 32]), [HMAC_SHA256]);
        let err = registry
            .verify(HMAC_SHA256, &public, b"message", b"sig")
            .unwrap_err();
        assert!(matches!(err, AlgorithmError::KeyTypeMismatch { .. }));
    }

    #[test]
    fn test_should_verify_ed25519_roundtrip() {
        use ed25519_dalek::{Signer, SigningKey};

        let signing_key = SigningKey::from_bytes(&[42u8; 32]);
        let public = ResolvedKey::new(
            KeyMaterial::PublicKey(signing_key.verifying_key().to_bytes().to_vec()),
            [ED25519],
        );
        let signature = signing_key.sign(b"message").to_bytes().to_vec();

        let registry = AlgorithmRegistry::with_default_algorithms();
        assert!(registry.verify(ED25519, &public, b"message", &signature).unwrap());
        assert!(!registry.verify(ED25519, &public, b"tampered", &signature).unwrap());
    }

    #[test]
    fn test_should_treat_wrong_length_ed25519_signature_as_mismatch() {
        use ed25519_dalek::SigningKey;

        let signing_key = SigningKey::from_bytes(&[42u8; 32]);
        let public = ResolvedKey::new(
            KeyMaterial::PublicKey(signing_key.verifying_key().to_bytes().to_vec()),
            [ED25519],
        );
        let registry = AlgorithmRegistry::with_default_algorithms();
        let verified = registry.verify(ED25519, &public, b"message", &[0u8; 63]).unwrap();
        assert!(!verified);
    }

    #[test]
    fn test_should_report_invalid_ed25519_key_as_fault() {
        let registry = AlgorithmRegistry::with_default_algorithms();
        let short_key = ResolvedKey::new(KeyMaterial::PublicKey(vec![0; 16]), [ED25519]);
        let err = registry
            .verify(ED25519, &short_key, b"message", &[0u8; 64])
            .unwrap_err();
        assert!(matches!(err, AlgorithmError::InvalidKey(_)));
    }

    #[test]
    fn test_should_report_invalid_rsa_pem_as_fault() {
        let registry = AlgorithmRegistry::with_default_algorithms();
        let bad_pem = ResolvedKey::new(
            KeyMaterial::PublicKey(b"not a pem document".to_vec()),
            [RSA_SHA256],
        );
        let err = registry
            .verify(RSA_SHA256, &bad_pem, b"message", &[0u8; 256])
            .unwrap_err();
        assert!(matches!(err, AlgorithmError::InvalidKey(_)));
    }

    #[test]
    fn test_should_allow_registering_custom_algorithm() {
        struct AlwaysTrue;
        impl SignatureAlgorithm for AlwaysTrue {
            fn verify(
                &self,
                _key: &ResolvedKey,
                _message: &[u8],
                _signature: &[u8],
            ) -> Result<bool, AlgorithmError> {
                Ok(true)
            }
        }

        let mut registry = AlgorithmRegistry::empty();
        registry.register("always-true", Box::new(AlwaysTrue));
        assert!(registry.supports("always-true"));
        assert!(!registry.supports(HMAC_SHA256));
        assert!(registry.verify("always-true", &secret_key(), b"m", b"s").unwrap());
    }
}
