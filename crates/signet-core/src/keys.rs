//! Key resolution.
//!
//! The verifier depends only on the [`KeyResolver`] trait, never on a
//! concrete store, so deployments can back it with an in-memory map, a
//! remote key service, or a certificate store. A remote implementation must
//! apply its own timeout and surface lookup failures as [`ResolveError`]
//! values rather than hanging the verifier.

use std::collections::{BTreeSet, HashMap};

use parking_lot::RwLock;

use crate::error::ResolveError;

/// Key material for one registered key, interpreted per algorithm.
#[derive(Clone)]
pub enum KeyMaterial {
    /// Asymmetric public key bytes: a PEM-encoded SPKI document for RSA, raw
    /// 32-byte key for Ed25519.
    PublicKey(Vec<u8>),
    /// Shared secret for HMAC schemes.
    SharedSecret(Vec<u8>),
}

impl std::fmt::Debug for KeyMaterial {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::PublicKey(bytes) => f.debug_tuple("PublicKey").field(&bytes.len()).finish(),
            // Secret bytes must never reach logs.
            Self::SharedSecret(_) => f.write_str("SharedSecret(..)"),
        }
    }
}

/// A key resolved for one verification call, together with the algorithm
/// tokens it may be used with.
#[derive(Debug, Clone)]
pub struct ResolvedKey {
    material: KeyMaterial,
    algorithms: BTreeSet<String>,
}

impl ResolvedKey {
    /// Create a key restricted to the given algorithm tokens.
    pub fn new(
        material: KeyMaterial,
        algorithms: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self {
            material,
            algorithms: algorithms
                .into_iter()
                .map(|token| token.into().to_ascii_lowercase())
                .collect(),
        }
    }

    /// The key material, read-only.
    #[must_use]
    pub fn material(&self) -> &KeyMaterial {
        &self.material
    }

    /// Whether this key may be used with the given algorithm token.
    #[must_use]
    pub fn supports(&self, algorithm: &str) -> bool {
        self.algorithms.contains(algorithm)
    }
}

/// Maps a `keyId` to key material.
///
/// Implementations must be safe for concurrent reads; the verifier never
/// mutates a resolved key.
pub trait KeyResolver: Send + Sync {
    /// Resolve `key_id` for use with `algorithm`.
    ///
    /// # Errors
    ///
    /// [`ResolveError::UnknownKeyId`] when no key is registered under
    /// `key_id`; [`ResolveError::UnsupportedAlgorithm`] when the key may not
    /// be used with the requested algorithm.
    fn resolve(&self, key_id: &str, algorithm: &str) -> Result<ResolvedKey, ResolveError>;
}

/// In-memory [`KeyResolver`] backed by a read-write-locked map.
///
/// Registrations may happen at any time; lookups take a read lock only, so
/// concurrent verification calls never contend with each other.
#[derive(Debug, Default)]
pub struct StaticKeyResolver {
    keys: RwLock<HashMap<String, ResolvedKey>>,
}

impl StaticKeyResolver {
    /// Create an empty resolver.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a key under `key_id`, replacing any previous registration.
    pub fn insert(&self, key_id: impl Into<String>, key: ResolvedKey) {
        self.keys.write().insert(key_id.into(), key);
    }
}

impl KeyResolver for StaticKeyResolver {
    fn resolve(&self, key_id: &str, algorithm: &str) -> Result<ResolvedKey, ResolveError> {
        let keys = self.keys.read();
        let key = keys
            .get(key_id)
            .ok_or_else(|| ResolveError::UnknownKeyId(key_id.to_owned()))?;
        if !key.supports(algorithm) {
            return Err(ResolveError::UnsupportedAlgorithm {
                key_id: key_id.to_owned(),
                algorithm: algorithm.to_owned(),
            });
        }
        Ok(key.clone())
    }
}
