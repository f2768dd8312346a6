use std::collections::HashMap;
use std::sync::Arc;

use jsonwebtoken::DecodingKey;
use jsonwebtoken::jwk::PublicKeyUse;
use tokio::sync::RwLock;
use tracing::{debug, trace};

use super::{KeyLookupError, KeySource};

/// Process-wide signing key cache keyed by `kid`.
///
/// - Entries are added lazily, one `kid` at a time, and kept for the lifetime
///   of the process (no expiry, no rotation handling).
/// - The lock is never held across a fetch. Concurrent misses on the same
///   `kid` may each fetch; the last insert wins, which is harmless because the
///   stored key material is identical.
/// - Unknown kids are not remembered: every miss goes back to the source.
pub struct SigningKeyCache {
    source: Arc<dyn KeySource>,
    keys: RwLock<HashMap<String, DecodingKey>>,
}

impl std::fmt::Debug for SigningKeyCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Do not print key material
        f.debug_struct("SigningKeyCache")
            .field("source", &self.source.describe())
            .finish()
    }
}

impl SigningKeyCache {
    pub fn new(source: Arc<dyn KeySource>) -> Self {
        Self {
            source,
            keys: RwLock::new(HashMap::new()),
        }
    }

    /// Resolve the public key for `kid`, fetching the key set on a cache miss.
    pub async fn resolve_key(&self, kid: Option<&str>) -> Result<DecodingKey, KeyLookupError> {
        let kid = kid
            .filter(|k| !k.is_empty())
            .ok_or(KeyLookupError::MissingKid)?;

        if let Some(key) = self.cached(kid).await {
            trace!(kid, "signing key cache hit");
            return Ok(key);
        }

        debug!(kid, source = %self.source.describe(), "signing key cache miss");
        let set = self.source.fetch().await?;

        let jwk = set
            .find(kid)
            .ok_or_else(|| KeyLookupError::UnknownKid(kid.to_string()))?;

        if matches!(jwk.common.public_key_use, Some(PublicKeyUse::Encryption)) {
            return Err(KeyLookupError::UnusableKey {
                kid: kid.to_string(),
                reason: "key is published for encryption, not signing".to_string(),
            });
        }

        let key = DecodingKey::from_jwk(jwk).map_err(|e| KeyLookupError::UnusableKey {
            kid: kid.to_string(),
            reason: e.to_string(),
        })?;

        self.keys.write().await.insert(kid.to_string(), key.clone());
        debug!(kid, "cached signing key");

        Ok(key)
    }

    async fn cached(&self, kid: &str) -> Option<DecodingKey> {
        self.keys.read().await.get(kid).cloned()
    }

    #[cfg(test)]
    async fn len(&self) -> usize {
        self.keys.read().await.len()
    }

    #[cfg(test)]
    async fn is_empty(&self) -> bool {
        self.keys.read().await.is_empty()
    }
}
