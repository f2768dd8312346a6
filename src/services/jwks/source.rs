use async_trait::async_trait;
use jsonwebtoken::jwk::JwkSet;
use tracing::debug;
use url::Url;

use super::KeyLookupError;

/// Supplier of JSON Web Key Sets.
///
/// Implementations must be safe to call concurrently; the cache may issue
/// overlapping fetches when several requests miss on the same `kid`.
#[async_trait]
pub trait KeySource: Send + Sync {
    // Endpoint description (for logging).
    fn describe(&self) -> String;

    // Fetch the full key set. Any transport or decoding failure is `Fetch`.
    async fn fetch(&self) -> Result<JwkSet, KeyLookupError>;
}

/// Fetches the key set from a JWKS endpoint over HTTP(S).
///
/// No timeout is applied here: a hanging endpoint hangs the request, and the
/// caller is expected to bound the whole request instead.
#[derive(Clone, Debug)]
pub struct HttpKeySource {
    uri: Url,
    client: reqwest::Client,
}

impl HttpKeySource {
    pub fn new(uri: Url) -> Result<Self, KeyLookupError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("token-gate/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| KeyLookupError::Fetch(e.to_string()))?;

        Ok(Self { uri, client })
    }
}

#[async_trait]
impl KeySource for HttpKeySource {
    fn describe(&self) -> String {
        self.uri.to_string()
    }

    async fn fetch(&self) -> Result<JwkSet, KeyLookupError> {
        debug!(uri = %self.uri, "fetching JWKS");

        let response = self
            .client
            .get(self.uri.clone())
            .send()
            .await
            .map_err(|e| KeyLookupError::Fetch(e.to_string()))?;

        if !response.status().is_success() {
            return Err(KeyLookupError::Fetch(format!(
                "HTTP {} from JWKS endpoint",
                response.status()
            )));
        }

        let set: JwkSet = response
            .json()
            .await
            .map_err(|e| KeyLookupError::Fetch(format!("invalid JWKS document: {}", e)))?;

        debug!(uri = %self.uri, keys = set.keys.len(), "fetched JWKS");
        Ok(set)
    }
}
