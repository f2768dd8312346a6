use std::sync::Arc;

use axum::http::HeaderMap;
use tracing::debug;

use crate::config::{GateConfig, TokenSource};
use crate::services::jwks::SigningKeyCache;

use super::{
    DecodedClaims, ExemptPaths, ExemptionMatcher, GateError, TenantPolicy, TokenVerifier, extract,
    is_tenant_allowed, strip_prefix, token_header,
};

/// Outcome of a request that passed the gate.
#[derive(Debug, Clone, PartialEq)]
pub enum Admission {
    /// Path is exempt; nothing was checked.
    Exempt,
    /// Token verified and (if configured) tenant allowed.
    Verified(DecodedClaims),
}

/// Admit/reject decision for inbound requests.
///
/// Shared read-only across requests; the only mutable state is the signing
/// key cache.
pub struct TokenGate {
    source: TokenSource,
    header_prefix: Option<String>,
    tenant: Option<TenantPolicy>,
    verifier: TokenVerifier,
    keys: SigningKeyCache,
    exemptions: Arc<dyn ExemptionMatcher>,
}

impl std::fmt::Debug for TokenGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenGate")
            .field("source", &self.source)
            .field("header_prefix", &self.header_prefix)
            .field("tenant", &self.tenant)
            .field("verifier", &self.verifier)
            .field("keys", &self.keys)
            .finish()
    }
}

impl TokenGate {
    pub fn new(config: &GateConfig, keys: SigningKeyCache) -> Self {
        Self {
            source: config.source.clone(),
            header_prefix: config.header_prefix.clone(),
            tenant: config.tenant.clone(),
            verifier: TokenVerifier::from_config(config),
            keys,
            exemptions: Arc::new(ExemptPaths::new(config.exempt_paths.clone())),
        }
    }

    /// Replace the configured path exemptions with a caller-supplied matcher.
    pub fn with_exemptions(mut self, exemptions: Arc<dyn ExemptionMatcher>) -> Self {
        self.exemptions = exemptions;
        self
    }

    /// Run the pipeline for one request.
    ///
    /// Stages run in order and the first failure ends the request:
    /// exemption → extract → strip prefix → resolve key → verify → tenant.
    pub async fn decide(&self, path: &str, headers: &HeaderMap) -> Result<Admission, GateError> {
        if self.exemptions.is_exempt(path) {
            debug!(path, "path exempt from token gate");
            return Ok(Admission::Exempt);
        }

        let raw = extract(headers, &self.source).ok_or(GateError::MissingToken)?;
        let token = strip_prefix(&raw, self.header_prefix.as_deref());
        if token.is_empty() {
            return Err(GateError::MissingToken);
        }

        let header = token_header(token)?;
        let key = self.keys.resolve_key(header.kid.as_deref()).await?;
        let claims = self.verifier.verify(token, &header, &key)?;

        if !is_tenant_allowed(&claims, self.tenant.as_ref()) {
            return Err(GateError::TenantNotAllowed);
        }

        Ok(Admission::Verified(claims))
    }
}
