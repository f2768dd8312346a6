use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, Header, Validation};
use thiserror::Error;

use crate::config::GateConfig;

/// Upper bound on `exp`/`nbf` clock-skew tolerance, in seconds.
pub const MAX_LEEWAY_SECONDS: u64 = 300;

/// Claim set of a verified token, keyed by top-level claim name.
pub type DecodedClaims = serde_json::Map<String, serde_json::Value>;

// Errors returned by signature + claim verification.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TokenError {
    #[error("jwt expired")]
    Expired,

    #[error("jwt issuer invalid. expected: {0}")]
    IssuerMismatch(String),

    #[error("jwt audience invalid. expected: {0}")]
    AudienceMismatch(String),

    #[error("{0}")]
    Malformed(String),
}

/// Decode the (unverified) JOSE header, mostly to learn `kid` and `alg`.
pub fn token_header(token: &str) -> Result<Header, TokenError> {
    jsonwebtoken::decode_header(token).map_err(|e| TokenError::Malformed(e.to_string()))
}

/// Signature + registered-claim verification.
///
/// `exp` is always required and always validated. `iss` / `aud` are only
/// checked when configured. Leeway never exceeds [`MAX_LEEWAY_SECONDS`].
#[derive(Debug, Clone, Default)]
pub struct TokenVerifier {
    issuer: Option<String>,
    audience: Option<String>,
    leeway_seconds: u64,
}

impl TokenVerifier {
    pub fn new(issuer: Option<String>, audience: Option<String>, leeway_seconds: u64) -> Self {
        Self {
            issuer,
            audience,
            leeway_seconds: leeway_seconds.min(MAX_LEEWAY_SECONDS),
        }
    }

    pub fn from_config(config: &GateConfig) -> Self {
        Self::new(
            config.issuer.clone(),
            config.audience.clone(),
            config.leeway_seconds,
        )
    }

    /// Verify `token`, whose JOSE header the caller already decoded with
    /// [`token_header`].
    pub fn verify(
        &self,
        token: &str,
        header: &Header,
        key: &DecodingKey,
    ) -> Result<DecodedClaims, TokenError> {
        // Keys come from a public key set; a shared-secret algorithm here
        // can only be an attempt to sign with the public key.
        if matches!(
            header.alg,
            Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512
        ) {
            return Err(TokenError::Malformed(format!(
                "unsupported algorithm {:?}",
                header.alg
            )));
        }

        let validation = self.validation(header.alg);
        let data = jsonwebtoken::decode::<DecodedClaims>(token, key, &validation)
            .map_err(|e| self.classify(e))?;

        Ok(data.claims)
    }

    fn validation(&self, alg: Algorithm) -> Validation {
        let mut validation = Validation::new(alg);
        validation.leeway = self.leeway_seconds;
        validation.validate_exp = true;
        validation.validate_nbf = true;
        // A configured claim must also be present, not just match when present.
        let mut required = vec!["exp"];
        if let Some(issuer) = &self.issuer {
            validation.set_issuer(&[issuer]);
            required.push("iss");
        }
        match &self.audience {
            Some(audience) => {
                validation.set_audience(&[audience]);
                required.push("aud");
            }
            None => validation.validate_aud = false,
        }
        validation.set_required_spec_claims(&required);

        validation
    }

    fn classify(&self, err: jsonwebtoken::errors::Error) -> TokenError {
        let expected = |v: &Option<String>| v.clone().unwrap_or_default();

        match err.kind() {
            ErrorKind::ExpiredSignature => TokenError::Expired,
            ErrorKind::InvalidIssuer => TokenError::IssuerMismatch(expected(&self.issuer)),
            ErrorKind::MissingRequiredClaim(claim) if claim == "iss" => {
                TokenError::IssuerMismatch(expected(&self.issuer))
            }
            ErrorKind::InvalidAudience => TokenError::AudienceMismatch(expected(&self.audience)),
            ErrorKind::MissingRequiredClaim(claim) if claim == "aud" => {
                TokenError::AudienceMismatch(expected(&self.audience))
            }
            _ => TokenError::Malformed(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_of_garbage_is_malformed() {
        assert!(matches!(
            token_header("not-a-jwt"),
            Err(TokenError::Malformed(_))
        ));
        assert!(matches!(token_header(""), Err(TokenError::Malformed(_))));
    }

    #[test]
    fn header_exposes_kid() {
        // {"alg":"EdDSA","typ":"JWT","kid":"key-1"} . {} . sig
        let token = "eyJhbGciOiJFZERTQSIsInR5cCI6IkpXVCIsImtpZCI6ImtleS0xIn0.e30.c2ln";
        let header = token_header(token).unwrap();
        assert_eq!(header.kid.as_deref(), Some("key-1"));
        assert_eq!(header.alg, Algorithm::EdDSA);
    }

    #[test]
    fn shared_secret_algorithms_are_refused() {
        // {"alg":"HS256","typ":"JWT","kid":"key-1"} . {} . sig
        let token = "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCIsImtpZCI6ImtleS0xIn0.e30.c2ln";
        let key = DecodingKey::from_secret(b"public-key-bytes");

        let header = token_header(token).unwrap();

        let err = TokenVerifier::default()
            .verify(token, &header, &key)
            .err()
            .unwrap();
        assert!(matches!(err, TokenError::Malformed(ref m) if m.contains("unsupported algorithm")));
    }

    #[test]
    fn validation_always_requires_exp() {
        let validation = TokenVerifier::default().validation(Algorithm::EdDSA);
        assert!(validation.validate_exp);
        assert!(validation.required_spec_claims.contains("exp"));
        assert!(!validation.validate_aud);
        assert!(validation.iss.is_none());
        assert_eq!(validation.leeway, 0);
    }

    #[test]
    fn leeway_is_capped() {
        let validation = TokenVerifier::new(None, None, u64::MAX).validation(Algorithm::EdDSA);
        assert_eq!(validation.leeway, MAX_LEEWAY_SECONDS);

        let validation = TokenVerifier::new(None, None, 60).validation(Algorithm::EdDSA);
        assert_eq!(validation.leeway, 60);
    }

    #[test]
    fn validation_carries_issuer_and_audience() {
        let verifier = TokenVerifier::new(
            Some("https://idp.example.com/".to_string()),
            Some("api".to_string()),
            5,
        );
        let validation = verifier.validation(Algorithm::RS256);
        assert!(validation.validate_aud);
        assert!(validation.required_spec_claims.contains("iss"));
        assert!(validation.required_spec_claims.contains("aud"));
        assert!(validation.iss.unwrap().contains("https://idp.example.com/"));
        assert_eq!(validation.leeway, 5);
    }

    #[test]
    fn error_display_carries_detail() {
        assert_eq!(TokenError::Expired.to_string(), "jwt expired");
        assert_eq!(
            TokenError::IssuerMismatch("https://idp.example.com/".to_string()).to_string(),
            "jwt issuer invalid. expected: https://idp.example.com/"
        );
        assert_eq!(
            TokenError::Malformed("InvalidSignature".to_string()).to_string(),
            "InvalidSignature"
        );
    }
}
