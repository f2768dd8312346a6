use thiserror::Error;

/// Failures while resolving the key that signed a token.
///
/// The Display strings are returned to clients as rejection reasons.
#[derive(Debug, Error)]
pub enum KeyLookupError {
    #[error("Unable to find a signing key: token header has no 'kid'")]
    MissingKid,

    #[error("Unable to fetch signing keys: {0}")]
    Fetch(String),

    #[error("Unable to find a signing key that matches '{0}'")]
    UnknownKid(String),

    #[error("Unable to use signing key '{kid}': {reason}")]
    UnusableKey { kid: String, reason: String },
}
