use thiserror::Error;

use crate::services::gate::TokenError;
use crate::services::jwks::KeyLookupError;

/// Why a request was turned away.
///
/// Display strings are the rejection reasons sent back to the client.
#[derive(Debug, Error)]
pub enum GateError {
    #[error("Missing token")]
    MissingToken,

    #[error(transparent)]
    KeyLookup(#[from] KeyLookupError),

    #[error("Invalid token: {0}")]
    InvalidToken(#[from] TokenError),

    #[error("Tenant not allowed")]
    TenantNotAllowed,
}
