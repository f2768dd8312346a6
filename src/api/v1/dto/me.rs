use serde::Serialize;

use crate::services::gate::DecodedClaims;

#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub sub: Option<String>,
    pub iss: Option<String>,
    pub claims: DecodedClaims,
}
