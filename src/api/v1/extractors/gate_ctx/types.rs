/*
 * Responsibility
 * - Handler から見える「検証済みコンテキスト」の型
 * - middleware が検証して request extensions に格納し、handler はこの型だけを受け取る
 */

use crate::services::gate::DecodedClaims;

/// Verified claim set of the current request.
#[derive(Debug, Clone)]
pub struct GateCtx {
    pub claims: DecodedClaims,
}

impl GateCtx {
    pub fn new(claims: DecodedClaims) -> Self {
        Self { claims }
    }

    pub fn subject(&self) -> Option<&str> {
        self.claim_str("sub")
    }

    pub fn issuer(&self) -> Option<&str> {
        self.claim_str("iss")
    }

    fn claim_str(&self, name: &str) -> Option<&str> {
        self.claims.get(name).and_then(|v| v.as_str())
    }
}
