use serde_json::Value;

use super::DecodedClaims;

/// Flat tenant membership rule.
///
/// The claim named `namespace_key` must be an object holding
/// `tenant_key: allowed_tenant` (exact string match).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TenantPolicy {
    pub namespace_key: String,
    pub tenant_key: String,
    pub allowed_tenant: String,
}

impl TenantPolicy {
    /// A missing namespace claim and a namespace claim of the wrong shape
    /// both deny.
    pub fn allows(&self, claims: &DecodedClaims) -> bool {
        let Some(Value::Object(namespace)) = claims.get(&self.namespace_key) else {
            return false;
        };

        matches!(
            namespace.get(&self.tenant_key),
            Some(Value::String(tenant)) if *tenant == self.allowed_tenant
        )
    }
}

/// `None` means the check is disabled and every claim set passes.
pub fn is_tenant_allowed(claims: &DecodedClaims, policy: Option<&TenantPolicy>) -> bool {
    policy.is_none_or(|p| p.allows(claims))
}
