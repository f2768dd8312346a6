/*!
 * Token gate
 *
 * Responsibility:
 * - request (path + headers) から admit / reject を決める
 * - 段階: exemption → extract → strip_prefix → resolve_key → verify → tenant
 * - 最初に失敗した段階で打ち切り、その理由を GateError として返す
 *
 * HTTP への写像 (401 など) は middleware 側の責務
 */

mod error;
mod exempt;
mod extract;
mod pipeline;
mod tenant;
mod verify;

pub use error::GateError;
pub use exempt::{ExemptPaths, ExemptionMatcher};
pub use extract::{extract, strip_prefix};
pub use pipeline::{Admission, TokenGate};
pub use tenant::{TenantPolicy, is_tenant_allowed};
pub use verify::{DecodedClaims, MAX_LEEWAY_SECONDS, TokenError, TokenVerifier, token_header};
