/*
 * Responsibility
 * - GET /me: gate を通過した呼び出し元の claims をそのまま返す
 */
use axum::Json;

use crate::api::v1::{dto::me::MeResponse, extractors::GateCtxExtractor};

pub async fn me(GateCtxExtractor(ctx): GateCtxExtractor) -> Json<MeResponse> {
    Json(MeResponse {
        sub: ctx.subject().map(str::to_string),
        iss: ctx.issuer().map(str::to_string),
        claims: ctx.claims,
    })
}
