use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::error::AppError;
use crate::state::AppState;

use super::GateCtx;

/// Handler で GateCtx を受け取るための extractor
/// middleware が GateCtx を request.extensions() に insert 済みである前提
/// 見つからない場合は gate が掛かっていない (exempt 経路 or 配線ミス) なので 500
pub struct GateCtxExtractor(pub GateCtx);

impl FromRequestParts<AppState> for GateCtxExtractor {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<GateCtx>()
            .cloned()
            .map(GateCtxExtractor)
            .ok_or_else(|| {
                tracing::error!("GateCtx missing; route is not behind the token gate");
                AppError::Internal
            })
    }
}
