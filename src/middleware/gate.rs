//! token gate → 通過時は GateCtx を extensions に入れる
//!
//! - 判定そのものは `services::gate::TokenGate::decide` に任せる
//! - 拒否は AppError::Unauthorized (401 + 理由) に写す
//! - 通過したリクエストは変更せずに次へ渡す (extensions に claims を足すだけ)

use axum::{
    Router,
    body::Body,
    extract::{OriginalUri, State},
    http::Request,
    middleware::{self, Next},
    response::Response,
};

use crate::api::v1::extractors::GateCtx;
use crate::error::AppError;
use crate::services::gate::Admission;
use crate::state::AppState;

/// Router 全体に token gate を掛ける。
///
/// 例：
/// ```ignore
/// let router = Router::new().nest("/api/v1", api::v1::routes());
/// let router = middleware::gate::apply(router, state.clone());
/// ```
pub fn apply(router: Router<AppState>, state: AppState) -> Router<AppState> {
    // axum 0.8 の from_fn は State extractor を受け取れないため、`from_fn_with_state` で明示的に state を渡す
    router.layer(middleware::from_fn_with_state(state, gate_middleware))
}

async fn gate_middleware(
    State(state): State<AppState>,
    OriginalUri(original_uri): OriginalUri,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    // nest された router では req.uri() から prefix が落ちるので OriginalUri で判定する
    let path = original_uri.path();

    match state.gate.decide(path, req.headers()).await {
        Ok(Admission::Exempt) => {}
        Ok(Admission::Verified(claims)) => {
            // middleware → extractor への受け渡し
            req.extensions_mut().insert(GateCtx::new(claims));
        }
        Err(err) => {
            tracing::warn!(error = %err, path, "request rejected by token gate");
            return Err(err.into());
        }
    }

    Ok(next.run(req).await)
}
