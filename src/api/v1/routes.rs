/*
 * Responsibility
 * - v1 の URL 構造を定義
 * - /health は gate の exemption (AUTH_EXEMPT_PATHS の既定値) で素通し
 * - gate 自体は app.rs で router 全体に掛ける
 */
use axum::{Router, routing::get};

use crate::state::AppState;

use crate::api::v1::handlers::{health::health, me::me};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/me", get(me))
}
