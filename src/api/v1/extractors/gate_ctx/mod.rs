/*!
 * Gate context extractor
 *
 * Responsibility:
 * - gate を通過したリクエストのコンテキスト（GateCtx）を handler に提供する
 * - HTTP / axum 依存は extract に閉じ込め、型定義は types に分離する
 *
 * Public API:
 * - GateCtx
 * - GateCtxExtractor
 */

mod extract;
mod types;

pub use extract::GateCtxExtractor;
pub use types::GateCtx;
