/*
 * Responsibility
 * - middleware の公開インターフェース
 * - gate::apply (token 検証), http::apply (request-id / trace / limit / timeout)
 */
pub mod gate;
pub mod http;
