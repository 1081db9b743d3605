/*
 * Responsibility
 * - middleware の公開インターフェース
 * - authentication: strategy ごとの認証 handler を axum に載せる
 * - http: request-id / trace / body limit / timeout
 */
pub mod authentication;
pub mod http;
