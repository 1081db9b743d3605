/*
 * Responsibility
 * - v1 の URL 構造を定義
 * - /health と、設定された strategy ごとの /auth/{name}
 * - strategy ごとに別の AuthenticationHandler を route_layer で掛ける
 */
use axum::{Router, routing::get};

use crate::api::v1::handlers::{authentication::complete, health::health};
use crate::middleware;
use crate::state::AppState;

pub fn routes(state: &AppState) -> Router<AppState> {
    let mut router = Router::new().route("/health", get(health));

    for handler in state.handlers.iter() {
        let path = format!("/auth/{}", handler.config().name);
        let strategy = Router::new().route(&path, get(complete).post(complete));

        router = router.merge(middleware::authentication::apply(strategy, handler.clone()));
    }

    router
}
