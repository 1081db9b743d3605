/*
 * Responsibility
 * - GET /health (liveness 用, 認証 middleware は通さない)
 * - 認証 server には問い合わせない。strategy が幾つ載っているかだけ返す
 */
use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde_json::json;

use crate::state::AppState;

pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(json!({ "status": "ok", "strategies": state.handlers.len() })),
    )
}
