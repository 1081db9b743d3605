/*
 * Responsibility
 * - /auth/{strategy} の終端 handler
 * - authentication middleware が残した redirect hook / result data を HTTP response にする
 *   - hook があれば 303 + Location
 *   - 無ければ data を JSON で返す (data も無ければ 204)
 */
use axum::{
    Json,
    body::Body,
    http::{Request, StatusCode},
    response::{IntoResponse, Redirect, Response},
};

use crate::middleware::authentication::AuthenticationData;
use crate::services::authentication::RedirectHook;

pub async fn complete(req: Request<Body>) -> Response {
    let extensions = req.extensions();

    if let Some(hook) = extensions.get::<RedirectHook>() {
        return Redirect::to(hook.url()).into_response();
    }

    match extensions.get::<AuthenticationData>() {
        Some(AuthenticationData(data)) => (StatusCode::OK, Json(data.clone())).into_response(),
        None => StatusCode::NO_CONTENT.into_response(),
    }
}
