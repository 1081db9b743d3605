//! Strategy authentication → shapes request extensions for the next step.
//!
//! - upstream が `Principal` を extensions に入れている前提 (無ければ `None` のまま渡す)
//!   host は session / cookie から user を解決する layer を `apply` の外側 (後から `.layer`) に積む
//! - `Ok(())` なら redirect hook / result data を extensions に載せて `next` へ
//! - `Err(e)` なら `AppError` に変換してここで返す (`next` は呼ばない)

use axum::{
    Router,
    body::Body,
    extract::State,
    http::Request,
    middleware::{self, Next},
    response::Response,
};

use crate::error::AppError;
use crate::services::authentication::{
    AuthRequest, AuthResponse, AuthenticationHandler, Principal, RedirectHook, ServiceResult,
};
use crate::state::AppState;

/// Result data exposed by a successful authentication.
#[derive(Debug, Clone, PartialEq)]
pub struct AuthenticationData(pub ServiceResult);

/// Run `handler` in front of every route of `router`.
///
/// ```ignore
/// let github = Router::new().route("/auth/github", post(complete));
/// let github = middleware::authentication::apply(github, handler);
/// ```
pub fn apply(router: Router<AppState>, handler: AuthenticationHandler) -> Router<AppState> {
    router.route_layer(middleware::from_fn_with_state(
        handler,
        authentication_middleware,
    ))
}

async fn authentication_middleware(
    State(handler): State<AuthenticationHandler>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let mut auth_req = AuthRequest::new(req.extensions().get::<Principal>().cloned());
    auth_req.hook = req.extensions().get::<RedirectHook>().cloned();
    let mut auth_res = AuthResponse::default();

    handler.handle(&mut auth_req, &mut auth_res).await?;

    if let Some(hook) = auth_req.hook {
        req.extensions_mut().insert(hook);
    }
    if let Some(data) = auth_res.data {
        req.extensions_mut().insert(AuthenticationData(data));
    }

    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;
    use axum::{http::StatusCode, routing::post};
    use http_body_util::BodyExt;
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use super::*;
    use crate::services::authentication::{
        AuthenticationConfig, AuthenticationPayload, AuthenticationService, ServiceError,
        ServiceRegistry,
    };

    struct RecordingService {
        outcome: Result<ServiceResult, ServiceError>,
        payloads: Mutex<Vec<AuthenticationPayload>>,
    }

    #[async_trait]
    impl AuthenticationService for RecordingService {
        async fn create(
            &self,
            _req: &AuthRequest,
            payload: AuthenticationPayload,
        ) -> Result<ServiceResult, ServiceError> {
            self.payloads.lock().unwrap().push(payload);
            self.outcome.clone()
        }
    }

    // Echoes what the middleware left in the extensions.
    async fn inspect(req: Request<Body>) -> axum::Json<Value> {
        let hook = req.extensions().get::<RedirectHook>().map(|h| h.url().to_string());
        let data = req.extensions().get::<AuthenticationData>().map(|d| d.0.clone());
        axum::Json(json!({ "hook": hook, "data": data }))
    }

    async fn with_principal(mut req: Request<Body>, next: Next) -> Response {
        req.extensions_mut().insert(Principal(json!({ "name": "Bob" })));
        next.run(req).await
    }

    fn router(
        config: AuthenticationConfig,
        outcome: Result<ServiceResult, ServiceError>,
    ) -> (Router, Arc<RecordingService>) {
        let service = Arc::new(RecordingService {
            outcome,
            payloads: Mutex::new(Vec::new()),
        });
        let registry = ServiceRegistry::new().with_service("/authentication", service.clone());
        let handler = AuthenticationHandler::new(config, Arc::new(registry));

        let router = apply(Router::new().route("/auth/github", post(inspect)), handler)
            .layer(axum::middleware::from_fn(with_principal))
            .with_state(AppState::default());

        (router, service)
    }

    async fn call(router: Router) -> (StatusCode, Value) {
        let resp = router
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/auth/github")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        let status = resp.status();
        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn success_exposes_data_to_the_next_step() {
        let (router, service) = router(
            AuthenticationConfig::new("user", "github").with_success_redirect("/app"),
            Ok(json!({ "accessToken": "access" })),
        );

        let (status, body) = call(router).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({ "hook": "/app", "data": { "accessToken": "access" } })
        );
        assert_eq!(
            service.payloads.lock().unwrap().clone(),
            vec![AuthenticationPayload::new(Some(Principal(
                json!({ "name": "Bob" })
            )))]
        );
    }

    #[tokio::test]
    async fn failure_with_redirect_still_reaches_the_next_step() {
        let (router, _) = router(
            AuthenticationConfig::new("user", "github").with_failure_redirect("/login"),
            Err(ServiceError::Rejected("Auth Error".to_string())),
        );

        let (status, body) = call(router).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "hook": "/login", "data": null }));
    }

    #[tokio::test]
    async fn failure_without_redirect_short_circuits() {
        let (router, _) = router(
            AuthenticationConfig::new("user", "github"),
            Err(ServiceError::Rejected("Auth Error".to_string())),
        );

        let (status, body) = call(router).await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"]["code"], "UNAUTHORIZED");
    }
}
