//! `AuthenticationService` backed by an external HTTP authentication server.
//!
//! The payload is POSTed as JSON; the server's JSON answer is handed back
//! verbatim so the handler can expose it as response data.
use async_trait::async_trait;
use reqwest::StatusCode;
use tracing::{debug, error};
use url::Url;

use super::{
    service::{AuthenticationService, ServiceError},
    types::{AuthRequest, AuthenticationPayload, ServiceResult},
};

#[derive(Clone, Debug)]
pub struct RemoteAuthenticationService {
    client: reqwest::Client,
    endpoint: Url,
}

impl RemoteAuthenticationService {
    pub fn new(endpoint: Url) -> Self {
        Self::with_client(reqwest::Client::new(), endpoint)
    }

    /// Use a preconfigured client (timeouts, TLS roots, proxies).
    pub fn with_client(client: reqwest::Client, endpoint: Url) -> Self {
        Self { client, endpoint }
    }
}

#[async_trait]
impl AuthenticationService for RemoteAuthenticationService {
    async fn create(
        &self,
        _req: &AuthRequest,
        payload: AuthenticationPayload,
    ) -> Result<ServiceResult, ServiceError> {
        debug!(endpoint = %self.endpoint, "calling authentication server");

        let resp = self
            .client
            .post(self.endpoint.clone())
            .json(&payload)
            .send()
            .await
            .map_err(|e| {
                error!(endpoint = %self.endpoint, error = %e, "authentication server unreachable");
                ServiceError::Backend(e.to_string())
            })?;

        let status = resp.status();
        if status.is_success() {
            return resp
                .json::<ServiceResult>()
                .await
                .map_err(|e| ServiceError::Backend(format!("invalid response body: {e}")));
        }

        // Keep the server's own message when it sent one.
        let body = resp.text().await.unwrap_or_default();
        let message = if body.trim().is_empty() {
            status.to_string()
        } else {
            body
        };

        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                Err(ServiceError::Rejected(message))
            }
            _ => {
                error!(endpoint = %self.endpoint, %status, "authentication server error");
                Err(ServiceError::Backend(message))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::services::authentication::types::Principal;

    fn endpoint(server: &MockServer) -> Url {
        Url::parse(&format!("{}/authentication", server.uri())).unwrap()
    }

    fn payload() -> AuthenticationPayload {
        AuthenticationPayload::new(Some(Principal(json!({ "name": "Bob" }))))
    }

    #[tokio::test]
    async fn returns_server_json_verbatim() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/authentication"))
            .and(header("content-type", "application/json"))
            .and(body_json(json!({ "authenticated": true, "user": { "name": "Bob" } })))
            .respond_with(
                ResponseTemplate::new(201).set_body_json(json!({ "accessToken": "access" })),
            )
            .expect(1)
            .mount(&server)
            .await;

        let service = RemoteAuthenticationService::new(endpoint(&server));
        let out = service
            .create(&AuthRequest::default(), payload())
            .await
            .unwrap();

        assert_eq!(out, json!({ "accessToken": "access" }));
    }

    #[tokio::test]
    async fn preconfigured_client_reaches_the_server() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/authentication"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "ok": true })))
            .expect(1)
            .mount(&server)
            .await;

        let client = reqwest::Client::builder()
            .connect_timeout(std::time::Duration::from_secs(1))
            .build()
            .unwrap();
        let service = RemoteAuthenticationService::with_client(client, endpoint(&server));
        let out = service
            .create(&AuthRequest::default(), payload())
            .await
            .unwrap();

        assert_eq!(out, json!({ "ok": true }));
    }

    #[tokio::test]
    async fn unauthorized_is_a_rejection() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/authentication"))
            .respond_with(ResponseTemplate::new(401).set_body_string("Auth Error"))
            .mount(&server)
            .await;

        let service = RemoteAuthenticationService::new(endpoint(&server));
        let err = service
            .create(&AuthRequest::default(), payload())
            .await
            .unwrap_err();

        assert_eq!(err, ServiceError::Rejected("Auth Error".to_string()));
    }

    #[tokio::test]
    async fn server_error_is_a_backend_failure() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/authentication"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let service = RemoteAuthenticationService::new(endpoint(&server));
        let err = service
            .create(&AuthRequest::default(), payload())
            .await
            .unwrap_err();

        assert!(matches!(err, ServiceError::Backend(_)));
    }

    #[tokio::test]
    async fn non_json_success_is_a_backend_failure() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/authentication"))
            .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
            .mount(&server)
            .await;

        let service = RemoteAuthenticationService::new(endpoint(&server));
        let err = service
            .create(&AuthRequest::default(), payload())
            .await
            .unwrap_err();

        assert!(matches!(err, ServiceError::Backend(_)));
    }
}
