/*
 * Responsibility
 * - handler が受け取る設定 (AuthenticationConfig) と、1 リクエスト分の型 (AuthRequest / AuthResponse)
 * - service に渡す payload と、下流に渡す redirect hook の形
 *
 * Notes
 * - ここに並ぶフィールドだけが契約。HTTP の詳細は middleware 側に閉じ込める
 */
use serde::{Deserialize, Serialize};

/// Default lookup path of the authentication service.
pub const AUTHENTICATION_SERVICE_PATH: &str = "/authentication";

/// Opaque value returned by an authentication service (e.g. `{ "accessToken": ... }`).
pub type ServiceResult = serde_json::Value;

/// Per-strategy settings. Built once at wiring time and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticationConfig {
    pub entity: String,
    pub name: String,
    pub success_redirect: Option<String>,
    pub failure_redirect: Option<String>,
    pub service_path: String,
}

impl AuthenticationConfig {
    pub fn new(entity: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            entity: entity.into(),
            name: name.into(),
            success_redirect: None,
            failure_redirect: None,
            service_path: AUTHENTICATION_SERVICE_PATH.to_string(),
        }
    }

    pub fn with_success_redirect(mut self, url: impl Into<String>) -> Self {
        self.success_redirect = Some(url.into());
        self
    }

    pub fn with_failure_redirect(mut self, url: impl Into<String>) -> Self {
        self.failure_redirect = Some(url.into());
        self
    }

    pub fn with_service_path(mut self, path: impl Into<String>) -> Self {
        self.service_path = path.into();
        self
    }

    /// Path handed to the service locator (the host's auth settings, not the strategy name).
    pub fn service_path(&self) -> &str {
        &self.service_path
    }
}

/// Principal resolved by an upstream step. The shape is not inspected here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Principal(pub serde_json::Value);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Redirect {
    pub url: String,
}

/// `{ "redirect": { "url": ... } }` attached to the request for a downstream renderer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RedirectHook {
    pub redirect: Redirect,
}

impl RedirectHook {
    pub fn to(url: impl Into<String>) -> Self {
        Self {
            redirect: Redirect { url: url.into() },
        }
    }

    pub fn url(&self) -> &str {
        &self.redirect.url
    }
}

/// In-flight request state seen by the handler.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AuthRequest {
    pub user: Option<Principal>,
    pub hook: Option<RedirectHook>,
}

impl AuthRequest {
    pub fn new(user: Option<Principal>) -> Self {
        Self { user, hook: None }
    }
}

/// Outgoing response state. `data` is only ever set on success.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AuthResponse {
    pub data: Option<ServiceResult>,
}

/// Body passed to `AuthenticationService::create`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AuthenticationPayload {
    pub authenticated: bool,
    pub user: Option<Principal>,
}

impl AuthenticationPayload {
    pub fn new(user: Option<Principal>) -> Self {
        Self {
            authenticated: true,
            user,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn payload_serializes_as_authenticated_user() {
        let payload = AuthenticationPayload::new(Some(Principal(json!({ "name": "Bob" }))));

        assert_eq!(
            serde_json::to_value(&payload).unwrap(),
            json!({ "authenticated": true, "user": { "name": "Bob" } })
        );
    }

    #[test]
    fn redirect_hook_has_nested_url() {
        let hook = RedirectHook::to("/app");

        assert_eq!(hook.url(), "/app");
        assert_eq!(
            serde_json::to_value(&hook).unwrap(),
            json!({ "redirect": { "url": "/app" } })
        );
    }

    #[test]
    fn service_path_defaults_to_authentication() {
        let github = AuthenticationConfig::new("user", "github");
        let local = AuthenticationConfig::new("account", "local").with_service_path("/auth");

        assert_eq!(github.service_path(), "/authentication");
        assert_eq!(local.service_path(), "/auth");
    }
}
