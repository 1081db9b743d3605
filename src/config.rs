/*
 * Responsibility
 * - 環境変数の読み込み (PORT, AUTH_SERVICE_URL, strategy ごとの redirect など)
 * - 設定値のバリデーション (不足・不正なら起動失敗)
 */
use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

use axum::http::HeaderValue;
use thiserror::Error;
use url::Url;

use crate::services::authentication::{
    AuthenticationConfig, types::AUTHENTICATION_SERVICE_PATH,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
    Development,
    Production,
}

impl AppEnv {
    fn parse(raw: Option<String>) -> Self {
        match raw
            .unwrap_or_else(|| "development".to_string())
            .to_ascii_lowercase()
            .as_str()
        {
            "production" | "prod" => Self::Production,
            _ => Self::Development,
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing configuration: {0}")]
    Missing(&'static str),
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone)]
pub struct Config {
    pub addr: SocketAddr,
    pub app_env: AppEnv,

    // external authentication server (POST target)
    pub auth_service_url: Url,
    // lookup path the service is registered under
    pub auth_service_path: String,
    pub strategies: Vec<AuthenticationConfig>,

    pub request_timeout: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the config from any key lookup (`std::env::var` in production).
    pub fn from_lookup<F>(var: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port: u16 = var("PORT").and_then(|s| s.parse().ok()).unwrap_or(3000);

        let addr: SocketAddr = SocketAddr::from_str(&format!("0.0.0.0:{}", port))
            .map_err(|_| ConfigError::Invalid("PORT".to_string()))?;

        let app_env = AppEnv::parse(var("APP_ENV"));

        let auth_service_url = var("AUTH_SERVICE_URL")
            .ok_or(ConfigError::Missing("AUTH_SERVICE_URL"))?;
        let auth_service_url = Url::parse(&auth_service_url)
            .ok()
            .filter(|u| matches!(u.scheme(), "http" | "https"))
            .ok_or_else(|| ConfigError::Invalid("AUTH_SERVICE_URL".to_string()))?;

        let auth_service_path = var("AUTH_SERVICE_PATH")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| AUTHENTICATION_SERVICE_PATH.to_string());
        if !auth_service_path.starts_with('/') {
            return Err(ConfigError::Invalid("AUTH_SERVICE_PATH".to_string()));
        }

        let entity = var("AUTH_ENTITY")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| "user".to_string());

        let names = var("AUTH_STRATEGIES")
            .unwrap_or_default()
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>();

        if names.is_empty() {
            return Err(ConfigError::Missing("AUTH_STRATEGIES"));
        }

        // Each name becomes one `/auth/{name}` route.
        for (i, name) in names.iter().enumerate() {
            if !is_path_segment(name) || names[..i].contains(name) {
                return Err(ConfigError::Invalid("AUTH_STRATEGIES".to_string()));
            }
        }

        let mut strategies = Vec::with_capacity(names.len());
        for name in names {
            let prefix = env_prefix(&name);
            let mut strategy = AuthenticationConfig::new(entity.clone(), name)
                .with_service_path(auth_service_path.clone());

            let key = format!("{prefix}_SUCCESS_REDIRECT");
            if let Some(url) = var(key.as_str()) {
                strategy = strategy.with_success_redirect(redirect_target(&key, url)?);
            }

            let key = format!("{prefix}_FAILURE_REDIRECT");
            if let Some(url) = var(key.as_str()) {
                strategy = strategy.with_failure_redirect(redirect_target(&key, url)?);
            }

            strategies.push(strategy);
        }

        let request_timeout_seconds = var("REQUEST_TIMEOUT_SECONDS")
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(30);

        Ok(Self {
            addr,
            app_env,
            auth_service_url,
            auth_service_path,
            strategies,
            request_timeout: Duration::from_secs(request_timeout_seconds),
        })
    }
}

// github -> AUTH_GITHUB, google-oauth -> AUTH_GOOGLE_OAUTH
fn env_prefix(name: &str) -> String {
    format!("AUTH_{}", name.to_ascii_uppercase().replace('-', "_"))
}

fn is_path_segment(name: &str) -> bool {
    name.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

/// A redirect is either an app-relative path or an absolute http(s) URL.
fn redirect_target(key: &str, raw: String) -> Result<String, ConfigError> {
    let raw = raw.trim().to_string();

    let valid = if raw.starts_with('/') {
        !raw.starts_with("//")
    } else {
        Url::parse(&raw)
            .map(|u| matches!(u.scheme(), "http" | "https"))
            .unwrap_or(false)
    };

    // Rendered as a `Location` header later on.
    if valid && HeaderValue::from_str(&raw).is_ok() {
        Ok(raw)
    } else {
        Err(ConfigError::Invalid(key.to_string()))
    }
}
