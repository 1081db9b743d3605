//! Authentication service interface consumed by the handler.
use async_trait::async_trait;
use thiserror::Error;

use super::types::{AuthRequest, AuthenticationPayload, ServiceResult};

/// Failure raised while resolving or calling an authentication service.
///
/// The handler treats every variant as the same opaque failure; the variants
/// only matter to the host when it renders an error response.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ServiceError {
    #[error("no service registered at {path}")]
    NotFound { path: String },

    #[error("authentication rejected: {0}")]
    Rejected(String),

    #[error("authentication backend error: {0}")]
    Backend(String),
}

/// Performs the actual authentication work (token issuance, provider exchange, ...).
#[async_trait]
pub trait AuthenticationService: Send + Sync {
    async fn create(
        &self,
        req: &AuthRequest,
        payload: AuthenticationPayload,
    ) -> Result<ServiceResult, ServiceError>;
}
