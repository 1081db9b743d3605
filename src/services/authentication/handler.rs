//! Orchestrates one authentication attempt: locate the service, call it with
//! the derived payload, then shape request/response state from the outcome.
//!
//! The returned `Result` is the pipeline continuation:
//! - `Ok(())`  => proceed (possibly to a redirect)
//! - `Err(e)`  => abort, the host handles `e`
use std::sync::Arc;

use tracing::{debug, warn};

use super::{
    locator::ServiceLocator,
    service::ServiceError,
    types::{
        AuthRequest, AuthResponse, AuthenticationConfig, AuthenticationPayload, RedirectHook,
        ServiceResult,
    },
};

#[derive(Clone)]
pub struct AuthenticationHandler {
    config: Arc<AuthenticationConfig>,
    locator: Arc<dyn ServiceLocator>,
}

impl std::fmt::Debug for AuthenticationHandler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthenticationHandler")
            .field("config", &self.config)
            .finish()
    }
}

impl AuthenticationHandler {
    pub fn new(config: AuthenticationConfig, locator: Arc<dyn ServiceLocator>) -> Self {
        Self {
            config: Arc::new(config),
            locator,
        }
    }

    pub fn config(&self) -> &AuthenticationConfig {
        &self.config
    }

    /// Run the handler for one request/response pair.
    ///
    /// Side effects: one locator call, one service call, at most one write to
    /// `req.hook`, at most one write to `res.data`.
    pub async fn handle(
        &self,
        req: &mut AuthRequest,
        res: &mut AuthResponse,
    ) -> Result<(), ServiceError> {
        match self.authenticate(req).await {
            Ok(result) => {
                res.data = Some(result);

                if let Some(url) = &self.config.success_redirect {
                    req.hook = Some(RedirectHook::to(url));
                }

                debug!(
                    strategy = %self.config.name,
                    entity = %self.config.entity,
                    redirect = ?self.config.success_redirect,
                    "authentication succeeded"
                );
                Ok(())
            }
            Err(err) => match &self.config.failure_redirect {
                Some(url) => {
                    warn!(
                        strategy = %self.config.name,
                        error = %err,
                        redirect = %url,
                        "authentication failed, redirecting"
                    );
                    req.hook = Some(RedirectHook::to(url));
                    Ok(())
                }
                None => {
                    warn!(strategy = %self.config.name, error = %err, "authentication failed");
                    Err(err)
                }
            },
        }
    }

    async fn authenticate(&self, req: &AuthRequest) -> Result<ServiceResult, ServiceError> {
        let path = self.config.service_path();
        let service = self.locator.service(path)?;

        let payload = AuthenticationPayload::new(req.user.clone());

        service.create(req, payload).await
    }
}
