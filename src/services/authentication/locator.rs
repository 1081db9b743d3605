//! Service lookup by path.
//!
//! The handler receives a locator at construction time instead of reaching
//! into an application-wide registry through the request.
use std::{collections::HashMap, fmt, sync::Arc};

use super::service::{AuthenticationService, ServiceError};

pub type ServiceHandle = Arc<dyn AuthenticationService>;

pub trait ServiceLocator: Send + Sync {
    fn service(&self, path: &str) -> Result<ServiceHandle, ServiceError>;
}

impl<F> ServiceLocator for F
where
    F: Fn(&str) -> Result<ServiceHandle, ServiceError> + Send + Sync,
{
    fn service(&self, path: &str) -> Result<ServiceHandle, ServiceError> {
        self(path)
    }
}

/// Path-addressed services, filled once while wiring the app.
#[derive(Clone, Default)]
pub struct ServiceRegistry {
    services: HashMap<String, ServiceHandle>,
}

impl ServiceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_service(mut self, path: impl Into<String>, service: ServiceHandle) -> Self {
        self.services.insert(path.into(), service);
        self
    }
}

impl fmt::Debug for ServiceRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut paths: Vec<&String> = self.services.keys().collect();
        paths.sort();
        f.debug_struct("ServiceRegistry")
            .field("paths", &paths)
            .finish()
    }
}

impl ServiceLocator for ServiceRegistry {
    fn service(&self, path: &str) -> Result<ServiceHandle, ServiceError> {
        self.services
            .get(path)
            .cloned()
            .ok_or_else(|| ServiceError::NotFound {
                path: path.to_string(),
            })
    }
}
