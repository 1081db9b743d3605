pub mod handler;
pub mod locator;
pub mod remote;
pub mod service;
pub mod types;

pub use handler::AuthenticationHandler;
pub use locator::ServiceRegistry;
pub use remote::RemoteAuthenticationService;
pub use service::{AuthenticationService, ServiceError};
pub use types::{
    AuthRequest, AuthResponse, AuthenticationConfig, AuthenticationPayload, Principal,
    RedirectHook, ServiceResult,
};
