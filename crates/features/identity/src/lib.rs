//! Identity feature slice: login form rules and a simulated sign-in service.

mod error;
mod login;

pub use crate::error::{IdentityError, IdentityErrorExt};
pub use crate::login::{AuthService, LoginErrors, LoginForm, SimulatedAuthService, validate_login};
use pheco_domain::config::IdentityConfig;
use pheco_kernel::domain::registry::InitializedSlice;

/// Identity feature state
#[pheco_derive::pheco_slice]
pub struct Identity {
    pub config: IdentityConfig,
}

impl Identity {
    #[must_use]
    pub fn auth_service(&self) -> SimulatedAuthService {
        SimulatedAuthService::from_config(&self.config)
    }
}

/// Initialize the identity feature.
///
/// # Errors
/// [`IdentityError::Internal`] when no password length is configured.
pub fn init(config: &IdentityConfig) -> Result<InitializedSlice, IdentityError> {
    if config.min_password_len == 0 {
        return Err("identity.min_password_len must be at least 1".into());
    }
    tracing::info!(min_password_len = config.min_password_len, "Identity feature initialized");

    let slice = Identity::new(IdentityInner { config: config.clone() });

    Ok(InitializedSlice::new(slice))
}
