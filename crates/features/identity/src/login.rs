use crate::error::IdentityError;
use pheco_domain::config::IdentityConfig;
use pheco_domain::state::{UserSession, UserType};
use pheco_kernel::safe_nanoid;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::future::Future;
use std::sync::LazyLock;
use std::time::Duration;
use tracing::info;

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}$").expect("email pattern is valid")
});

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LoginForm {
    pub email: String,
    pub password: String,
    pub user_type: UserType,
}

/// Field name → message, empty when the form may be sent.
pub type LoginErrors = BTreeMap<&'static str, String>;

#[must_use]
pub fn validate_login(form: &LoginForm, min_password_len: usize) -> LoginErrors {
    let mut errors = LoginErrors::new();

    let email = form.email.trim();
    if email.is_empty() {
        errors.insert("email", "Email is required".to_owned());
    } else if !EMAIL_RE.is_match(email) {
        errors.insert("email", "Enter a valid email address".to_owned());
    }

    if form.password.is_empty() {
        errors.insert("password", "Password is required".to_owned());
    } else if form.password.chars().count() < min_password_len {
        errors.insert("password", format!("Password must be at least {min_password_len} characters"));
    }
    errors
}

pub trait AuthService {
    fn login(&self, form: &LoginForm) -> impl Future<Output = Result<UserSession, IdentityError>> + Send;
}

/// Accepts any well-formed form after a fixed delay.
#[derive(Debug, Clone)]
pub struct SimulatedAuthService {
    delay: Duration,
    min_password_len: usize,
}

impl Default for SimulatedAuthService {
    fn default() -> Self {
        Self::from_config(&IdentityConfig::default())
    }
}

impl SimulatedAuthService {
    #[must_use]
    pub const fn new(delay: Duration, min_password_len: usize) -> Self {
        Self { delay, min_password_len }
    }

    #[must_use]
    pub const fn from_config(config: &IdentityConfig) -> Self {
        Self::new(config.login_delay(), config.min_password_len)
    }
}

impl AuthService for SimulatedAuthService {
    async fn login(&self, form: &LoginForm) -> Result<UserSession, IdentityError> {
        let errors = validate_login(form, self.min_password_len);
        if let Some((field, message)) = errors.into_iter().next() {
            return Err(IdentityError::InvalidCredentials { message: message.into(), context: Some(field.into()) });
        }

        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        let session = UserSession {
            user_id: safe_nanoid!(),
            email: form.email.trim().to_ascii_lowercase(),
            user_type: form.user_type,
        };
        info!(user = %session.user_id, user_type = ?session.user_type, "User signed in");
        Ok(session)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(email: &str, password: &str) -> LoginForm {
        LoginForm { email: email.to_owned(), password: password.to_owned(), user_type: UserType::Merchant }
    }

    #[test]
    fn valid_form_has_no_errors() {
        assert!(validate_login(&form("owner@medicare.in", "s3cret-pass"), 8).is_empty());
    }

    #[test]
    fn reports_each_field() {
        let errors = validate_login(&form("owner@", "short"), 8);
        assert_eq!(errors.get("email").map(String::as_str), Some("Enter a valid email address"));
        assert_eq!(errors.get("password").map(String::as_str), Some("Password must be at least 8 characters"));

        let errors = validate_login(&LoginForm::default(), 8);
        assert_eq!(errors.get("email").map(String::as_str), Some("Email is required"));
        assert_eq!(errors.get("password").map(String::as_str), Some("Password is required"));
    }
}
