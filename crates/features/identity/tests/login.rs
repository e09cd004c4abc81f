use pheco_domain::config::IdentityConfig;
use pheco_domain::state::{AppState, UserType};
use pheco_identity::{AuthService, IdentityError, LoginForm, SimulatedAuthService, init};
use std::time::Duration;

fn form(email: &str, password: &str, user_type: UserType) -> LoginForm {
    LoginForm { email: email.to_owned(), password: password.to_owned(), user_type }
}

#[test]
fn init_creates_slice() {
    let slice = init(&IdentityConfig::default()).expect("init should succeed");
    assert_eq!(slice.id, std::any::TypeId::of::<pheco_identity::Identity>());
    assert_eq!(slice.state.name(), "Identity");

    let identity = slice.downcast_ref::<pheco_identity::Identity>().unwrap();
    assert_eq!(identity.config.min_password_len, 8);
}

#[test]
fn init_rejects_zero_password_length() {
    let config = IdentityConfig { min_password_len: 0, ..IdentityConfig::default() };
    assert!(matches!(init(&config), Err(IdentityError::Internal { .. })));
}

#[tokio::test(start_paused = true)]
async fn simulated_login_signs_in_after_delay() {
    let service = SimulatedAuthService::new(Duration::from_secs(1), 8);
    let started = tokio::time::Instant::now();

    let session = service.login(&form(" Owner@MediCare.in ", "password123", UserType::Customer)).await.unwrap();
    assert!(started.elapsed() >= Duration::from_secs(1));
    assert_eq!(session.email, "owner@medicare.in");
    assert_eq!(session.user_type, UserType::Customer);

    let mut state = AppState::default();
    state.sign_in(session);
    assert!(state.is_signed_in());
    assert_eq!(state.user_type, UserType::Customer);
}

#[tokio::test]
async fn malformed_form_is_refused() {
    let service = SimulatedAuthService::new(Duration::ZERO, 8);
    let err = service.login(&form("owner@medicare.in", "short", UserType::Merchant)).await.unwrap_err();

    assert!(matches!(err, IdentityError::InvalidCredentials { .. }));
    assert_eq!(err.to_string(), "Invalid credentials (password): Password must be at least 8 characters");
}
