use serde::Deserialize;
use std::ops::{Deref, DerefMut};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

/// Top-level application configuration.
#[derive(Default, Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfigInner {
    pub registration: RegistrationConfig,
    pub identity: IdentityConfig,
    pub logging: LoggingConfig,
}

/// Thin Arc-wrapped config for inexpensive cloning into subsystems.
#[derive(Default, Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(flatten, default)]
    inner: Arc<AppConfigInner>,
}

impl Deref for AppConfig {
    type Target = AppConfigInner;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl DerefMut for AppConfig {
    fn deref_mut(&mut self) -> &mut AppConfigInner {
        Arc::make_mut(&mut self.inner)
    }
}

/// Merchant registration wizard settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RegistrationConfig {
    /// Latency of the simulated submission service.
    pub submit_delay_ms: u64,
    /// Latency of the simulated draft save.
    pub save_delay_ms: u64,
    /// Where the file-backed draft store keeps `<draft-id>.json`.
    pub draft_dir: PathBuf,
}

/// Login screen settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct IdentityConfig {
    pub login_delay_ms: u64,
    pub min_password_len: usize,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    /// Enables rolling file logs in this directory.
    pub directory: Option<PathBuf>,
    pub json: bool,
}

impl RegistrationConfig {
    #[must_use]
    pub const fn submit_delay(&self) -> Duration {
        Duration::from_millis(self.submit_delay_ms)
    }

    #[must_use]
    pub const fn save_delay(&self) -> Duration {
        Duration::from_millis(self.save_delay_ms)
    }
}

impl IdentityConfig {
    #[must_use]
    pub const fn login_delay(&self) -> Duration {
        Duration::from_millis(self.login_delay_ms)
    }
}

// --- Default ---

impl Default for RegistrationConfig {
    fn default() -> Self {
        Self { submit_delay_ms: 1500, save_delay_ms: 500, draft_dir: PathBuf::from("drafts") }
    }
}

impl Default for IdentityConfig {
    fn default() -> Self {
        Self { login_delay_ms: 1000, min_password_len: 8 }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: "info".to_owned(), directory: None, json: false }
    }
}
