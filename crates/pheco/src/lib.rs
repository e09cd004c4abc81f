//! Facade crate for `PharmEco` features and shared modules.
//! Re-exports domain/kernel primitives and aggregates feature initialization.
//! Keep this crate thin: it should compose other crates, not implement business logic.
//!
//! ## Usage
//! - Add `pheco` (with `client` for the Dioxus components).
//! - Call [`init`] once at startup and keep the returned slices.

pub use pheco_domain as domain;
use pheco_domain::config::AppConfig;
pub use pheco_event_bus as events;
use pheco_event_bus::EventBus;
pub use pheco_kernel as kernel;

/// Feature registry for runtime introspection.
pub mod features {
    pub use pheco_identity as identity;
    pub use pheco_registration as registration;

    /// Build-time enabled features (by Cargo feature).
    pub const ENABLED: &[&str] = &[
        "identity",
        "registration",
        #[cfg(feature = "client")]
        "client",
    ];

    #[must_use]
    pub fn is_enabled(name: &str) -> bool {
        ENABLED.contains(&name)
    }
}

/// Initialize all feature slices.
///
/// # Errors
/// Returns an error if any feature initialization fails.
pub fn init(
    config: &AppConfig,
    events: &EventBus,
) -> Result<Vec<domain::registry::InitializedSlice>, Box<dyn std::error::Error>> {
    let mut slices = Vec::new();

    // Identity
    slices.push(features::identity::init(&config.identity)?);

    // Merchant registration
    slices.push(features::registration::init(&config.registration, events)?);

    tracing::debug!(count = slices.len(), "Feature slices initialized");
    Ok(slices)
}
