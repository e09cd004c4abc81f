//! Merchant registration feature slice.
//!
//! A six-step wizard that collects a pharmacy's details, owner, documents, location,
//! operating setup and consents into a [`RegistrationDraft`], validates each step before
//! letting the merchant advance, and submits the result through a [`RegistrationService`].
//!
//! * [`WizardController`]: current step, errors and submission state.
//! * [`validation`]: per-step rules, reported as [`ValidationErrors`].
//! * [`StepRenderer`]: what a frontend needs to draw the current step.
//! * [`ReviewSummary`]: live preview derived from the draft.
//! * [`DraftStore`]: persistence of unfinished drafts.
//!
//! With the `client` feature the slice also ships Dioxus components.

mod attachment;
#[cfg(feature = "client")]
pub mod client;
mod controller;
mod documents;
mod draft;
mod error;
mod events;
mod notification;
mod review;
mod service;
mod steps;
pub mod validation;

pub use crate::attachment::{Attachment, AttachmentKind, FileHandle, UPLOAD_SIZE_HINT_BYTES};
pub use crate::controller::WizardController;
pub use crate::documents::{DocumentEntry, DocumentSet, DocumentStatus};
pub use crate::draft::{
    ConsentRecord, Field, ImageSlot, LocationData, OwnerInfo, PaymentMethod, RegistrationDraft, StoreDetails,
    StoreSetup, StoreType, Weekday,
};
pub use crate::error::{RegistrationError, RegistrationErrorExt};
pub use crate::events::RegistrationEvent;
pub use crate::notification::{Toast, ToastLevel};
pub use crate::review::{ReviewSummary, SectionStatus};
pub use crate::service::{
    DraftStore, JsonFileDraftStore, MemoryDraftStore, RegistrationService, SimulatedRegistrationService,
    SubmissionReceipt,
};
pub use crate::steps::{FieldKind, FieldSpec, StepRenderer, StepView, TOTAL_STEPS, WizardStep};
pub use crate::validation::{ValidationErrors, validate_step};

use pheco_domain::config::RegistrationConfig;
use pheco_event_bus::EventBus;
use pheco_kernel::domain::registry::InitializedSlice;

/// Registration slice state shared with the rest of the application.
#[pheco_derive::pheco_slice]
pub struct Registration {
    pub config: RegistrationConfig,
    pub events: EventBus,
}

impl Registration {
    /// A controller wired to the application event bus.
    #[must_use]
    pub fn controller(&self) -> WizardController {
        WizardController::new().with_events(self.events.clone())
    }

    /// Continues a saved draft, wired to the application event bus.
    #[must_use]
    pub fn resume(&self, draft: RegistrationDraft) -> WizardController {
        WizardController::resume(draft).with_events(self.events.clone())
    }

    #[must_use]
    pub fn service(&self) -> SimulatedRegistrationService {
        SimulatedRegistrationService::from_config(&self.config)
    }

    #[must_use]
    pub fn draft_store(&self) -> JsonFileDraftStore {
        JsonFileDraftStore::from_config(&self.config)
    }
}

/// Initializes the registration slice.
///
/// # Errors
/// [`RegistrationError::Internal`] if the event bus already carries a different channel
/// kind for [`RegistrationEvent`].
pub fn init(config: &RegistrationConfig, events: &EventBus) -> Result<InitializedSlice, RegistrationError> {
    if events.kind_of::<RegistrationEvent>().is_some_and(|kind| kind != pheco_event_bus::ChannelKind::Broadcast) {
        return Err("registration events must use a broadcast channel".into());
    }

    tracing::info!(
        submit_delay_ms = config.submit_delay_ms,
        draft_dir = %config.draft_dir.display(),
        "Registration feature initialized"
    );

    let slice = Registration::new(RegistrationInner { config: config.clone(), events: events.clone() });
    Ok(InitializedSlice::new(slice))
}
