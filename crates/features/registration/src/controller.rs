//! The wizard state machine.
//!
//! [`WizardController`] owns the draft, the current step and the last validation result.
//! State changes are synchronous; only saving and submitting await a collaborator.
//!
//! ```rust
//! use pheco_registration::{Field, WizardController, WizardStep};
//!
//! let mut wizard = WizardController::new();
//! assert!(!wizard.next());
//! assert!(wizard.errors().field(Field::StoreName).is_some());
//!
//! wizard.set_field(Field::StoreName, "MediCare").unwrap();
//! wizard.set_field(Field::GstNumber, "22AAAAA0000A1Z5").unwrap();
//! assert!(wizard.next());
//! assert_eq!(wizard.current_step(), WizardStep::OwnerInfo);
//! ```

use crate::attachment::Attachment;
use crate::documents::{DocumentSet, DocumentStatus};
use crate::draft::{ConsentRecord, Field, ImageSlot, LocationData, OwnerInfo, RegistrationDraft, StoreDetails, StoreSetup};
use crate::error::RegistrationError;
use crate::events::RegistrationEvent;
use crate::notification::Toast;
use crate::review::ReviewSummary;
use crate::service::{DraftStore, RegistrationService, SubmissionReceipt};
use crate::steps::{StepRenderer, StepView, WizardStep};
use crate::validation::{ValidationErrors, validate_step};
use pheco_event_bus::EventBus;
use tracing::{debug, info, warn};

#[derive(Debug, Clone)]
pub struct WizardController {
    draft: RegistrationDraft,
    current_step: WizardStep,
    errors: ValidationErrors,
    is_submitting: bool,
    is_saving: bool,
    is_success: bool,
    receipt: Option<SubmissionReceipt>,
    last_notification: Option<Toast>,
    events: Option<EventBus>,
}

impl Default for WizardController {
    fn default() -> Self {
        Self::resume(RegistrationDraft::default())
    }
}

impl WizardController {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Continues a saved draft from the first step.
    #[must_use]
    pub fn resume(draft: RegistrationDraft) -> Self {
        Self {
            draft,
            current_step: WizardStep::FIRST,
            errors: ValidationErrors::default(),
            is_submitting: false,
            is_saving: false,
            is_success: false,
            receipt: None,
            last_notification: None,
            events: None,
        }
    }

    /// Publishes [`RegistrationEvent`]s on `bus` from now on.
    #[must_use]
    pub fn with_events(mut self, bus: EventBus) -> Self {
        self.events = Some(bus);
        self
    }

    // --- Accessors ---

    #[must_use]
    pub const fn draft(&self) -> &RegistrationDraft {
        &self.draft
    }

    #[must_use]
    pub const fn current_step(&self) -> WizardStep {
        self.current_step
    }

    #[must_use]
    pub const fn errors(&self) -> &ValidationErrors {
        &self.errors
    }

    #[must_use]
    pub const fn is_submitting(&self) -> bool {
        self.is_submitting
    }

    #[must_use]
    pub const fn is_saving(&self) -> bool {
        self.is_saving
    }

    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.is_success
    }

    #[must_use]
    pub const fn receipt(&self) -> Option<&SubmissionReceipt> {
        self.receipt.as_ref()
    }

    #[must_use]
    pub const fn last_notification(&self) -> Option<&Toast> {
        self.last_notification.as_ref()
    }

    #[must_use]
    pub fn review(&self) -> ReviewSummary {
        ReviewSummary::project(&self.draft)
    }

    #[must_use]
    pub fn view(&self) -> StepView {
        StepRenderer::render(self)
    }

    // --- Editing ---

    pub fn edit_store_details(&mut self, edit: impl FnOnce(&mut StoreDetails)) {
        edit(&mut self.draft.store);
    }

    pub fn edit_owner_info(&mut self, edit: impl FnOnce(&mut OwnerInfo)) {
        edit(&mut self.draft.owner);
    }

    /// Direct access to the document set, e.g. to apply a reviewer's decision.
    pub fn edit_documents<R>(&mut self, edit: impl FnOnce(&mut DocumentSet) -> R) -> R {
        edit(&mut self.draft.documents)
    }

    pub fn edit_location(&mut self, edit: impl FnOnce(&mut LocationData)) {
        edit(&mut self.draft.location);
    }

    pub fn edit_store_setup(&mut self, edit: impl FnOnce(&mut StoreSetup)) {
        edit(&mut self.draft.setup);
    }

    pub fn edit_consent(&mut self, edit: impl FnOnce(&mut ConsentRecord)) {
        edit(&mut self.draft.consent);
    }

    /// Stores a form value and drops the error shown for that field. Other errors stay
    /// until the next validation.
    ///
    /// # Errors
    /// [`RegistrationError::InvalidFieldValue`] if the value does not fit the field.
    pub fn set_field(&mut self, field: Field, value: &str) -> Result<(), RegistrationError> {
        self.draft.set_field(field, value)?;
        self.errors.remove(field.as_ref());
        Ok(())
    }

    /// # Errors
    /// [`RegistrationError::UnsupportedMime`] for non-image files.
    pub fn set_image(&mut self, slot: ImageSlot, attachment: Attachment) -> Result<(), RegistrationError> {
        self.draft.set_image(slot, attachment)
    }

    /// Attaches (or replaces) the file of a document; the newest file wins.
    ///
    /// # Errors
    /// [`RegistrationError::UnknownDocument`] or [`RegistrationError::UnsupportedMime`].
    pub fn attach_document(&mut self, id: &str, attachment: Attachment) -> Result<DocumentStatus, RegistrationError> {
        let status = self.draft.documents.get_mut(id)?.attach(attachment)?;
        self.errors.remove(&format!("documents.{id}"));
        debug!(document = id, %status, "Document attached");
        Ok(status)
    }

    /// Clears a document's file and tells the user.
    ///
    /// # Errors
    /// [`RegistrationError::UnknownDocument`] if `id` is not part of the draft.
    pub fn remove_document(&mut self, id: &str) -> Result<(), RegistrationError> {
        let entry = self.draft.documents.get_mut(id)?;
        entry.remove_attachment();
        let message = format!("{} was removed", entry.display_name);
        self.notify(Toast::info("Document removed", message));
        Ok(())
    }

    // --- Navigation ---

    /// Validates the current step and advances on success. Returns whether the step was
    /// valid; on the last step a valid `next` stays put.
    pub fn next(&mut self) -> bool {
        let step = self.current_step;
        if !self.validate(step) {
            return false;
        }
        if let Some(to) = step.next() {
            self.move_to(to);
        }
        true
    }

    /// Steps back without validating; stays on the first step.
    pub fn back(&mut self) -> bool {
        match self.current_step.previous() {
            Some(to) => {
                self.move_to(to);
                true
            },
            None => false,
        }
    }

    /// Jumps back to an earlier step (`1..current`). The current step, later steps and
    /// unknown numbers are ignored.
    pub fn go_to_step(&mut self, number: u8) -> bool {
        match WizardStep::from_number(number) {
            Some(to) if to < self.current_step => {
                self.move_to(to);
                true
            },
            _ => false,
        }
    }

    fn move_to(&mut self, to: WizardStep) {
        let from = self.current_step;
        self.current_step = to;
        self.errors.clear();
        info!(from = from.number(), to = to.number(), "Wizard step changed");
        self.emit(RegistrationEvent::StepChanged { from, to });
    }

    /// Runs `step`'s rules, keeping the result as the current errors.
    fn validate(&mut self, step: WizardStep) -> bool {
        self.errors = validate_step(step, &self.draft);
        if self.errors.is_empty() {
            return true;
        }
        let fields: Vec<String> = self.errors.keys().map(str::to_owned).collect();
        debug!(step = step.number(), ?fields, "Step validation failed");
        self.emit(RegistrationEvent::ValidationFailed { step, fields });
        false
    }

    // --- Persistence ---

    /// Saves the draft through `store`. Raises a toast either way.
    ///
    /// # Errors
    /// Whatever the store reports.
    pub async fn save_draft(&mut self, store: &impl DraftStore) -> Result<(), RegistrationError> {
        let draft = self.begin_save();
        let result = store.save(&draft).await;
        self.finish_save(result)
    }

    /// First half of a save for event loops that cannot hold the controller across an
    /// await: marks the controller as saving and hands out a copy of the draft.
    pub fn begin_save(&mut self) -> RegistrationDraft {
        self.is_saving = true;
        self.draft.clone()
    }

    /// # Errors
    /// Returns `result` unchanged after recording it.
    pub fn finish_save(&mut self, result: Result<(), RegistrationError>) -> Result<(), RegistrationError> {
        self.is_saving = false;
        match &result {
            Ok(()) => {
                info!(draft = %self.draft.id, "Draft saved");
                self.emit(RegistrationEvent::DraftSaved { draft_id: self.draft.id.clone() });
                self.notify(Toast::success("Draft saved", "You can continue your registration later"));
            },
            Err(err) => {
                warn!(draft = %self.draft.id, error = %err, "Draft save failed");
                self.notify(Toast::error("Could not save draft", err.to_string()));
            },
        }
        result
    }

    // --- Submission ---

    /// First half of a submission: checks that the wizard is on the final step and that
    /// its rules pass, then marks the controller as submitting and hands out the draft.
    ///
    /// # Errors
    /// [`RegistrationError::Rejected`] when a submission is running, the wizard is not on
    /// the final step, or consents are incomplete. All but the first raise a toast.
    pub fn begin_submit(&mut self) -> Result<RegistrationDraft, RegistrationError> {
        if self.is_submitting {
            return Err(RegistrationError::Rejected { message: "submission already in progress".into(), context: None });
        }
        if !self.current_step.is_final() {
            return Err(self.reject("Complete every step before submitting"));
        }
        if !self.validate(self.current_step) || !self.draft.consent.is_complete() {
            return Err(self.reject("Please accept all consents and sign before submitting"));
        }

        self.is_submitting = true;
        info!(draft = %self.draft.id, "Submitting registration");
        Ok(self.draft.clone())
    }

    /// Second half of a submission. On success the draft is replaced by a fresh one and the
    /// wizard returns to the first step; on failure everything stays as it was.
    pub fn finish_submit(&mut self, result: Result<SubmissionReceipt, RegistrationError>) -> bool {
        self.is_submitting = false;
        match result {
            Ok(receipt) => {
                info!(reference = %receipt.reference, store = %receipt.store_name, "Registration submitted");
                self.emit(RegistrationEvent::Submitted {
                    reference: receipt.reference.clone(),
                    store_name: receipt.store_name.clone(),
                });
                self.notify(Toast::success(
                    "Registration submitted",
                    format!("Reference {}. We will verify your documents shortly", receipt.reference),
                ));
                self.is_success = true;
                self.receipt = Some(receipt);
                self.draft = RegistrationDraft::new();
                self.current_step = WizardStep::FIRST;
                self.errors.clear();
                true
            },
            Err(err) => {
                warn!(draft = %self.draft.id, error = %err, "Registration submission failed");
                self.notify(Toast::error("Submission failed", err.to_string()));
                false
            },
        }
    }

    /// Runs both halves against `service`. Returns whether the registration was accepted.
    pub async fn submit(&mut self, service: &impl RegistrationService) -> bool {
        let Ok(draft) = self.begin_submit() else {
            return false;
        };
        let result = service.submit(&draft).await;
        self.finish_submit(result)
    }

    /// Starts over with an empty draft.
    pub fn reset(&mut self) {
        let events = self.events.take();
        *self = Self::new();
        self.events = events;
    }

    fn reject(&mut self, message: &'static str) -> RegistrationError {
        warn!(step = self.current_step.number(), "Submission rejected: {message}");
        self.notify(Toast::error("Cannot submit yet", message));
        RegistrationError::Rejected { message: message.into(), context: None }
    }

    fn notify(&mut self, toast: Toast) {
        self.emit(RegistrationEvent::Notification(toast.clone()));
        self.last_notification = Some(toast);
    }

    fn emit(&self, event: RegistrationEvent) {
        if let Some(bus) = &self.events
            && let Err(err) = bus.publish(event)
        {
            warn!(error = %err, "Failed to publish registration event");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attachment::FileHandle;

    fn pdf() -> Attachment {
        Attachment::Uploaded(FileHandle::new("licence.pdf", "application/pdf", 2048))
    }

    #[test]
    fn set_field_clears_only_that_error() {
        let mut wizard = WizardController::new();
        assert!(!wizard.next());
        assert_eq!(wizard.errors().len(), 2);

        wizard.set_field(Field::StoreName, "MediCare").unwrap();
        assert!(wizard.errors().field(Field::StoreName).is_none());
        assert!(wizard.errors().field(Field::GstNumber).is_some());
    }

    #[test]
    fn go_to_step_only_moves_backwards() {
        let mut wizard = WizardController::new();
        assert!(!wizard.go_to_step(1));
        assert!(!wizard.go_to_step(0));

        wizard.edit_store_details(|s| {
            s.store_name = "MediCare".to_owned();
            s.gst_number = "22AAAAA0000A1Z5".to_owned();
        });
        assert!(wizard.next());
        assert!(!wizard.go_to_step(3));
        assert!(wizard.go_to_step(1));
        assert_eq!(wizard.current_step(), WizardStep::StoreDetails);
    }

    #[test]
    fn begin_submit_requires_final_step() {
        let mut wizard = WizardController::new();
        let err = wizard.begin_submit().unwrap_err();
        assert!(matches!(err, RegistrationError::Rejected { .. }));
        assert!(!wizard.is_submitting());
        assert_eq!(wizard.last_notification().map(|t| t.level), Some(crate::notification::ToastLevel::Error));
    }

    #[test]
    fn removing_a_document_raises_a_toast() {
        let mut wizard = WizardController::new();
        assert_eq!(wizard.attach_document("drugLicense", pdf()).unwrap(), DocumentStatus::Uploaded);
        wizard.remove_document("drugLicense").unwrap();

        let toast = wizard.last_notification().unwrap();
        assert_eq!(toast.title, "Document removed");
        assert_eq!(wizard.review().documents_uploaded, 0);
        assert!(wizard.remove_document("passport").is_err());
    }

    #[test]
    fn failed_submission_keeps_the_draft() {
        let mut wizard = WizardController::new();
        let id = wizard.draft().id.clone();
        wizard.finish_submit(Err("service unavailable".into()));

        assert!(!wizard.is_success());
        assert_eq!(wizard.draft().id, id);
        assert_eq!(wizard.last_notification().unwrap().title, "Submission failed");
    }

    #[test]
    fn reset_keeps_the_event_bus() {
        let bus = EventBus::new();
        let mut rx = bus.subscribe::<RegistrationEvent>().unwrap();
        let mut wizard = WizardController::new().with_events(bus);
        wizard.reset();
        wizard.remove_document("drugLicense").unwrap();
        assert!(matches!(*rx.try_recv().unwrap(), RegistrationEvent::Notification(_)));
    }
}
