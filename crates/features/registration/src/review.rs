//! Read-only summary of a draft for the live preview and the consent step.

use crate::draft::{RegistrationDraft, StoreType};
use crate::steps::WizardStep;
use crate::validation::validate_step;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionStatus {
    pub step: WizardStep,
    pub title: String,
    /// The step's rules pass for the current draft.
    pub complete: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewSummary {
    pub store_name: String,
    pub store_type: StoreType,
    pub owner_name: String,
    /// Owner email, falling back to the store email.
    pub contact_email: String,
    pub city: String,
    pub pincode: String,
    pub sections: Vec<SectionStatus>,
    pub documents_uploaded: usize,
    pub documents_total: usize,
    pub required_documents_missing: usize,
    pub has_logo: bool,
    pub has_owner_photo: bool,
    pub has_storefront_photo: bool,
    /// 0 to 4.
    pub consents_granted: usize,
    /// Attachments above the advertised upload size.
    pub oversized_attachments: usize,
    pub ready_to_submit: bool,
}

impl ReviewSummary {
    #[must_use]
    pub fn project(draft: &RegistrationDraft) -> Self {
        let sections: Vec<SectionStatus> = WizardStep::all()
            .map(|step| SectionStatus {
                step,
                title: step.title(),
                complete: validate_step(step, draft).is_empty(),
            })
            .collect();
        let ready_to_submit = sections.iter().all(|s| s.complete);

        let owner_email = draft.owner.email.trim();
        let contact_email = if owner_email.is_empty() { draft.store.store_email.trim() } else { owner_email };

        Self {
            store_name: draft.store.store_name.trim().to_owned(),
            store_type: draft.store.store_type,
            owner_name: draft.owner.owner_name.trim().to_owned(),
            contact_email: contact_email.to_owned(),
            city: draft.location.city.trim().to_owned(),
            pincode: draft.location.pincode.trim().to_owned(),
            sections,
            documents_uploaded: draft.documents.uploaded_count(),
            documents_total: draft.documents.len(),
            required_documents_missing: draft.documents.required_missing(),
            has_logo: draft.store.logo.is_present(),
            has_owner_photo: draft.owner.photo.is_present(),
            has_storefront_photo: draft.location.storefront_photo.is_present(),
            consents_granted: draft.consent.granted_count(),
            oversized_attachments: draft.attachments().filter(|a| a.exceeds_size_hint()).count(),
            ready_to_submit,
        }
    }

    #[must_use]
    pub fn completed_sections(&self) -> usize {
        self.sections.iter().filter(|s| s.complete).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attachment::{Attachment, FileHandle};

    #[test]
    fn empty_draft_only_has_default_sections_complete() {
        let summary = ReviewSummary::project(&RegistrationDraft::new());
        let complete: Vec<WizardStep> = summary.sections.iter().filter(|s| s.complete).map(|s| s.step).collect();
        assert_eq!(complete, vec![WizardStep::Documents, WizardStep::StoreSetup]);
        assert!(!summary.ready_to_submit);
        assert_eq!(summary.documents_total, 4);
        assert_eq!(summary.required_documents_missing, 3);
        assert_eq!(summary.consents_granted, 0);
    }

    #[test]
    fn counts_reflect_attachments() {
        let mut draft = RegistrationDraft::new();
        draft.store.store_email = "info@medicare.in".to_owned();
        draft.location.storefront_photo = Attachment::pending("front.jpg", "image/jpeg", vec![0; 8]);
        draft
            .documents
            .get_mut("drugLicense")
            .unwrap()
            .attach(Attachment::Uploaded(FileHandle::new("dl.pdf", "application/pdf", 6 * 1024 * 1024)))
            .unwrap();
        draft.consent.terms_accepted = true;

        let summary = ReviewSummary::project(&draft);
        assert_eq!(summary.contact_email, "info@medicare.in");
        assert!(summary.has_storefront_photo);
        assert!(!summary.has_logo);
        assert_eq!(summary.documents_uploaded, 1);
        assert_eq!(summary.required_documents_missing, 2);
        assert_eq!(summary.oversized_attachments, 1);
        assert_eq!(summary.consents_granted, 1);
        assert_eq!(summary.completed_sections(), 2);
    }
}
