//! Licence and certificate uploads collected in the documents step.

use crate::attachment::{Attachment, AttachmentKind};
use crate::error::RegistrationError;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "lowercase")]
pub enum DocumentStatus {
    #[default]
    Pending,
    Uploaded,
    /// Set by an external reviewer.
    Verified,
    /// Set by an external reviewer; the merchant must upload a replacement.
    Rejected,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentEntry {
    pub id: String,
    pub display_name: String,
    pub required: bool,
    #[serde(default)]
    pub attachment: Attachment,
    #[serde(default)]
    pub status: DocumentStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rejection_reason: Option<String>,
}

impl DocumentEntry {
    pub fn new(id: impl Into<String>, display_name: impl Into<String>, required: bool) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
            required,
            attachment: Attachment::Empty,
            status: DocumentStatus::Pending,
            rejection_reason: None,
        }
    }

    /// Sets the file; any non-empty attachment moves the entry to `Uploaded`,
    /// including replacements of verified or rejected files. An empty attachment
    /// behaves like [`DocumentEntry::remove_attachment`].
    ///
    /// # Errors
    /// [`RegistrationError::UnsupportedMime`] for files other than images or PDF.
    pub fn attach(&mut self, attachment: Attachment) -> Result<DocumentStatus, RegistrationError> {
        if !attachment.is_present() {
            self.remove_attachment();
            return Ok(self.status);
        }
        AttachmentKind::Document.check(&attachment)?;
        self.attachment = attachment;
        self.status = DocumentStatus::Uploaded;
        self.rejection_reason = None;
        Ok(self.status)
    }

    pub fn remove_attachment(&mut self) {
        self.attachment = Attachment::Empty;
        self.status = DocumentStatus::Pending;
        self.rejection_reason = None;
    }

    /// # Errors
    /// [`RegistrationError::InvalidTransition`] unless the entry is `Uploaded`.
    pub fn verify(&mut self) -> Result<(), RegistrationError> {
        self.review_transition(DocumentStatus::Verified)?;
        self.status = DocumentStatus::Verified;
        Ok(())
    }

    /// # Errors
    /// [`RegistrationError::InvalidTransition`] unless the entry is `Uploaded`.
    pub fn reject(&mut self, reason: impl Into<String>) -> Result<(), RegistrationError> {
        self.review_transition(DocumentStatus::Rejected)?;
        self.status = DocumentStatus::Rejected;
        self.rejection_reason = Some(reason.into());
        Ok(())
    }

    fn review_transition(&self, to: DocumentStatus) -> Result<(), RegistrationError> {
        if self.status == DocumentStatus::Uploaded {
            return Ok(());
        }
        Err(RegistrationError::InvalidTransition {
            message: format!("{} -> {to}", self.status).into(),
            context: Some(self.id.clone().into()),
        })
    }
}

/// Ordered set of documents the merchant can upload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentSet {
    entries: Vec<DocumentEntry>,
}

impl Default for DocumentSet {
    fn default() -> Self {
        Self {
            entries: vec![
                DocumentEntry::new("drugLicense", "Drug Licence (Form 20/21)", true),
                DocumentEntry::new("gstCertificate", "GST Registration Certificate", true),
                DocumentEntry::new("pharmacistCertificate", "Registered Pharmacist Certificate", true),
                DocumentEntry::new("shopEstablishment", "Shop & Establishment Certificate", false),
            ],
        }
    }
}

impl DocumentSet {
    #[must_use]
    pub const fn new(entries: Vec<DocumentEntry>) -> Self {
        Self { entries }
    }

    pub fn iter(&self) -> impl Iterator<Item = &DocumentEntry> {
        self.entries.iter()
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<&DocumentEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    /// # Errors
    /// [`RegistrationError::UnknownDocument`] if no entry has this id.
    pub fn get_mut(&mut self, id: &str) -> Result<&mut DocumentEntry, RegistrationError> {
        self.entries.iter_mut().find(|e| e.id == id).ok_or_else(|| {
            RegistrationError::UnknownDocument { message: id.to_owned().into(), context: None }
        })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Entries with a file attached, whatever their review status.
    #[must_use]
    pub fn uploaded_count(&self) -> usize {
        self.entries.iter().filter(|e| e.attachment.is_present()).count()
    }

    #[must_use]
    pub fn required_missing(&self) -> usize {
        self.entries.iter().filter(|e| e.required && !e.attachment.is_present()).count()
    }

    pub fn attachments(&self) -> impl Iterator<Item = &Attachment> {
        self.entries.iter().map(|e| &e.attachment)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attachment::FileHandle;

    fn pdf() -> Attachment {
        Attachment::Uploaded(FileHandle::new("licence.pdf", "application/pdf", 1024))
    }

    #[test]
    fn status_follows_attachment_lifecycle() {
        let mut entry = DocumentEntry::new("drugLicense", "Drug Licence", true);
        assert_eq!(entry.status, DocumentStatus::Pending);

        assert_eq!(entry.attach(pdf()).unwrap(), DocumentStatus::Uploaded);
        entry.verify().unwrap();
        assert_eq!(entry.status, DocumentStatus::Verified);

        entry.remove_attachment();
        assert_eq!(entry.status, DocumentStatus::Pending);
        assert!(!entry.attachment.is_present());
    }

    #[test]
    fn review_requires_an_upload() {
        let mut entry = DocumentEntry::new("gstCertificate", "GST", true);
        let err = entry.verify().unwrap_err();
        assert!(matches!(err, RegistrationError::InvalidTransition { .. }));
        assert_eq!(err.to_string(), "Invalid document transition (gstCertificate): pending -> verified");

        entry.attach(pdf()).unwrap();
        entry.reject("Blurry scan").unwrap();
        assert_eq!(entry.status, DocumentStatus::Rejected);
        assert!(entry.verify().is_err());

        entry.attach(pdf()).unwrap();
        assert_eq!(entry.status, DocumentStatus::Uploaded);
        assert!(entry.rejection_reason.is_none());
    }

    #[test]
    fn attaching_empty_resets_to_pending() {
        let mut entry = DocumentEntry::new("shopEstablishment", "Shop", false);
        entry.attach(pdf()).unwrap();
        assert_eq!(entry.attach(Attachment::Empty).unwrap(), DocumentStatus::Pending);
    }

    #[test]
    fn default_set_counts() {
        let mut set = DocumentSet::default();
        assert_eq!(set.len(), 4);
        assert_eq!(set.required_missing(), 3);

        set.get_mut("drugLicense").unwrap().attach(pdf()).unwrap();
        assert_eq!(set.uploaded_count(), 1);
        assert_eq!(set.required_missing(), 2);
        assert!(set.get_mut("passport").is_err());
    }
}
