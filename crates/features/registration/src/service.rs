//! Collaborators the wizard hands work to: submission and draft persistence.

use crate::draft::RegistrationDraft;
use crate::error::{RegistrationError, RegistrationErrorExt};
use crate::validation::normalize_gstin;
use fxhash::FxHashMap;
use parking_lot::Mutex;
use pheco_domain::config::RegistrationConfig;
use pheco_kernel::safe_nanoid;
use serde::Serialize;
use std::future::Future;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

/// Accepted registration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionReceipt {
    /// `PHE-` followed by eight URL-safe characters.
    pub reference: String,
    pub store_name: String,
    pub gst_number: String,
}

pub trait RegistrationService {
    fn submit(
        &self,
        draft: &RegistrationDraft,
    ) -> impl Future<Output = Result<SubmissionReceipt, RegistrationError>> + Send;
}

/// Accepts every draft after a fixed delay.
#[derive(Debug, Clone, Default)]
pub struct SimulatedRegistrationService {
    delay: Duration,
}

impl SimulatedRegistrationService {
    #[must_use]
    pub const fn new(delay: Duration) -> Self {
        Self { delay }
    }

    #[must_use]
    pub const fn from_config(config: &RegistrationConfig) -> Self {
        Self::new(config.submit_delay())
    }
}

impl RegistrationService for SimulatedRegistrationService {
    async fn submit(&self, draft: &RegistrationDraft) -> Result<SubmissionReceipt, RegistrationError> {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        let receipt = SubmissionReceipt {
            reference: format!("PHE-{}", safe_nanoid!(8)),
            store_name: draft.store.store_name.trim().to_owned(),
            gst_number: normalize_gstin(&draft.store.gst_number),
        };
        info!(draft = %draft.id, reference = %receipt.reference, "Registration accepted");
        Ok(receipt)
    }
}

/// Persistence for unfinished drafts, keyed by draft id.
pub trait DraftStore {
    fn save(&self, draft: &RegistrationDraft) -> impl Future<Output = Result<(), RegistrationError>> + Send;

    fn load(
        &self,
        id: &str,
    ) -> impl Future<Output = Result<Option<RegistrationDraft>, RegistrationError>> + Send;

    /// Returns whether a draft was removed.
    fn delete(&self, id: &str) -> impl Future<Output = Result<bool, RegistrationError>> + Send;
}

/// Process-local store; clones share contents.
#[derive(Debug, Clone, Default)]
pub struct MemoryDraftStore {
    drafts: Arc<Mutex<FxHashMap<String, RegistrationDraft>>>,
    delay: Duration,
}

impl MemoryDraftStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulates save latency.
    #[must_use]
    pub const fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.drafts.lock().len()
    }
}

impl DraftStore for MemoryDraftStore {
    async fn save(&self, draft: &RegistrationDraft) -> Result<(), RegistrationError> {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.drafts.lock().insert(draft.id.clone(), draft.clone());
        Ok(())
    }

    async fn load(&self, id: &str) -> Result<Option<RegistrationDraft>, RegistrationError> {
        Ok(self.drafts.lock().get(id).cloned())
    }

    async fn delete(&self, id: &str) -> Result<bool, RegistrationError> {
        Ok(self.drafts.lock().remove(id).is_some())
    }
}

/// Writes each draft to `<dir>/<id>.json`.
#[derive(Debug, Clone)]
pub struct JsonFileDraftStore {
    dir: PathBuf,
}

impl JsonFileDraftStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    #[must_use]
    pub fn from_config(config: &RegistrationConfig) -> Self {
        Self::new(config.draft_dir.clone())
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// # Errors
    /// [`RegistrationError::InvalidDraftId`] unless `id` is non-empty and made of
    /// `[A-Za-z0-9_-]`, so it cannot escape the store directory.
    pub fn path_for(&self, id: &str) -> Result<PathBuf, RegistrationError> {
        let valid = !id.is_empty() && id.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(RegistrationError::InvalidDraftId { message: id.to_owned().into(), context: None });
        }
        Ok(self.dir.join(format!("{id}.json")))
    }

    /// Reads a draft from any JSON file, e.g. one given on the command line.
    ///
    /// # Errors
    /// I/O or JSON errors, with the path as context.
    pub async fn read_file(path: &Path) -> Result<RegistrationDraft, RegistrationError> {
        let bytes = tokio::fs::read(path).await.context(path.display().to_string())?;
        serde_json::from_slice(&bytes).context(path.display().to_string())
    }
}

impl DraftStore for JsonFileDraftStore {
    async fn save(&self, draft: &RegistrationDraft) -> Result<(), RegistrationError> {
        let path = self.path_for(&draft.id)?;
        tokio::fs::create_dir_all(&self.dir).await.context("Failed to create draft directory")?;

        let json = serde_json::to_vec_pretty(draft).context("Failed to encode draft")?;
        // Write then rename so a crash never leaves a truncated draft behind.
        let tmp = path.with_extension("json.tmp");
        tokio::fs::write(&tmp, json).await.context(tmp.display().to_string())?;
        tokio::fs::rename(&tmp, &path).await.context(path.display().to_string())?;

        debug!(path = %path.display(), "Draft written");
        Ok(())
    }

    async fn load(&self, id: &str) -> Result<Option<RegistrationDraft>, RegistrationError> {
        let path = self.path_for(id)?;
        match tokio::fs::read(&path).await {
            Ok(bytes) => Ok(Some(serde_json::from_slice(&bytes).context(path.display().to_string())?)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(RegistrationError::Io { source: err, context: Some(path.display().to_string().into()) }),
        }
    }

    async fn delete(&self, id: &str) -> Result<bool, RegistrationError> {
        let path = self.path_for(id)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(true),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(false),
            Err(err) => Err(RegistrationError::Io { source: err, context: Some(path.display().to_string().into()) }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn simulated_service_issues_references() {
        let mut draft = RegistrationDraft::new();
        draft.store.store_name = " MediCare ".to_owned();
        draft.store.gst_number = "22aaaaa0000a1z5".to_owned();

        let receipt = SimulatedRegistrationService::default().submit(&draft).await.unwrap();
        assert!(receipt.reference.starts_with("PHE-"));
        assert_eq!(receipt.reference.len(), 12);
        assert_eq!(receipt.store_name, "MediCare");
        assert_eq!(receipt.gst_number, "22AAAAA0000A1Z5");
    }

    #[tokio::test(start_paused = true)]
    async fn simulated_service_waits_for_its_delay() {
        let service = SimulatedRegistrationService::new(Duration::from_millis(1500));
        let started = tokio::time::Instant::now();
        service.submit(&RegistrationDraft::new()).await.unwrap();
        assert!(started.elapsed() >= Duration::from_millis(1500));
    }

    #[tokio::test]
    async fn memory_store_round_trip() {
        let store = MemoryDraftStore::new();
        let draft = RegistrationDraft::new();
        store.save(&draft).await.unwrap();

        assert_eq!(store.load(&draft.id).await.unwrap(), Some(draft.clone()));
        assert!(store.delete(&draft.id).await.unwrap());
        assert!(!store.delete(&draft.id).await.unwrap());
        assert_eq!(store.len(), 0);
    }

    #[test]
    fn file_store_rejects_path_like_ids() {
        let store = JsonFileDraftStore::new("drafts");
        assert!(store.path_for("abc_DEF-123").is_ok());
        for id in ["", "../escape", "a/b", "a.b"] {
            assert!(matches!(store.path_for(id), Err(RegistrationError::InvalidDraftId { .. })), "{id}");
        }
    }
}
