//! File attachments referenced by the draft.
//!
//! The browser hands us either raw bytes that are still local ([`Attachment::Pending`]) or a
//! handle to a file already uploaded ([`Attachment::Uploaded`]). Byte content is opaque here.

use crate::error::RegistrationError;
use pheco_kernel::safe_nanoid;
use serde::{Deserialize, Serialize};

/// Size mentioned in the upload copy ("max 5MB"). Not enforced.
pub const UPLOAD_SIZE_HINT_BYTES: u64 = 5 * 1024 * 1024;

const IMAGE_MIME_TYPES: &[&str] = &["image/jpeg", "image/png", "image/webp"];
const DOCUMENT_ONLY_MIME_TYPES: &[&str] = &["application/pdf"];

/// Which file input an attachment goes through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttachmentKind {
    Image,
    /// Licences and certificates: images or PDF.
    Document,
}

impl AttachmentKind {
    #[must_use]
    pub fn accepts(self, mime_type: &str) -> bool {
        let mime = mime_type.trim();
        let image = IMAGE_MIME_TYPES.iter().any(|m| m.eq_ignore_ascii_case(mime));
        match self {
            Self::Image => image,
            Self::Document => image || DOCUMENT_ONLY_MIME_TYPES.iter().any(|m| m.eq_ignore_ascii_case(mime)),
        }
    }

    /// Value for the HTML `accept` attribute.
    #[must_use]
    pub const fn accept_attribute(self) -> &'static str {
        match self {
            Self::Image => "image/jpeg,image/png,image/webp",
            Self::Document => "image/jpeg,image/png,image/webp,application/pdf",
        }
    }

    /// Fails with [`RegistrationError::UnsupportedMime`] unless `attachment` is empty or
    /// carries an accepted MIME type.
    ///
    /// # Errors
    /// See above.
    pub fn check(self, attachment: &Attachment) -> Result<(), RegistrationError> {
        match attachment.mime_type() {
            Some(mime) if !self.accepts(mime) => Err(RegistrationError::UnsupportedMime {
                message: format!("{mime} is not accepted for {self:?} uploads").into(),
                context: attachment.file_name().map(|n| n.to_owned().into()),
            }),
            _ => Ok(()),
        }
    }
}

/// Reference to a stored file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileHandle {
    pub id: String,
    pub file_name: String,
    pub mime_type: String,
    pub size_bytes: u64,
}

impl FileHandle {
    pub fn new(file_name: impl Into<String>, mime_type: impl Into<String>, size_bytes: u64) -> Self {
        Self { id: safe_nanoid!(), file_name: file_name.into(), mime_type: mime_type.into(), size_bytes }
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "camelCase")]
pub enum Attachment {
    #[default]
    Empty,
    /// Selected locally, bytes read but not uploaded yet.
    #[serde(rename_all = "camelCase")]
    Pending {
        file_name: String,
        mime_type: String,
        #[serde(with = "bytes_as_base64")]
        bytes: Vec<u8>,
    },
    Uploaded(FileHandle),
}

impl Attachment {
    pub fn pending(
        file_name: impl Into<String>,
        mime_type: impl Into<String>,
        bytes: impl Into<Vec<u8>>,
    ) -> Self {
        Self::Pending { file_name: file_name.into(), mime_type: mime_type.into(), bytes: bytes.into() }
    }

    /// A file chosen in a file input. Pickers do not always report a content type; the
    /// extension decides then, and unknown extensions end up as `application/octet-stream`.
    pub fn picked(file_name: impl Into<String>, mime_type: Option<&str>, bytes: impl Into<Vec<u8>>) -> Self {
        let file_name = file_name.into();
        let mime_type = match mime_type.map(str::trim) {
            Some(mime) if !mime.is_empty() => mime.to_owned(),
            _ => mime_from_extension(&file_name).to_owned(),
        };
        Self::pending(file_name, mime_type, bytes)
    }

    #[must_use]
    pub const fn is_present(&self) -> bool {
        !matches!(self, Self::Empty)
    }

    #[must_use]
    pub fn file_name(&self) -> Option<&str> {
        match self {
            Self::Empty => None,
            Self::Pending { file_name, .. } => Some(file_name),
            Self::Uploaded(handle) => Some(&handle.file_name),
        }
    }

    #[must_use]
    pub fn mime_type(&self) -> Option<&str> {
        match self {
            Self::Empty => None,
            Self::Pending { mime_type, .. } => Some(mime_type),
            Self::Uploaded(handle) => Some(&handle.mime_type),
        }
    }

    #[must_use]
    pub fn size_bytes(&self) -> u64 {
        match self {
            Self::Empty => 0,
            Self::Pending { bytes, .. } => bytes.len() as u64,
            Self::Uploaded(handle) => handle.size_bytes,
        }
    }

    #[must_use]
    pub fn exceeds_size_hint(&self) -> bool {
        self.size_bytes() > UPLOAD_SIZE_HINT_BYTES
    }
}

fn mime_from_extension(file_name: &str) -> &'static str {
    let extension = file_name.rsplit_once('.').map(|(_, ext)| ext.to_ascii_lowercase());
    match extension.as_deref() {
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("webp") => "image/webp",
        Some("pdf") => "application/pdf",
        _ => "application/octet-stream",
    }
}

/// Serializes pending bytes as standard Base64 without padding.
mod bytes_as_base64 {
    use base64::{Engine as _, engine::general_purpose};
    use serde::{Deserialize, Deserializer, Serializer};

    #[allow(clippy::ptr_arg)]
    pub(super) fn serialize<S: Serializer>(v: &Vec<u8>, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&general_purpose::STANDARD_NO_PAD.encode(v))
    }

    pub(super) fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<u8>, D::Error> {
        let encoded = String::deserialize(d)?;
        general_purpose::STANDARD_NO_PAD
            .decode(encoded.trim_end_matches('='))
            .map_err(|e| serde::de::Error::custom(format!("Invalid Base64: {e}")))
    }
}
