use std::borrow::Cow;

/// Errors of the registration slice.
///
/// Field validation problems are not errors; they are reported as
/// [`crate::validation::ValidationErrors`].
#[pheco_derive::pheco_error]
pub enum RegistrationError {
    /// Draft file could not be read or written.
    #[error("Draft storage error{}: {source}", format_context(.context))]
    Io { source: std::io::Error, context: Option<Cow<'static, str>> },

    /// Draft could not be (de)serialized.
    #[error("Draft serialization error{}: {source}", format_context(.context))]
    Serialize { source: serde_json::Error, context: Option<Cow<'static, str>> },

    /// Document status change not allowed from the current status.
    #[error("Invalid document transition{}: {message}", format_context(.context))]
    InvalidTransition { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// File type not accepted by the target input.
    #[error("Unsupported file type{}: {message}", format_context(.context))]
    UnsupportedMime { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Unknown document{}: {message}", format_context(.context))]
    UnknownDocument { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// A form value that cannot be stored in its field (e.g. text in a number field).
    #[error("Invalid field value{}: {message}", format_context(.context))]
    InvalidFieldValue { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// Draft id unusable as a storage key.
    #[error("Invalid draft id{}: {message}", format_context(.context))]
    InvalidDraftId { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// Submission refused by the wizard or the registration service.
    #[error("Submission rejected{}: {message}", format_context(.context))]
    Rejected { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// Internal fallback for unexpected issues or logic errors.
    #[error("Internal registration error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}
