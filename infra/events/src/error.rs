use std::borrow::Cow;

/// Errors that can occur during event bus operations.
#[pheco_derive::pheco_error]
pub enum EventBusError {
    /// The event type is registered with a different channel kind (broadcast vs watch).
    #[error("Channel kind mismatch{}: {message}", format_context(.context))]
    ChannelKindMismatch { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// Bounded channels need at least one slot.
    #[error("Invalid capacity{}: {message}", format_context(.context))]
    InvalidCapacity { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// Registry invariant broken: the stored sender does not match the event type.
    #[error("Internal event bus error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}
