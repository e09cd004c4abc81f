use pheco_derive::pheco_error;
use std::borrow::Cow;

#[pheco_error]
pub enum DraftError {
    #[error("IO error{}: {source}", format_context(.context))]
    Io {
        #[source]
        source: std::io::Error,
        context: Option<Cow<'static, str>>,
    },

    #[error("Internal error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

fn main() {
    let err: DraftError = "boom".into();
    assert_eq!(err.to_string(), "Internal error: boom");
}
