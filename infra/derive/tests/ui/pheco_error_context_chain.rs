use pheco_derive::pheco_error;
use std::borrow::Cow;

#[pheco_error]
pub enum StoreError {
    #[error("IO error{}: {source}", format_context(.context))]
    Io { source: std::io::Error, context: Option<Cow<'static, str>> },

    #[error("Missing draft{}: {message}", format_context(.context))]
    Missing { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

fn open() -> Result<(), StoreError> {
    Err(std::io::Error::other("disk")).context("Opening drafts")
}

fn lookup() -> Result<(), StoreError> {
    Err(StoreError::Missing { message: "abc".into(), context: None }).context("Lookup")
}

fn main() {
    assert_eq!(open().unwrap_err().to_string(), "IO error (Opening drafts): disk");
    assert_eq!(lookup().unwrap_err().to_string(), "Missing draft (Lookup): abc");

    let converted: StoreError = std::io::Error::other("raw").into();
    assert!(matches!(converted, StoreError::Io { context: None, .. }));
}
