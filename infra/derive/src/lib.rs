#![allow(unreachable_pub)]
#![allow(clippy::needless_pass_by_value)]

//! # Macros
//!
//! Procedural macros shared by the `PharmEco` workspace.
//!
//! * [`macro@pheco_error`] turns an enum into a `thiserror` error with context support.
//! * [`macro@pheco_slice`] wraps feature state into a cheaply clonable slice handle.
//! * [`macro@main`] bootstraps a profiled Tokio runtime for binaries.
//!
//! Examples below are `ignore`d because they need the consuming crates in scope.

mod macros;

use proc_macro::TokenStream;
use syn::{DeriveInput, ItemFn, ItemStruct, parse_macro_input};

/// Attribute macro to bootstrap a profiled Tokio runtime.
///
/// Turns an `async fn main` returning a `Result` into a synchronous `fn main`
/// that builds the runtime through `pheco_runtime::build_runtime_with_config`.
///
/// # Arguments
///
/// * `high_performance` - Larger stacks, longer keep-alive.
/// * `memory_efficient` - Half the worker threads, smaller stacks. Used by the CLI.
/// * `default` - Auto-detected worker threads.
///
/// # Examples
///
/// ```rust,ignore
/// #[pheco_runtime::main(memory_efficient)]
/// async fn main() -> anyhow::Result<()> {
///     Ok(())
/// }
/// ```
#[proc_macro_attribute]
pub fn main(args: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as ItemFn);
    macros::runtime::expand_main(args.into(), input).into()
}

/// Attribute macro for domain error enums.
///
/// # Generated Items
///
/// * `#[derive(Debug, thiserror::Error)]` unless already derived.
/// * `<ErrorName>Ext` trait with `.context(...)` for `Result<T, ErrorName>` and for
///   `Result<T, SourceError>` of every variant carrying a source.
/// * `From<SourceError>` for each variant with a `source` (or `#[source]`/`#[from]`) field.
/// * `From<&'static str>` and `From<String>` when an `Internal { message, context }` variant exists.
/// * A private `format_context` helper used in `#[error(...)]` strings.
///
/// # Requirements
///
/// Variants must use named fields. A variant with a source must also carry
/// `context: Option<Cow<'static, str>>`.
///
/// # Example
///
/// ```rust,ignore
/// use std::borrow::Cow;
///
/// #[pheco_derive::pheco_error]
/// pub enum StoreError {
///     #[error("IO error{}: {source}", format_context(.context))]
///     Io { source: std::io::Error, context: Option<Cow<'static, str>> },
///
///     #[error("Internal error{}: {message}", format_context(.context))]
///     Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
/// }
///
/// fn read(path: &str) -> Result<String, StoreError> {
///     std::fs::read_to_string(path).context("Reading draft")
/// }
/// ```
#[proc_macro_attribute]
pub fn pheco_error(_args: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as DeriveInput);
    macros::error::expand_derive(input).into()
}

/// Attribute macro to define a feature slice handle.
///
/// `struct Foo { .. }` becomes `FooInner { .. }` plus an `Arc`-backed `Foo` wrapper
/// that derefs to the inner state and implements `FeatureSlice` for registration.
///
/// # Example
/// ```rust,ignore
/// #[pheco_derive::pheco_slice]
/// pub struct Registration {
///     pub total_steps: u8,
/// }
///
/// let slice = Registration::new(RegistrationInner { total_steps: 6 });
/// ```
#[proc_macro_attribute]
pub fn pheco_slice(_attr: TokenStream, item: TokenStream) -> TokenStream {
    let input = syn::parse_macro_input!(item as ItemStruct);
    macros::slice::expand_slice(input).into()
}
