#![allow(unreachable_pub)]
#![allow(clippy::needless_pass_by_value)]

//! # Macros
//!
//! Procedural macros shared by the workspace.
//! * [`macro@modkit_error`] turns a plain enum into a context-aware error type.
//! * [`macro@component`] marks a struct as a registry component so the container can
//!   hand it out as `Arc<dyn Component>` and downcast it back.
//!
//! Examples are `ignore`d here; the consuming crates exercise them in their own tests.

mod macros;

use proc_macro::TokenStream;
use syn::{DeriveInput, ItemStruct, parse_macro_input};

/// Attribute macro for defining crate-level error enums.
///
/// # Generated Items
///
/// * `#[derive(Debug, thiserror::Error)]` when those derives are missing.
/// * `<ErrorName>Ext` trait with `.context(...)` for `Result<T, ErrorName>` and for
///   `Result<T, SourceError>` of every variant made of exactly `source` and `context`.
/// * `From<SourceError>` for those same variants. Variants with extra fields are built by hand.
/// * `ErrorName::context_message()` returning the attached context, if any.
/// * `From<&'static str>` and `From<String>` when an `Internal { message, context }` variant exists.
/// * A private `format_context` helper used inside `#[error(...)]` strings.
///
/// # Requirements
///
/// 1. The macro must be applied to an **enum** with named-field variants only.
/// 2. A `context` field must be typed `Option<Cow<'static, str>>`.
/// 3. Variants with a source (`source` field, `#[source]` or `#[from]`) must carry a `context` field.
///
/// # Example
///
/// ```rust,ignore
/// use std::borrow::Cow;
///
/// #[modkit_derive::modkit_error]
/// pub enum ProbeError {
///     #[error("Unreadable path{}: {source}", format_context(.context))]
///     Unreadable { source: std::io::Error, context: Option<Cow<'static, str>> },
///
///     #[error("Internal probe error{}: {message}", format_context(.context))]
///     Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
/// }
///
/// fn list(path: &std::path::Path) -> Result<std::fs::ReadDir, ProbeError> {
///     std::fs::read_dir(path).context(format!("Listing {}", path.display()))
/// }
/// ```
#[proc_macro_attribute]
pub fn modkit_error(_args: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as DeriveInput);
    macros::error::expand(input).into()
}

/// Attribute macro marking a struct as a registry component.
///
/// The struct keeps its shape; the macro adds `Debug` (unless already derived) and an
/// implementation of `modkit_kernel::domain::registry::Component`.
///
/// # Example
/// ```rust,ignore
/// #[modkit_derive::component]
/// pub struct InvoiceService {
///     prefix: String,
/// }
///
/// let service: std::sync::Arc<dyn Component> = std::sync::Arc::new(InvoiceService { prefix: "INV".into() });
/// ```
#[proc_macro_attribute]
pub fn component(_attr: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as ItemStruct);
    macros::component::expand(input).into()
}
