#![allow(unreachable_pub)]
#![allow(clippy::needless_pass_by_value)]

//! # Macros
//!
//! Procedural macros shared by the `CargoFlux` crates.
//!
//! * [`macro@cflux_error`] turns an enum into a `thiserror` error with context support
//!   and optional stable numeric codes.
//! * [`macro@cflux_slice`] turns a struct into a cheaply clonable, `Arc`-backed handle.
//!
//! Examples are `ignore`d to avoid compiling them in this crate; copy them into
//! consuming crates' tests as needed.

mod macros;

use proc_macro::TokenStream;
use syn::{DeriveInput, ItemStruct, parse_macro_input};

/// A high-level attribute macro for defining domain-specific error enums.
///
/// # Features
///
/// * **Automatic Derives**: Injects `#[derive(Debug, thiserror::Error)]` when missing.
/// * **Context Support**: Generates a companion `...Ext` trait that adds `.context()`
///   to any `Result` that can be converted into this error type.
/// * **Standard Conversions**: Implements `From<T>` for variants containing a `source` field
///   (or a field marked `#[source]`/`#[from]`), enabling `?` on upstream errors.
/// * **Internal Fallback**: `From<&'static str>` and `From<String>` when an `Internal`
///   variant is present.
/// * **Stable Codes**: When every variant carries `#[code(N)]`, generates
///   `pub const fn code(&self) -> u16`. The attribute is stripped from the output.
///
/// # Requirements
///
/// 1. The macro must be applied to an **enum** with named-field variants only.
/// 2. Variants that support context must include a `context: Option<Cow<'static, str>>` field.
/// 3. Variants with a source must also carry the context field.
/// 4. `#[code]` is all-or-nothing and codes must be unique.
///
/// # Example
///
/// ```rust,ignore
/// use cflux_derive::cflux_error;
/// use std::borrow::Cow;
///
/// #[cflux_error]
/// pub enum GateError {
///     #[code(100)]
///     #[error("Unauthorized{}: {message}", format_context(.context))]
///     Unauthorized { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
///
///     #[code(101)]
///     #[error("Not found{}: {message}", format_context(.context))]
///     NotFound { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
/// }
///
/// assert_eq!(GateError::NotFound { message: "x".into(), context: None }.code(), 101);
/// ```
#[proc_macro_attribute]
pub fn cflux_error(_args: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as DeriveInput);
    macros::error::expand(input).into()
}

/// Attribute macro to define a shared-state handle.
///
/// The annotated struct becomes `<Name>Inner`; `<Name>` wraps it in an `Arc`,
/// derefs to it and clones by bumping the reference count.
///
/// # Example
/// ```rust,ignore
/// #[cflux_derive::cflux_slice]
/// pub struct Ledger {
///     entries: parking_lot::RwLock<Vec<u64>>,
/// }
///
/// let ledger = Ledger::new(LedgerInner { entries: Default::default() });
/// let shared = ledger.clone();
/// assert!(ledger.shares_state_with(&shared));
/// ```
#[proc_macro_attribute]
pub fn cflux_slice(_attr: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as ItemStruct);
    macros::slice::expand(input).into()
}
