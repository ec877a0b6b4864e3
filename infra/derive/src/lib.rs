#![allow(unreachable_pub)]
#![allow(clippy::needless_pass_by_value)]

//! # Macros
//!
//! Procedural macros shared across the data library workspace: error enums,
//! feature slice handles, API models and handlers, and the runtime entry point.
//!
//! ## Usage
//! ```toml
//! [dependencies]
//! pdl-derive.workspace = true
//! ```
//!
//! Examples below are `ignore`d; the consuming crates exercise them in their own tests.

mod macros;

use proc_macro::TokenStream;
use syn::{DeriveInput, ItemFn, ItemStruct, parse_macro_input};

/// Attribute macro to bootstrap the Tokio runtime from a `pdl_runtime` preset.
///
/// # Arguments
///
/// * `high_performance` - Request-serving profile.
/// * `memory_efficient` - Small footprint for batch tools such as the indexer.
/// * `default` - Worker threads detected from available parallelism.
///
/// # Examples
///
/// ```rust,ignore
/// #[pdl_runtime::main(high_performance)]
/// async fn main() -> anyhow::Result<()> {
/// # Ok(())
/// }
/// ```
#[proc_macro_attribute]
pub fn main(args: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as ItemFn);
    macros::runtime::expand_main(args.into(), input).into()
}

/// Attribute macro for response and request DTOs.
///
/// * Adds `Debug`, `Serialize` and `Deserialize` when missing.
/// * Adds `utoipa::ToSchema` behind the `server` feature.
/// * Applies `rename_all = "snake_case"` (the API's wire casing) unless overridden.
/// * Applies `deny_unknown_fields` unless `deny_unknown_fields = false`.
///
/// # Example
///
/// ```rust,ignore
/// use pdl_derive::api_model;
///
/// #[api_model(deny_unknown_fields = false)]
/// pub struct TermSummary {
///     pub id: String,
///     pub pref_label: String,
/// }
/// ```
#[proc_macro_attribute]
pub fn api_model(attr: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as ItemStruct);
    macros::api::expand_api_model(attr.into(), input).into()
}

/// Attribute macro bridging axum handlers with `OpenAPI` documentation.
///
/// Accepts the usual `utoipa::path` arguments. The path attribute is only emitted
/// when the `server` feature is on.
///
/// # Example
///
/// ```rust,ignore
/// #[api_handler(get, path = "/up", responses((status = OK, body = HealthResponse)), tag = "System")]
/// pub async fn health_handler() -> impl IntoResponse { /* ... */ }
/// ```
#[proc_macro_attribute]
pub fn api_handler(args: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as ItemFn);
    macros::api::expand_api_handler(args.into(), input).into()
}

/// Attribute macro for crate error enums.
///
/// # Features
///
/// * Injects `#[derive(Debug, thiserror::Error)]`.
/// * Generates a companion `<Name>Ext` trait adding `.context(...)` to results of this
///   error and of every wrapped source error.
/// * Implements `From<Source>` for variants with a `source` field.
/// * Implements `From<&'static str>` and `From<String>` when an `Internal` variant exists.
/// * Variants may carry `#[status(404)]`; a `status_code()` method is then generated,
///   falling back to 500 for unannotated variants.
///
/// # Requirements
///
/// 1. The item is an enum with named-field variants only.
/// 2. Variants with a source also carry `context: Option<Cow<'static, str>>`.
///
/// # Example
///
/// ```rust,ignore
/// use pdl_derive::pdl_error;
/// use std::borrow::Cow;
///
/// #[pdl_error]
/// pub enum SparqlError {
///     #[error("Transport error{}: {source}", format_context(.context))]
///     Http { source: reqwest::Error, context: Option<Cow<'static, str>> },
///
///     #[status(502)]
///     #[error("Query interrupted")]
///     Interrupted { body: String },
///
///     #[error("Internal error{}: {message}", format_context(.context))]
///     Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
/// }
/// ```
#[proc_macro_attribute]
pub fn pdl_error(_args: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as DeriveInput);
    macros::error::expand_derive(input).into()
}

/// Attribute macro defining a feature slice handle.
///
/// Generates `<Name>Inner` holding the fields, an `Arc` wrapper with `new` and `Deref`,
/// and the `FeatureSlice` registration impl (whose `name()` is the struct name).
///
/// # Example
/// ```rust,ignore
/// #[pdl_derive::pdl_slice]
/// pub struct Terms {
///     sparql: SparqlClient,
/// }
///
/// let slice = Terms::new(TermsInner { sparql });
/// ```
#[proc_macro_attribute]
pub fn pdl_slice(_attr: TokenStream, item: TokenStream) -> TokenStream {
    let input = syn::parse_macro_input!(item as ItemStruct);
    macros::slice::expand_slice(input).into()
}
