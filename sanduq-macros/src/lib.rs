//! Procedural macros for Sanduq.
//!
//! Use them through the `sanduq` crate; the generated code refers to
//! `::sanduq` paths.

use darling::FromDeriveInput;
use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

mod tagged;

/// Derives `sanduq::Tagged` for a struct with named fields.
///
/// Every field carrying `#[tag(dep = "Name")]` receives the resource
/// registered under `Name` when the struct is tagged into a container.
/// Fields without the attribute are left untouched.
///
/// ```rust,ignore
/// #[derive(Tagged)]
/// struct TagDemo {
///     #[tag(dep = "UserService")]
///     name: sanduq::Value,
///     #[tag(dep = "Mailer")]
///     mailer: Option<std::sync::Arc<Mailer>>,
///     retries: u32,
/// }
/// ```
#[proc_macro_derive(Tagged, attributes(tag))]
pub fn derive_tagged(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    tagged::TaggedInput::from_derive_input(&input)
        .and_then(|parsed| parsed.expand())
        .unwrap_or_else(darling::Error::write_errors)
        .into()
}
