//! Procedural macros for Safepred.
//!
//! This crate generates the typed field paths and argument bindings the
//! predicate compiler works with.
//!
//! # Macros
//!
//! - [`Entity`] - Derive a module of typed field paths for a struct
//! - [`Bindable`] - Derive argument binding for a fieldless enum
//!
//! # Example
//!
//! ```rust,ignore
//! #[derive(safepred::Entity)]
//! #[safepred(rename_all = "camelCase")]
//! struct Book {
//!     #[safepred(id)]
//!     id: i64,
//!     title: String,
//!     reading_time: std::time::Duration,
//!     state: BookState,
//! }
//!
//! #[derive(safepred::Bindable)]
//! #[repr(i32)]
//! enum BookState {
//!     Draft = 0,
//!     Published = 1,
//! }
//!
//! let query = book::reading_time().lesser_than(std::time::Duration::from_secs(36_000));
//! assert_eq!(query.format(), "readingTime < ?");
//! ```

use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

mod generators;

/// Derive macro generating typed field paths for a struct.
///
/// For a struct `Book`, this generates a `book` module with one function per
/// field returning a `FieldPath<Book, FieldType>`, plus `this()` for the
/// element itself.
///
/// # Attributes
///
/// ## Struct-level
/// - `#[safepred(rename_all = "camelCase")]` - Convert field expressions
///   (`camelCase`, `PascalCase`, `snake_case`, `SCREAMING_SNAKE_CASE`,
///   `lowercase`, `UPPERCASE`)
/// - `#[safepred(crate = "path")]` - Path to the runtime crate
///
/// ## Field-level
/// - `#[safepred(id)]` - Bind the whole entity by this field, enabling
///   identity comparisons against related entities
/// - `#[safepred(rename = "name")]` - Use a different field expression
/// - `#[safepred(skip)]` - Generate no path for this field
///
/// # Example
///
/// ```rust,ignore
/// #[derive(safepred::Entity)]
/// struct Chapter {
///     #[safepred(id)]
///     id: u32,
///     title: String,
///     #[safepred(rename = "wordCount")]
///     words: u32,
/// }
///
/// let pair = chapter::words().greater_than(1000u32);
/// assert_eq!(pair.format(), "wordCount > ?");
/// ```
#[proc_macro_derive(Entity, attributes(safepred))]
pub fn derive_entity(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    match generators::derive_entity_impl(&input) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}

/// Derive macro binding a fieldless enum as a query argument.
///
/// With an integer `#[repr(...)]` each variant binds its discriminant;
/// otherwise it binds its name.
///
/// # Attributes
///
/// - `#[safepred(crate = "path")]` - Path to the runtime crate
/// - `#[safepred(rename = "name")]` on a variant - Bind a different name
///
/// # Example
///
/// ```rust,ignore
/// #[derive(safepred::Bindable)]
/// enum Genre {
///     Fantasy,
///     #[safepred(rename = "sci-fi")]
///     ScienceFiction,
/// }
/// ```
#[proc_macro_derive(Bindable, attributes(safepred))]
pub fn derive_bindable(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    match generators::derive_bindable_impl(&input) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}
