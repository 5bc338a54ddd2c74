//! Code generators for entity field paths and bindable enums.

mod bindable;
mod entity;

pub use bindable::derive_bindable_impl;
pub use entity::derive_entity_impl;

use syn::meta::ParseNestedMeta;
use syn::{LitStr, Path, parse_quote};

/// Runtime crate path used by generated code unless overridden.
pub fn default_crate_path() -> Path {
    parse_quote!(::safepred)
}

/// Parse `crate = "path"` into a path.
pub fn parse_crate_path(meta: &ParseNestedMeta<'_>) -> Result<Path, syn::Error> {
    let value: LitStr = meta.value()?.parse()?;
    value.parse()
}
