//! Implementation of the `#[derive(Entity)]` macro.

use convert_case::{Case, Casing};
use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use syn::ext::IdentExt;
use syn::{Data, DeriveInput, Fields, Ident, LitStr, Path, Type};

use super::{default_crate_path, parse_crate_path};

/// Parse and generate code for the `#[derive(Entity)]` macro.
pub fn derive_entity_impl(input: &DeriveInput) -> Result<TokenStream, syn::Error> {
    let name = &input.ident;
    let vis = &input.vis;
    let module_name = format_ident!("{}", name.unraw().to_string().to_case(Case::Snake));

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => &fields.named,
            _ => {
                return Err(syn::Error::new_spanned(
                    input,
                    "Entity derive only supports structs with named fields",
                ));
            }
        },
        _ => {
            return Err(syn::Error::new_spanned(
                input,
                "Entity derive only supports structs",
            ));
        }
    };

    let struct_attrs = parse_struct_attrs(input)?;
    let krate = struct_attrs.krate.unwrap_or_else(default_crate_path);

    let field_infos: Vec<FieldInfo> = fields
        .iter()
        .map(|f| parse_field(f, struct_attrs.rename_all))
        .collect::<Result<_, _>>()?;

    if let Some(field) = field_infos.iter().find(|f| f.name.unraw() == "this") {
        return Err(syn::Error::new_spanned(
            &field.name,
            "a field named `this` clashes with the generated `this()` path; rename or skip it",
        ));
    }

    let ids: Vec<_> = field_infos.iter().filter(|f| f.is_id).collect();
    if ids.len() > 1 {
        return Err(syn::Error::new_spanned(
            &ids[1].name,
            "Entity supports at most one field marked with #[safepred(id)]",
        ));
    }

    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let accessors = field_infos.iter().filter(|f| !f.skip).map(|f| {
        let fn_name = &f.name;
        let ty = &f.ty;
        let expression = &f.expression;
        let doc = format!("Path to `{}`.", expression);
        quote! {
            #[doc = #doc]
            #[inline]
            pub fn #fn_name #impl_generics () -> #krate::FieldPath<#name #ty_generics, #ty> #where_clause {
                #krate::FieldPath::new(#expression)
            }
        }
    });

    let identity = ids.first().map(|id| {
        let id_name = &id.name;
        quote! {
            impl #impl_generics #krate::Bindable for #name #ty_generics #where_clause {
                fn bind(&self) -> #krate::Argument {
                    #krate::Bindable::bind(&self.#id_name)
                }
            }
        }
    });

    let module_doc = format!("Field paths for [`{}`].", name);

    Ok(quote! {
        #[doc = #module_doc]
        #[allow(dead_code)]
        #vis mod #module_name {
            use super::*;

            #(#accessors)*

            /// Path to the evaluated element itself.
            #[inline]
            pub fn this #impl_generics () -> #krate::FieldPath<#name #ty_generics, #name #ty_generics> #where_clause {
                #krate::FieldPath::this()
            }
        }

        #identity
    })
}

/// Struct-level attributes parsed from `#[safepred(...)]`.
#[derive(Default)]
struct StructAttrs {
    rename_all: Option<Case>,
    krate: Option<Path>,
}

/// Parse struct-level `#[safepred(...)]` attributes.
fn parse_struct_attrs(input: &DeriveInput) -> Result<StructAttrs, syn::Error> {
    let mut attrs = StructAttrs::default();

    for attr in &input.attrs {
        if !attr.path().is_ident("safepred") {
            continue;
        }

        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("rename_all") {
                let value: LitStr = meta.value()?.parse()?;
                attrs.rename_all = Some(parse_case(&value)?);
            } else if meta.path.is_ident("crate") {
                attrs.krate = Some(parse_crate_path(&meta)?);
            } else {
                return Err(meta.error("unsupported safepred attribute"));
            }
            Ok(())
        })?;
    }

    Ok(attrs)
}

/// Map a `rename_all` value to a case conversion.
fn parse_case(value: &LitStr) -> Result<Case, syn::Error> {
    match value.value().as_str() {
        "camelCase" => Ok(Case::Camel),
        "PascalCase" => Ok(Case::Pascal),
        "snake_case" => Ok(Case::Snake),
        "SCREAMING_SNAKE_CASE" => Ok(Case::ScreamingSnake),
        "lowercase" => Ok(Case::Flat),
        "UPPERCASE" => Ok(Case::UpperFlat),
        other => Err(syn::Error::new_spanned(
            value,
            format!("unsupported rename_all value `{}`", other),
        )),
    }
}

/// Information about a field.
struct FieldInfo {
    name: Ident,
    ty: Type,
    expression: String,
    is_id: bool,
    skip: bool,
}

/// Parse a field and its `#[safepred(...)]` attributes.
fn parse_field(field: &syn::Field, rename_all: Option<Case>) -> Result<FieldInfo, syn::Error> {
    let name = field
        .ident
        .clone()
        .ok_or_else(|| syn::Error::new_spanned(field, "Fields must be named"))?;

    let raw = name.unraw().to_string();
    let mut expression = match rename_all {
        Some(case) => raw.to_case(case),
        None => raw,
    };
    let mut is_id = false;
    let mut skip = false;

    for attr in &field.attrs {
        if !attr.path().is_ident("safepred") {
            continue;
        }

        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("id") {
                is_id = true;
            } else if meta.path.is_ident("skip") {
                skip = true;
            } else if meta.path.is_ident("rename") {
                let value: LitStr = meta.value()?.parse()?;
                expression = value.value();
            } else {
                return Err(meta.error("unsupported safepred field attribute"));
            }
            Ok(())
        })?;
    }

    if expression.trim().is_empty() {
        return Err(syn::Error::new_spanned(
            &name,
            "field expression must not be empty",
        ));
    }

    Ok(FieldInfo {
        name,
        ty: field.ty.clone(),
        expression,
        is_id,
        skip,
    })
}
