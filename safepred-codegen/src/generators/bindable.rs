//! Implementation of the `#[derive(Bindable)]` macro for fieldless enums.

use proc_macro2::TokenStream;
use quote::quote;
use syn::ext::IdentExt;
use syn::{Data, DeriveInput, Fields, Ident, LitStr};

use super::{default_crate_path, parse_crate_path};

/// Integer representations accepted in `#[repr(...)]`.
const INT_REPRS: &[&str] = &[
    "i8", "i16", "i32", "i64", "i128", "isize", "u8", "u16", "u32", "u64", "u128", "usize",
];

/// Parse and generate code for the `#[derive(Bindable)]` macro.
pub fn derive_bindable_impl(input: &DeriveInput) -> Result<TokenStream, syn::Error> {
    let name = &input.ident;

    let variants = match &input.data {
        Data::Enum(data) => &data.variants,
        _ => {
            return Err(syn::Error::new_spanned(
                input,
                "Bindable derive only supports fieldless enums; implement Bindable by hand or mark an Entity id",
            ));
        }
    };

    if variants.is_empty() {
        return Err(syn::Error::new_spanned(
            input,
            "Bindable derive needs at least one variant",
        ));
    }

    let mut krate = None;
    for attr in &input.attrs {
        if !attr.path().is_ident("safepred") {
            continue;
        }
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("crate") {
                krate = Some(parse_crate_path(&meta)?);
                Ok(())
            } else {
                Err(meta.error("unsupported safepred attribute"))
            }
        })?;
    }
    let krate = krate.unwrap_or_else(default_crate_path);
    let repr = int_repr(input)?;

    let arms = variants
        .iter()
        .map(|variant| {
            if !matches!(variant.fields, Fields::Unit) {
                return Err(syn::Error::new_spanned(
                    variant,
                    "Bindable derive only supports unit variants",
                ));
            }
            let ident = &variant.ident;
            let bound = match &repr {
                Some(repr) => quote! {
                    #krate::Bindable::bind(&(Self::#ident as #repr))
                },
                None => {
                    let value = variant_name(ident, &variant.attrs)?;
                    quote! {
                        #krate::Argument::String(::std::string::String::from(#value))
                    }
                }
            };
            Ok(quote! { Self::#ident => #bound, })
        })
        .collect::<Result<Vec<_>, syn::Error>>()?;

    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    Ok(quote! {
        impl #impl_generics #krate::Bindable for #name #ty_generics #where_clause {
            fn bind(&self) -> #krate::Argument {
                match self {
                    #(#arms)*
                }
            }
        }
    })
}

/// Find an integer `#[repr(...)]`, if any.
fn int_repr(input: &DeriveInput) -> Result<Option<Ident>, syn::Error> {
    let mut repr = None;

    for attr in &input.attrs {
        if !attr.path().is_ident("repr") {
            continue;
        }

        attr.parse_nested_meta(|meta| {
            if let Some(ident) = meta.path.get_ident() {
                if INT_REPRS.iter().any(|r| ident == r) {
                    repr = Some(ident.clone());
                }
            }
            // `align(N)` and `packed(N)` carry arguments.
            if meta.input.peek(syn::token::Paren) {
                let content;
                syn::parenthesized!(content in meta.input);
                content.parse::<TokenStream>()?;
            }
            Ok(())
        })?;
    }

    Ok(repr)
}

/// The raw string a variant binds to.
fn variant_name(ident: &Ident, attrs: &[syn::Attribute]) -> Result<String, syn::Error> {
    let mut name = ident.unraw().to_string();

    for attr in attrs {
        if !attr.path().is_ident("safepred") {
            continue;
        }

        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("rename") {
                let value: LitStr = meta.value()?.parse()?;
                name = value.value();
                Ok(())
            } else {
                Err(meta.error("unsupported safepred variant attribute"))
            }
        })?;
    }

    Ok(name)
}
