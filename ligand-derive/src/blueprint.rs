use proc_macro2::TokenStream;
use quote::quote;
use syn::Field;
use syn::punctuated::Punctuated;

use crate::{ContainerAttrs, get_field_name, parse_field_attrs};

/// Generates the `blueprint()` method implementation.
pub fn generate_blueprint(
    fields: &Punctuated<Field, syn::Token![,]>,
    container: &ContainerAttrs,
    krate: &TokenStream,
) -> syn::Result<TokenStream> {
    let mut own = Vec::new();
    let mut bases = Vec::new();

    for f in fields {
        let attrs = parse_field_attrs(&f.attrs)?;
        if attrs.skip {
            continue;
        }
        let ty = &f.ty;
        if attrs.base {
            if attrs.rename.is_some() || attrs.kind.is_some() {
                return Err(syn::Error::new_spanned(
                    f,
                    "base fields cannot be renamed or given a kind",
                ));
            }
            bases.push(quote! { <#ty as #krate::Vocab>::blueprint() });
            continue;
        }

        let name = get_field_name(f, &attrs);
        let kind = match &attrs.kind {
            Some(variant) => quote! { #krate::FieldKind::#variant },
            None => quote! { <#ty as #krate::FieldValue>::KIND },
        };
        own.push(quote! { (#name, #kind) });
    }

    let fields_expr = quote! {
        let fields: ::std::vec::Vec<(&'static str, #krate::FieldKind)> =
            ::std::vec![#(#own),*];
    };

    let body = match bases.split_first() {
        None if container.link => quote! {
            #fields_expr
            #krate::Blueprint::link(<Self as #krate::Vocab>::TAG, fields)
        },
        None => quote! {
            #fields_expr
            #krate::Blueprint::new(<Self as #krate::Vocab>::TAG, fields)
        },
        Some(_) if container.link => {
            return Err(syn::Error::new(
                proc_macro2::Span::call_site(),
                "`link` cannot be combined with base fields; extend a link type instead",
            ));
        }
        Some((first, rest)) => quote! {
            #fields_expr
            let base = #first #(.merge(&#rest))*;
            #krate::Blueprint::extending(<Self as #krate::Vocab>::TAG, &base, fields)
        },
    };

    Ok(quote! {
        fn blueprint() -> #krate::Blueprint {
            #body
        }
    })
}
