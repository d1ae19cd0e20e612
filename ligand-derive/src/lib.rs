use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::ext::IdentExt;
use syn::{DeriveInput, parse_macro_input};

mod blueprint;

/// Derive macro for the `Vocab` trait.
///
/// Generates the type's blueprint from its fields, and a `from_instance`
/// reading the fields back out of a populated instance.
///
/// # Example
///
/// ```ignore
/// use ligand_core::{Object, Vocab};
///
/// #[derive(Debug, Clone, Vocab)]
/// #[vocab(tag = "Emoji")]
/// struct Emoji {
///     #[vocab(base)]
///     object: Object,
///     shortcode: Option<String>,
/// }
/// ```
///
/// # Struct attributes
///
/// - `#[vocab(tag = "Name")]` - Tag to register under (defaults to the struct name)
/// - `#[vocab(link)]` - Instances are links
/// - `#[vocab(crate = path)]` - Path to the core crate (defaults to `::ligand_core`)
///
/// # Field attributes
///
/// - `#[vocab(base)]` - Inherit every field of this field's type
/// - `#[vocab(rename = "name")]` - Use a custom document field name
/// - `#[vocab(kind = Variant)]` - Override the `FieldKind` implied by the type
/// - `#[vocab(skip)]` - Not a document field (field must impl Default)
///
/// Field names are camel-cased unless renamed.
#[proc_macro_derive(Vocab, attributes(vocab))]
pub fn derive_vocab(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    match derive_vocab_impl(&input) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}

fn derive_vocab_impl(input: &DeriveInput) -> syn::Result<TokenStream2> {
    let name = &input.ident;
    let attrs = parse_container_attrs(&input.attrs)?;
    let krate = attrs.crate_path();
    let tag = attrs.tag.clone().unwrap_or_else(|| name.unraw().to_string());

    let fields = named_fields(input)?;
    let blueprint_impl = blueprint::generate_blueprint(fields, &attrs, &krate)?;
    let from_instance_impl = generate_from_instance(name, fields, &krate)?;

    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    Ok(quote! {
        impl #impl_generics #krate::Vocab for #name #ty_generics #where_clause {
            const TAG: &'static str = #tag;

            #blueprint_impl
            #from_instance_impl
        }
    })
}

fn named_fields(
    input: &DeriveInput,
) -> syn::Result<&syn::punctuated::Punctuated<syn::Field, syn::Token![,]>> {
    match &input.data {
        syn::Data::Struct(syn::DataStruct {
            fields: syn::Fields::Named(named),
            ..
        }) => Ok(&named.named),
        _ => Err(syn::Error::new_spanned(
            input,
            "Vocab can only be derived for structs with named fields",
        )),
    }
}

fn generate_from_instance(
    name: &syn::Ident,
    fields: &syn::punctuated::Punctuated<syn::Field, syn::Token![,]>,
    krate: &TokenStream2,
) -> syn::Result<TokenStream2> {
    let mut readers = Vec::new();
    for f in fields {
        let attrs = parse_field_attrs(&f.attrs)?;
        let Some(ident) = f.ident.as_ref() else {
            continue;
        };
        let ty = &f.ty;
        let reader = if attrs.skip {
            quote! { ::std::default::Default::default() }
        } else if attrs.base {
            quote! { <#ty as #krate::Vocab>::from_instance(instance)? }
        } else {
            let field_name = get_field_name(f, &attrs);
            quote! { <#ty as #krate::FieldValue>::from_node(instance.get(#field_name)) }
        };
        readers.push(quote! { #ident: #reader });
    }

    Ok(quote! {
        fn from_instance(instance: &#krate::Instance) -> ::std::option::Option<Self> {
            if !instance.is(<Self as #krate::Vocab>::TAG) {
                return ::std::option::Option::None;
            }
            ::std::option::Option::Some(#name {
                #(#readers),*
            })
        }
    })
}

#[derive(Default)]
pub(crate) struct ContainerAttrs {
    pub tag: Option<String>,
    pub link: bool,
    pub krate: Option<syn::Path>,
}

impl ContainerAttrs {
    fn crate_path(&self) -> TokenStream2 {
        match &self.krate {
            Some(path) => quote! { #path },
            None => quote! { ::ligand_core },
        }
    }
}

fn parse_container_attrs(attrs: &[syn::Attribute]) -> syn::Result<ContainerAttrs> {
    let mut result = ContainerAttrs::default();

    for attr in attrs {
        if !attr.path().is_ident("vocab") {
            continue;
        }

        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("tag") {
                let value: syn::LitStr = meta.value()?.parse()?;
                result.tag = Some(value.value());
            } else if meta.path.is_ident("link") {
                result.link = true;
            } else if meta.path.is_ident("crate") {
                result.krate = Some(meta.value()?.parse()?);
            } else {
                return Err(meta.error("unknown vocab attribute"));
            }
            Ok(())
        })?;
    }

    Ok(result)
}

#[derive(Default)]
pub(crate) struct FieldAttrs {
    pub skip: bool,
    pub base: bool,
    pub rename: Option<String>,
    pub kind: Option<syn::Ident>,
}

pub(crate) fn parse_field_attrs(attrs: &[syn::Attribute]) -> syn::Result<FieldAttrs> {
    let mut result = FieldAttrs::default();

    for attr in attrs {
        if !attr.path().is_ident("vocab") {
            continue;
        }

        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("skip") {
                result.skip = true;
            } else if meta.path.is_ident("base") {
                result.base = true;
            } else if meta.path.is_ident("rename") {
                let value: syn::LitStr = meta.value()?.parse()?;
                result.rename = Some(value.value());
            } else if meta.path.is_ident("kind") {
                result.kind = Some(meta.value()?.parse()?);
            } else {
                return Err(meta.error("unknown vocab field attribute"));
            }
            Ok(())
        })?;
    }

    Ok(result)
}

/// Document name of a field: the rename if any, else the camel-cased ident.
pub(crate) fn get_field_name(field: &syn::Field, attrs: &FieldAttrs) -> String {
    if let Some(rename) = &attrs.rename {
        return rename.clone();
    }
    field
        .ident
        .as_ref()
        .map(|ident| camel_case(&ident.unraw().to_string()))
        .unwrap_or_default()
}

fn camel_case(snake: &str) -> String {
    let mut out = String::with_capacity(snake.len());
    let mut upper = false;
    for c in snake.chars() {
        if c == '_' {
            upper = !out.is_empty();
        } else if upper {
            out.extend(c.to_uppercase());
            upper = false;
        } else {
            out.push(c);
        }
    }
    out
}
