#![warn(missing_docs)]
#![forbid(unsafe_code)]
//! `#[derive(Unravel)]`: generates the `Shape` of a type so the unravel
//! decoder can fill it in.

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::ext::IdentExt;
use syn::spanned::Spanned;
use syn::{
    Attribute, Data, DeriveInput, Fields, GenericParam, LitStr, Token, Visibility,
    parse_macro_input,
};

/// Derives `unravel::Unravel`.
///
/// On structs with named fields:
///
/// - `#[unravel(json = "name")]` (any key) attaches a tag to a field. The
///   decoder reads the tag with its configured key: `"-"` skips the field,
///   `"name,opts"` renames it.
/// - `#[unravel(embed)]` promotes the fields of a struct-typed member into the
///   enclosing struct.
///
/// On any type:
///
/// - `#[unravel(from_str)]` decodes the type from a string via `FromStr`.
/// - `#[unravel(opaque)]` makes the type undecodable.
///
/// Both container attributes take the zero value from `Default`.
#[proc_macro_derive(Unravel, attributes(unravel))]
pub fn derive_unravel(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    match expand(input) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Container {
    Struct,
    FromStr,
    Opaque,
}

fn parse_container_attrs(attrs: &[Attribute]) -> syn::Result<Container> {
    let mut container = Container::Struct;

    for attr in attrs.iter().filter(|attr| attr.path().is_ident("unravel")) {
        attr.parse_nested_meta(|meta| {
            let kind = if meta.path.is_ident("from_str") {
                Container::FromStr
            } else if meta.path.is_ident("opaque") {
                Container::Opaque
            } else {
                return Err(meta.error("unknown container attribute, expected `from_str` or `opaque`"));
            };

            if container != Container::Struct && container != kind {
                return Err(meta.error("`from_str` and `opaque` are mutually exclusive"));
            }
            container = kind;
            Ok(())
        })?;
    }

    Ok(container)
}

#[derive(Default)]
struct FieldAttrs {
    embed: bool,
    tags: Vec<(String, LitStr)>,
}

fn parse_field_attrs(attrs: &[Attribute]) -> syn::Result<FieldAttrs> {
    let mut parsed = FieldAttrs::default();

    for attr in attrs.iter().filter(|attr| attr.path().is_ident("unravel")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("embed") && !meta.input.peek(Token![=]) {
                parsed.embed = true;
                return Ok(());
            }

            let Some(key) = meta.path.get_ident() else {
                return Err(meta.error("expected `embed` or `<tag key> = \"<tag>\"`"));
            };
            let key = key.unraw().to_string();
            let value: LitStr = meta.value()?.parse()?;
            parsed.tags.push((key, value));
            Ok(())
        })?;
    }

    Ok(parsed)
}

fn expand(mut input: DeriveInput) -> syn::Result<TokenStream2> {
    let container = parse_container_attrs(&input.attrs)?;

    for param in &input.generics.params {
        if let GenericParam::Lifetime(lifetime) = param {
            return Err(syn::Error::new(
                lifetime.span(),
                "Unravel types must be 'static, lifetime parameters are not supported",
            ));
        }
    }

    let type_params: Vec<_> = input
        .generics
        .type_params()
        .map(|param| param.ident.clone())
        .collect();
    let where_clause = input.generics.make_where_clause();
    for ident in type_params {
        where_clause
            .predicates
            .push(syn::parse_quote!(#ident: ::unravel::Unravel));
    }

    let name = &input.ident;
    let type_identifier = name.unraw().to_string();
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let (def, parse, zero) = match container {
        Container::FromStr => (
            quote! { ::unravel::Def::Opaque },
            quote! { .parse(::unravel::parse_from_str::<Self>) },
            quote! { ::core::default::Default::default() },
        ),
        Container::Opaque => (
            quote! { ::unravel::Def::Opaque },
            quote! {},
            quote! { ::core::default::Default::default() },
        ),
        Container::Struct => {
            let (def, zero) = expand_struct(&input)?;
            (def, quote! {}, zero)
        }
    };

    Ok(quote! {
        #[automatically_derived]
        impl #impl_generics ::unravel::Unravel for #name #ty_generics #where_clause {
            const SHAPE: &'static ::unravel::Shape = &const {
                ::unravel::Shape::builder::<Self>(#type_identifier, #def)
                    #parse
                    .build()
            };

            fn zero() -> Self {
                #zero
            }
        }
    })
}

/// Returns the `Def::Struct` expression and the body of `zero()`.
fn expand_struct(input: &DeriveInput) -> syn::Result<(TokenStream2, TokenStream2)> {
    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => &fields.named,
            Fields::Unit => {
                return Ok((
                    quote! { ::unravel::Def::Struct(::unravel::StructDef { fields: &[] }) },
                    quote! { Self },
                ));
            }
            Fields::Unnamed(_) => {
                return Err(syn::Error::new(
                    input.ident.span(),
                    "tuple structs need `#[unravel(from_str)]` or `#[unravel(opaque)]`",
                ));
            }
        },
        Data::Enum(_) | Data::Union(_) => {
            return Err(syn::Error::new(
                input.ident.span(),
                "enums and unions need `#[unravel(from_str)]` or `#[unravel(opaque)]`",
            ));
        }
    };

    let mut shape_fields = Vec::new();
    let mut zeros = Vec::new();

    for field in fields {
        let attrs = parse_field_attrs(&field.attrs)?;
        let Some(ident) = &field.ident else {
            continue;
        };
        let ty = &field.ty;

        if !matches!(field.vis, Visibility::Public(_)) {
            if attrs.embed || !attrs.tags.is_empty() {
                return Err(syn::Error::new(
                    field.span(),
                    "only `pub` fields are decoded, attributes on private fields have no effect",
                ));
            }
            zeros.push(quote! { #ident: ::core::default::Default::default() });
            continue;
        }

        let field_name = ident.unraw().to_string();
        let tags = attrs.tags.iter().map(|(key, value)| {
            quote! { ::unravel::Tag { key: #key, value: #value } }
        });
        let flags = match attrs.embed {
            true => quote! { ::unravel::FieldFlags::EMBEDDED },
            false => quote! { ::unravel::FieldFlags::EMPTY },
        };

        shape_fields.push(quote! {
            ::unravel::Field {
                name: #field_name,
                shape: ::unravel::shape_of::<#ty>,
                tags: &[#(#tags),*],
                flags: #flags,
                access: |target| match target.downcast_mut::<Self>() {
                    ::core::option::Option::Some(this) => {
                        ::core::option::Option::Some(&mut this.#ident as &mut dyn ::core::any::Any)
                    }
                    ::core::option::Option::None => ::core::option::Option::None,
                },
            }
        });
        zeros.push(quote! { #ident: <#ty as ::unravel::Unravel>::zero() });
    }

    Ok((
        quote! {
            ::unravel::Def::Struct(::unravel::StructDef {
                fields: &const { [#(#shape_fields),*] },
            })
        },
        quote! { Self { #(#zeros),* } },
    ))
}
