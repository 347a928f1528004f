// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

extern crate proc_macro;

use proc_macro::TokenStream;
use proc_macro2::Span;
use quote::quote;
use syn::{
    parse_macro_input, parse_quote, Data, DeriveInput, Fields, GenericParam, Index, Member,
};

/// One struct field as seen by the generator.
struct FieldInfo {
    member: Member,
    label: String,
    ty: syn::Type,
    skip: bool,
}

/// `#[derive(Aligned)]` macro: generates the type descriptor and the leaf
/// visitors (`store` / `load`) for a struct.
///
/// Supports named, tuple and unit structs. Every field type must itself be
/// `Aligned` (scalars, `Complex<f32>`, `Complex<f64>`, `[T; N]`, other derived
/// structs). Generic type parameters get an `Aligned` bound.
///
/// `#[alignbin(skip)]` keeps a field in the memory layout but leaves it off
/// the wire; decoding never touches it.
///
/// Example:
/// ```ignore
/// use alignbin::Aligned;
///
/// #[derive(Aligned)]
/// struct Sample {
///     id: u32,
///     #[alignbin(skip)]
///     scratch: u64,   // occupies memory, never encoded
///     values: [f32; 3],
/// }
/// ```
#[proc_macro_derive(Aligned, attributes(alignbin))]
pub fn derive_aligned(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    match expand(input) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}

fn expand(mut input: DeriveInput) -> syn::Result<proc_macro2::TokenStream> {
    let fields = match &input.data {
        Data::Struct(data) => collect_fields(&data.fields)?,
        Data::Enum(_) => {
            return Err(syn::Error::new_spanned(
                &input.ident,
                "Aligned cannot be derived for enums: only fixed-layout structs are supported",
            ))
        }
        Data::Union(_) => {
            return Err(syn::Error::new_spanned(
                &input.ident,
                "Aligned cannot be derived for unions: only fixed-layout structs are supported",
            ))
        }
    };

    for param in &mut input.generics.params {
        if let GenericParam::Type(ty) = param {
            ty.bounds.push(parse_quote!(::alignbin::Aligned));
        }
    }

    let name = &input.ident;
    let type_name = name.to_string();
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let descriptors = fields.iter().map(|f| {
        let label = &f.label;
        let ty = &f.ty;
        if f.skip {
            quote! {
                ::alignbin::FieldDescriptor::skipped(#label, <#ty as ::alignbin::Aligned>::descriptor())
            }
        } else {
            quote! {
                ::alignbin::FieldDescriptor::new(#label, <#ty as ::alignbin::Aligned>::descriptor())
            }
        }
    });

    let wire_fields: Vec<_> = fields.iter().filter(|f| !f.skip).collect();
    let stores = wire_fields.iter().map(|f| {
        let member = &f.member;
        quote! { ::alignbin::Aligned::store(&self.#member, sink)?; }
    });
    let loads = wire_fields.iter().map(|f| {
        let member = &f.member;
        quote! { ::alignbin::Aligned::load(&mut self.#member, src)?; }
    });

    Ok(quote! {
        impl #impl_generics ::alignbin::Aligned for #name #ty_generics #where_clause {
            fn descriptor() -> ::alignbin::TypeDescriptor {
                ::alignbin::TypeDescriptor::aggregate(
                    #type_name,
                    ::std::vec![#(#descriptors),*],
                )
            }

            #[allow(unused_variables)]
            fn store<__S: ::alignbin::LeafSink>(&self, sink: &mut __S) -> ::alignbin::Result<()> {
                #(#stores)*
                ::core::result::Result::Ok(())
            }

            #[allow(unused_variables)]
            fn load<__S: ::alignbin::LeafSource>(&mut self, src: &mut __S) -> ::alignbin::Result<()> {
                #(#loads)*
                ::core::result::Result::Ok(())
            }
        }
    })
}

fn collect_fields(fields: &Fields) -> syn::Result<Vec<FieldInfo>> {
    let mut out = Vec::with_capacity(fields.len());
    for (index, field) in fields.iter().enumerate() {
        let (member, label) = match &field.ident {
            Some(ident) => (Member::Named(ident.clone()), ident.to_string()),
            None => (
                Member::Unnamed(Index {
                    index: index as u32,
                    span: Span::call_site(),
                }),
                index.to_string(),
            ),
        };
        out.push(FieldInfo {
            member,
            label,
            ty: field.ty.clone(),
            skip: parse_skip(&field.attrs)?,
        });
    }
    Ok(out)
}

/// `true` if `#[alignbin(skip)]` is present.
fn parse_skip(attrs: &[syn::Attribute]) -> syn::Result<bool> {
    let mut skip = false;
    for attr in attrs {
        if !attr.path().is_ident("alignbin") {
            continue;
        }
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("skip") {
                skip = true;
                Ok(())
            } else {
                Err(meta.error("unknown alignbin attribute, expected `skip`"))
            }
        })?;
    }
    Ok(skip)
}
