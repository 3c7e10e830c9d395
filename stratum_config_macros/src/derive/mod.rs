//! Expansion of `#[derive(Schema)]`.

use proc_macro2::TokenStream;
use quote::quote;
use syn::ext::IdentExt as _;
use syn::{Data, DeriveInput, Fields};

mod crate_path;
mod parse;
#[cfg(test)]
mod tests;

use parse::{FieldKind, option_inner, parse_field_attrs, parse_struct_attrs, tag_string};

pub(crate) fn expand(input: &DeriveInput) -> syn::Result<TokenStream> {
    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(named) => &named.named,
            _ => {
                return Err(syn::Error::new_spanned(
                    data.struct_token,
                    "Schema requires named fields",
                ));
            }
        },
        _ => {
            return Err(syn::Error::new_spanned(
                &input.ident,
                "Schema can only be derived for structs",
            ));
        }
    };
    let krate = crate_path::resolve(parse_struct_attrs(&input.attrs)?.crate_path.as_ref());

    let mut members = Vec::new();
    let mut substructures = Vec::new();
    for field in fields {
        let attrs = parse_field_attrs(field)?;
        let Some(ident) = &field.ident else {
            continue;
        };
        let name = ident.unraw().to_string();
        let tags = tag_string(&attrs);
        match attrs.kind {
            FieldKind::Ignored => {}
            FieldKind::Leaf => {
                let slot = if option_inner(&field.ty).is_some() {
                    quote! { #krate::Slot::optional(&mut self.#ident) }
                } else {
                    quote! { #krate::Slot::new(&mut self.#ident) }
                };
                members.push(quote! { #krate::Member::leaf(#name, #tags, #slot) });
            }
            FieldKind::Nested | FieldKind::Flatten => {
                if option_inner(&field.ty).is_some() {
                    return Err(syn::Error::new_spanned(
                        &field.ty,
                        "nested schemas cannot be optional",
                    ));
                }
                let constructor = if attrs.kind == FieldKind::Nested {
                    quote! { nested }
                } else {
                    quote! { embedded }
                };
                members.push(quote! { #krate::Member::#constructor(#name, #tags, &mut self.#ident) });
                substructures.push(quote! { &self.#ident as &dyn #krate::Schema });
            }
        }
    }

    let ident = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();
    let substructures_fn = if substructures.is_empty() {
        TokenStream::new()
    } else {
        quote! {
            fn substructures(&self) -> ::std::vec::Vec<&dyn #krate::Schema> {
                ::std::vec![#(#substructures),*]
            }
        }
    };
    Ok(quote! {
        #[automatically_derived]
        impl #impl_generics #krate::Schema for #ident #ty_generics #where_clause {
            fn members(&mut self) -> ::std::vec::Vec<#krate::Member<'_>> {
                ::std::vec![#(#members),*]
            }

            #substructures_fn
        }
    })
}
