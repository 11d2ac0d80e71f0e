//! Turns an augmented [`TargetDeclaration`] back into tokens.

use proc_macro2::TokenStream;
use quote::quote;
use syn::parse_quote;

use super::tree::{GeneratedMember, TargetDeclaration};

/// Emits the struct with declared and injected fields, one inherent impl
/// holding the generated consts and methods in injection order, and any
/// companion trait impls.
pub(crate) fn render(target: &TargetDeclaration, runtime: &TokenStream) -> TokenStream {
    let item = target.item();
    let attrs = &item.attrs;
    let vis = &item.vis;
    let ident = &item.ident;
    let generics = &item.generics;
    let struct_where = &generics.where_clause;
    let mut bounded = generics.clone();
    if !bounded.params.is_empty() {
        bounded
            .make_where_clause()
            .predicates
            .push(parse_quote!(Self: #runtime::DomainModel));
    }
    let (impl_generics, ty_generics, where_clause) = bounded.split_for_impl();
    let serde_crate = quote!(#runtime::__private::serde).to_string();

    let declared = target.fields();
    let mut injected = Vec::new();
    let mut associated = Vec::new();
    let mut companions = Vec::new();
    for member in target.members() {
        match member {
            GeneratedMember::Field(field) => injected.push(quote!(#field)),
            GeneratedMember::Const(item) => associated.push(quote!(#item)),
            GeneratedMember::Method(item) => associated.push(quote!(#item)),
            GeneratedMember::TraitImpl { item, .. } => companions.push(quote!(#item)),
        }
    }

    quote! {
        #(#attrs)*
        #[derive(#runtime::__private::serde::Serialize, #runtime::__private::serde::Deserialize)]
        #[serde(crate = #serde_crate)]
        #vis struct #ident #generics #struct_where {
            #(#declared,)*
            #(#injected,)*
        }

        impl #impl_generics #ident #ty_generics #where_clause {
            #(#associated)*
        }

        #(#companions)*
    }
}
