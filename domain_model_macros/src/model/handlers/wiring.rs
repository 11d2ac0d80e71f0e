//! `impl DomainModel`, connecting the generated members to the runtime.

use proc_macro2::TokenStream;
use quote::quote;
use syn::ext::IdentExt;
use syn::{ImplItemFn, LitStr, Type, parse_quote};

use crate::model::error::BuilderStateError;
use crate::model::method::{MethodAssembler, Modifiers};
use crate::model::naming::{column_name, table_name_for};
use crate::model::statements::StatementSequenceBuilder;
use crate::model::tree::{GeneratedMember, TreeFactory, ident};

use super::accessors::RAW_ATTRIBUTES;

const TRAIT: &str = "DomainModel";

fn primary_key_getter(tree: &TreeFactory<'_>) -> Result<ImplItemFn, BuilderStateError> {
    let config = tree.config();
    let key = &config.primary_class;
    let place = tree.field_ref(&config.primary_field_name);
    let mut method = MethodAssembler::new(tree);
    method.return_type(parse_quote!(&#key))?.returns(parse_quote!(&#place))?;
    method.finish_fn("primary_key", Modifiers::PUBLIC_SHARED.inherited())
}

fn primary_key_setter(tree: &TreeFactory<'_>) -> Result<ImplItemFn, BuilderStateError> {
    let config = tree.config();
    let mut body = StatementSequenceBuilder::new(tree);
    body.assign_field(&config.primary_field_name, &tree.var_ref("key"))?;
    let mut method = MethodAssembler::new(tree);
    method
        .add_parameter("key", config.primary_class.clone())?
        .add_statements(body.finish()?)?;
    method.finish_fn("set_primary_key", Modifiers::PUBLIC_EXCLUSIVE.inherited())
}

fn raw_attributes_mut(tree: &TreeFactory<'_>) -> Result<ImplItemFn, BuilderStateError> {
    let value = tree.type_ref("Value");
    let place = tree.field_ref(&ident(RAW_ATTRIBUTES));
    let mut method = MethodAssembler::new(tree);
    method
        .return_type(parse_quote!(&mut ::std::collections::HashMap<::std::string::String, #value>))?
        .returns(parse_quote!(&mut #place))?;
    method.finish_fn("raw_attributes_mut", Modifiers::PUBLIC_EXCLUSIVE.inherited())
}

fn violations(tree: &TreeFactory<'_>) -> Result<Option<ImplItemFn>, BuilderStateError> {
    let Some(validator) = &tree.config().validator else {
        return Ok(None);
    };
    let mut method = MethodAssembler::new(tree);
    method
        .return_type(tree.array_type(&tree.type_ref("Violation")))?
        .returns(parse_quote!(#validator(self)))?;
    method
        .finish_fn("violations", Modifiers::PUBLIC_SHARED.inherited())
        .map(Some)
}

/// `(field, column)` for each persistent declared field, then the primary key.
fn columns(tree: &TreeFactory<'_>) -> TokenStream {
    let config = tree.config();
    let pairs = tree
        .fields()
        .iter()
        .filter(|field| !field.transient)
        .map(|field| (field.ident.unraw().to_string(), column_name(&field.ident, &field.attrs)))
        .chain([(
            config.primary_field_name.unraw().to_string(),
            config.primary_column_name.clone(),
        )])
        .map(|(field, column)| quote!((#field, #column)));
    quote!(&[#(#pairs),*])
}

/// Implements the runtime's model trait for the target.
pub(crate) fn model_trait(tree: &mut TreeFactory<'_>) -> Result<(), BuilderStateError> {
    let member = {
        let config = tree.config();
        let target = tree.target();
        let name = target.ident();
        let runtime = tree.runtime();
        let mut generics = target.generics().clone();
        if !generics.params.is_empty() {
            generics.make_where_clause().predicates.push(parse_quote! {
                Self: ::core::default::Default
                    + #runtime::__private::serde::Serialize
                    + #runtime::__private::serde::de::DeserializeOwned
                    + 'static
            });
        }
        let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();
        let model_trait: Type = tree.type_ref(TRAIT);
        let key = &config.primary_class;
        let model_name = LitStr::new(&name.to_string(), name.span());
        let table = config
            .table_name
            .clone()
            .unwrap_or_else(|| table_name_for(&name.to_string()));
        let column = &config.primary_column_name;
        let columns = columns(tree);
        let getter = primary_key_getter(tree)?;
        let setter = primary_key_setter(tree)?;
        let raw = raw_attributes_mut(tree)?;
        let rules = violations(tree)?;
        GeneratedMember::TraitImpl {
            name: TRAIT.to_owned(),
            item: parse_quote! {
                impl #impl_generics #model_trait for #name #ty_generics #where_clause {
                    type PrimaryKey = #key;
                    const MODEL_NAME: &'static str = #model_name;
                    const TABLE: &'static str = #table;
                    const PRIMARY_COLUMN: &'static str = #column;
                    const COLUMNS: &'static [(&'static str, &'static str)] = #columns;
                    #getter
                    #setter
                    #raw
                    #rules
                }
            },
        }
    };
    tree.inject(member)
}
