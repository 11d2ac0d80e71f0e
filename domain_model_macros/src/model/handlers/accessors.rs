//! Field-backed members: accessor pairs, the primary key and raw attributes.

use syn::{Expr, Ident, Type, parse_quote};

use crate::model::error::BuilderStateError;
use crate::model::method::{MethodAssembler, Modifiers};
use crate::model::naming::{getter_name, setter_name};
use crate::model::statements::StatementSequenceBuilder;
use crate::model::tree::{CallTarget, GeneratedMember, TreeFactory};

/// Name of the injected storage for unmapped columns.
pub(crate) const RAW_ATTRIBUTES: &str = "raw_attributes";

fn setter(tree: &TreeFactory<'_>, field: &Ident, ty: &Type) -> Result<GeneratedMember, BuilderStateError> {
    let param = field.to_string();
    let mut body = StatementSequenceBuilder::new(tree);
    body.assign_field(field, &tree.var_ref(&param))?;

    let mut method = MethodAssembler::new(tree);
    method
        .doc(&format!("Sets `{field}`."))?
        .add_parameter(&param, ty.clone())?
        .add_statements(body.finish()?)?;
    if tree.config().fluent_setters {
        method.return_type(parse_quote!(&mut Self))?.returns(parse_quote!(self))?;
    }
    method.finish(&setter_name(field), Modifiers::PUBLIC_EXCLUSIVE)
}

fn getter(tree: &TreeFactory<'_>, field: &Ident, ty: &Type) -> Result<GeneratedMember, BuilderStateError> {
    let place = tree.field_ref(field);
    let mut method = MethodAssembler::new(tree);
    method
        .doc(&format!("Returns `{field}`."))?
        .return_type(parse_quote!(&#ty))?
        .returns(parse_quote!(&#place))?;
    method.finish(&getter_name(field), Modifiers::PUBLIC_SHARED)
}

/// Injects a setter then a getter for `field`.
fn inject_pair(tree: &mut TreeFactory<'_>, field: &Ident, ty: &Type) -> Result<(), BuilderStateError> {
    let set = setter(tree, field, ty)?;
    tree.inject(set)?;
    let get = getter(tree, field, ty)?;
    tree.inject(get)
}

/// One accessor pair per declared field, in declaration order.
pub(crate) fn accessor_pairs(tree: &mut TreeFactory<'_>) -> Result<(), BuilderStateError> {
    let fields: Vec<(Ident, Type)> = tree
        .fields()
        .iter()
        .map(|field| (field.ident.clone(), field.ty.clone()))
        .collect();
    for (ident, ty) in &fields {
        inject_pair(tree, ident, ty)?;
    }
    Ok(())
}

/// The primary key field mapped to its column, then its accessors.
pub(crate) fn primary_key(tree: &mut TreeFactory<'_>) -> Result<(), BuilderStateError> {
    let config = tree.config();
    let name = &config.primary_field_name;
    let ty = &config.primary_class;
    let column = &config.primary_column_name;
    let field = tree.new_field(name, ty.clone(), vec![parse_quote!(#[serde(rename = #column, default)])]);
    tree.inject(field)?;
    inject_pair(tree, name, ty)
}

/// Transient storage for columns and properties without a declared field.
pub(crate) fn raw_attributes(tree: &mut TreeFactory<'_>) -> Result<(), BuilderStateError> {
    let storage = crate::model::tree::ident(RAW_ATTRIBUTES);
    let value = tree.type_ref("Value");
    let map: Type = parse_quote!(::std::collections::HashMap<::std::string::String, #value>);
    let field = tree.new_field(&storage, map.clone(), vec![parse_quote!(#[serde(skip)])]);
    tree.inject(field)?;

    let get = {
        let mut method = MethodAssembler::new(tree);
        method
            .doc("Returns the raw attribute stored under `name`, if any.")?
            .add_parameter("name", tree.str_ref())?
            .return_type(parse_quote!(::core::option::Option<&#value>))?
            .return_forward(&CallTarget::field(RAW_ATTRIBUTES), "get", &[tree.var_ref("name")])?;
        method.finish("raw_attribute", Modifiers::PUBLIC_SHARED)?
    };
    tree.inject(get)?;

    let set = {
        let key: Expr = tree.invoke(&CallTarget::local("name"), "to_owned", &[]);
        let mut body = StatementSequenceBuilder::new(tree);
        body.call_statement(&CallTarget::field(RAW_ATTRIBUTES), "insert", &[key, tree.var_ref("value")])?;
        let mut method = MethodAssembler::new(tree);
        method
            .doc("Stores `value` as the raw attribute `name`, replacing any previous value.")?
            .add_parameter("name", tree.str_ref())?
            .add_parameter("value", value)?
            .add_statements(body.finish()?)?;
        method.finish("set_raw_attribute", Modifiers::PUBLIC_EXCLUSIVE)?
    };
    tree.inject(set)?;

    let all = {
        let place = tree.field_ref(&storage);
        let mut method = MethodAssembler::new(tree);
        method
            .doc("Returns every raw attribute.")?
            .return_type(parse_quote!(&#map))?
            .returns(parse_quote!(&#place))?;
        method.finish("raw_attributes", Modifiers::PUBLIC_SHARED)?
    };
    tree.inject(all)
}
