//! Read members: predicate queries, raw SQL queries and counting.

use syn::parse_quote;

use crate::model::error::BuilderStateError;
use crate::model::method::Modifiers;
use crate::model::tree::{CallTarget, TreeFactory};

use super::forward::{Forward, Handle, Shape, predicate_params, vars};

fn relations(tree: &TreeFactory<'_>) -> Shape {
    Shape::Array(tree.type_ref("Relation"))
}

fn models(tree: &TreeFactory<'_>) -> syn::Type {
    tree.array_type(&tree.self_type_ref())
}

fn first_model(tree: &TreeFactory<'_>) -> syn::Type {
    let model = tree.self_type_ref();
    parse_quote!(::core::option::Option<#model>)
}

pub(crate) fn query(tree: &mut TreeFactory<'_>) -> Result<(), BuilderStateError> {
    let handle = Handle::query(tree);
    let target = handle.target();
    Forward::new("query", "Loads every row matching `predicate`.", Modifiers::PUBLIC_STATIC)
        .params(predicate_params(tree))
        .through(handle)
        .narrowed()
        .returning(models(tree))
        .fallible()
        .emit(tree, &target, "execute", &[], &[parse_quote!(&[])])
}

pub(crate) fn query_with(tree: &mut TreeFactory<'_>) -> Result<(), BuilderStateError> {
    let handle = Handle::query(tree);
    let target = handle.target();
    let args = vars(tree, &["relations"]);
    let [predicate, params] = predicate_params(tree);
    Forward::new(
        "query_with",
        "Loads every row matching `predicate` and preloads `relations` into raw attributes.",
        Modifiers::PUBLIC_STATIC,
    )
    .params([predicate, ("relations", relations(tree)), params])
    .through(handle)
    .narrowed()
    .returning(models(tree))
    .fallible()
    .emit(tree, &target, "execute", &[], &args)
}

pub(crate) fn query_by_sql(tree: &mut TreeFactory<'_>) -> Result<(), BuilderStateError> {
    let target = CallTarget::Owner(tree.type_ref("Tables"));
    let generics = [tree.self_type_ref()];
    let args = vars(tree, &["sql", "params"]);
    Forward::new("query_by_sql", "Maps the rows of a raw SQL query.", Modifiers::PUBLIC_STATIC)
        .param("sql", Shape::Plain(tree.str_ref()))
        .param("params", Shape::Variadic(tree.type_ref("Value")))
        .returning(models(tree))
        .fallible()
        .emit(tree, &target, "query", &generics, &args)
}

pub(crate) fn query_first_with(tree: &mut TreeFactory<'_>) -> Result<(), BuilderStateError> {
    let handle = Handle::query(tree);
    let target = handle.target();
    let args = vars(tree, &["relations"]);
    let [predicate, params] = predicate_params(tree);
    Forward::new(
        "query_first_with",
        "Loads the first row matching `predicate` with `relations` preloaded.",
        Modifiers::PUBLIC_STATIC,
    )
    .params([predicate, ("relations", relations(tree)), params])
    .through(handle)
    .narrowed()
    .returning(first_model(tree))
    .fallible()
    .emit(tree, &target, "query_first", &[], &args)
}

pub(crate) fn query_first(tree: &mut TreeFactory<'_>) -> Result<(), BuilderStateError> {
    let handle = Handle::query(tree);
    let target = handle.target();
    Forward::new("query_first", "Loads the first row matching `predicate`.", Modifiers::PUBLIC_STATIC)
        .params(predicate_params(tree))
        .through(handle)
        .narrowed()
        .returning(first_model(tree))
        .fallible()
        .emit(tree, &target, "query_first", &[], &[parse_quote!(&[])])
}

pub(crate) fn count(tree: &mut TreeFactory<'_>) -> Result<(), BuilderStateError> {
    let target = CallTarget::Owner(tree.type_ref("Tables"));
    let generics = [tree.self_type_ref()];
    let args = vars(tree, &["predicate", "params"]);
    Forward::new("count", "Counts the rows matching `predicate`.", Modifiers::PUBLIC_STATIC)
        .params(predicate_params(tree))
        .returning(parse_quote!(u64))
        .fallible()
        .emit(tree, &target, "count", &generics, &args)
}
