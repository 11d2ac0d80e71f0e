//! Write members forwarding to `Persistence<Self>` or `Tables`.

use syn::parse_quote;

use crate::model::error::BuilderStateError;
use crate::model::method::Modifiers;
use crate::model::tree::{CallTarget, TreeFactory};

use super::forward::{Forward, Handle, Shape, vars};

pub(crate) fn save(tree: &mut TreeFactory<'_>) -> Result<(), BuilderStateError> {
    let handle = Handle::persistence(tree);
    let target = handle.target();
    let args = vars(tree, &["self", "skip_validation"]);
    Forward::new(
        "save",
        "Inserts or updates this model, keeping the generated key after an insert.",
        Modifiers::PUBLIC_EXCLUSIVE,
    )
    .param("skip_validation", Shape::Plain(parse_quote!(bool)))
    .through(handle)
    .fallible()
    .emit(tree, &target, "save", &[], &args)
}

pub(crate) fn create(tree: &mut TreeFactory<'_>) -> Result<(), BuilderStateError> {
    let handle = Handle::persistence(tree);
    let target = handle.target();
    let args = vars(tree, &["dirty_object", "skip_validation"]);
    Forward::new(
        "create",
        "Inserts `dirty_object` and returns it with its generated primary key.",
        Modifiers::PUBLIC_STATIC,
    )
    .param("dirty_object", Shape::Plain(tree.self_type_ref()))
    .param("skip_validation", Shape::Plain(parse_quote!(bool)))
    .through(handle)
    .returning(tree.self_type_ref())
    .fallible()
    .emit(tree, &target, "insert", &[], &args)
}

pub(crate) fn create_all(tree: &mut TreeFactory<'_>) -> Result<(), BuilderStateError> {
    let handle = Handle::persistence(tree);
    let target = handle.target();
    let args = vars(tree, &["dirty_objects", "skip_validation"]);
    Forward::new(
        "create_all",
        "Inserts every object in one batch and returns the affected row counts.",
        Modifiers::PUBLIC_STATIC,
    )
    .param("dirty_objects", Shape::Array(tree.self_type_ref()))
    .param("skip_validation", Shape::Plain(parse_quote!(bool)))
    .through(handle)
    .returning(tree.array_type(&parse_quote!(u64)))
    .fallible()
    .emit(tree, &target, "insert_all", &[], &args)
}

pub(crate) fn update(tree: &mut TreeFactory<'_>) -> Result<(), BuilderStateError> {
    let handle = Handle::persistence(tree);
    let target = handle.target();
    let args = vars(tree, &["id", "dirty_object", "skip_validation"]);
    let key = tree.config().primary_class.clone();
    let model = tree.self_type_ref();
    Forward::new(
        "update",
        "Writes the persistent fields of `dirty_object` to the row identified by `id`.",
        Modifiers::PUBLIC_STATIC,
    )
    .param("id", Shape::Plain(key))
    .param("dirty_object", Shape::Plain(parse_quote!(&#model)))
    .param("skip_validation", Shape::Plain(parse_quote!(bool)))
    .through(handle)
    .returning(parse_quote!(u64))
    .fallible()
    .emit(tree, &target, "update", &[], &args)
}

pub(crate) fn update_where(tree: &mut TreeFactory<'_>) -> Result<(), BuilderStateError> {
    let handle = Handle::persistence(tree);
    let target = handle.target();
    let args = vars(tree, &["updates", "predicate"]);
    Forward::new(
        "update_where",
        "Applies the raw `updates` clause to every row matching `predicate`.",
        Modifiers::PUBLIC_STATIC,
    )
    .param("updates", Shape::Plain(tree.str_ref()))
    .param("predicate", Shape::Plain(tree.str_ref()))
    .through(handle)
    .returning(parse_quote!(u64))
    .fallible()
    .emit(tree, &target, "update_where", &[], &args)
}

pub(crate) fn destroy(tree: &mut TreeFactory<'_>) -> Result<(), BuilderStateError> {
    let handle = Handle::persistence(tree);
    let target = handle.target();
    let args = vars(tree, &["id"]);
    let key = tree.config().primary_class.clone();
    Forward::new("destroy", "Deletes the row identified by `id`.", Modifiers::PUBLIC_STATIC)
        .param("id", Shape::Plain(key))
        .through(handle)
        .returning(parse_quote!(u64))
        .fallible()
        .emit(tree, &target, "delete", &[], &args)
}

pub(crate) fn destroy_where(tree: &mut TreeFactory<'_>) -> Result<(), BuilderStateError> {
    let handle = Handle::persistence(tree);
    let target = handle.target();
    let args = vars(tree, &["predicate"]);
    Forward::new(
        "destroy_where",
        "Deletes every row matching the raw `predicate`.",
        Modifiers::PUBLIC_STATIC,
    )
    .param("predicate", Shape::Plain(tree.str_ref()))
    .through(handle)
    .returning(parse_quote!(u64))
    .fallible()
    .emit(tree, &target, "delete_where", &[], &args)
}

pub(crate) fn execute(tree: &mut TreeFactory<'_>) -> Result<(), BuilderStateError> {
    let target = CallTarget::Owner(tree.type_ref("Tables"));
    let args = vars(tree, &["sql", "params"]);
    Forward::new("execute", "Runs a raw SQL statement.", Modifiers::PUBLIC_STATIC)
        .param("sql", Shape::Plain(tree.str_ref()))
        .param("params", Shape::Variadic(tree.type_ref("Value")))
        .returning(parse_quote!(u64))
        .fallible()
        .emit(tree, &target, "execute", &[], &args)
}
