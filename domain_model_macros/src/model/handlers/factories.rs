//! `create_query` and `create_persistence`, the handles every other
//! persistence member forwards through.

use crate::model::error::BuilderStateError;
use crate::model::method::Modifiers;
use crate::model::tree::TreeFactory;

use super::forward::{Forward, Handle};

pub(crate) fn create_query(tree: &mut TreeFactory<'_>) -> Result<(), BuilderStateError> {
    let factory = Handle::registry(tree, "query_factory", "QueryFactory");
    let target = factory.target();
    let returns = tree.generic_type(&tree.type_ref("Query"), &[tree.self_type_ref()]);
    let generics = [tree.self_type_ref()];
    Forward::new("create_query", "Creates a query over this model's table.", Modifiers::PUBLIC_STATIC)
        .through(factory)
        .returning(returns)
        .emit(tree, &target, "create_query", &generics, &[])
}

pub(crate) fn create_persistence(tree: &mut TreeFactory<'_>) -> Result<(), BuilderStateError> {
    let factory = Handle::registry(tree, "persistence_factory", "PersistenceFactory");
    let target = factory.target();
    let returns = tree.generic_type(&tree.type_ref("Persistence"), &[tree.self_type_ref()]);
    let generics = [tree.self_type_ref()];
    Forward::new(
        "create_persistence",
        "Creates a persistence handle for this model.",
        Modifiers::PUBLIC_STATIC,
    )
    .through(factory)
    .returning(returns)
    .emit(tree, &target, "create_persistence", &generics, &[])
}
