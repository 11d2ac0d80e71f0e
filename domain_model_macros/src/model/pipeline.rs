//! The fixed, ordered handler list run once per target.

use super::config::Configuration;
use super::error::{BuilderStateError, GenerationError};
use super::handlers;
use super::tree::{TargetDeclaration, TreeFactory};

type Handler = fn(&mut TreeFactory<'_>) -> Result<(), BuilderStateError>;

/// Handlers in invocation order.
///
/// The primary key precedes the id-based `update`/`destroy`, the factory
/// accessors precede everything forwarding through them, and raw attribute
/// storage precedes the trait wiring that exposes it.
pub(crate) const HANDLERS: &[(&str, Handler)] = &[
    ("accessor_pairs", handlers::accessor_pairs),
    ("primary_key", handlers::primary_key),
    ("table_name", handlers::table_name),
    ("create_query", handlers::create_query),
    ("create_persistence", handlers::create_persistence),
    ("save", handlers::save),
    ("create", handlers::create),
    ("create_all", handlers::create_all),
    ("update", handlers::update),
    ("update_where", handlers::update_where),
    ("destroy", handlers::destroy),
    ("destroy_where", handlers::destroy_where),
    ("execute", handlers::execute),
    ("query", handlers::query),
    ("query_with", handlers::query_with),
    ("query_by_sql", handlers::query_by_sql),
    ("query_first_with", handlers::query_first_with),
    ("query_first", handlers::query_first),
    ("count", handlers::count),
    ("validate", handlers::validate),
    ("new_instance_from", handlers::new_instance_from),
    ("raw_attributes", handlers::raw_attributes),
    ("model_trait", handlers::model_trait),
];

/// Runs every handler over `target`, stopping at the first failure.
///
/// # Errors
///
/// Returns the failing handler's name together with its builder error.
pub(crate) fn run(config: &Configuration, target: TargetDeclaration) -> Result<TargetDeclaration, GenerationError> {
    let mut tree = TreeFactory::new(config, target);
    for &(handler, step) in HANDLERS {
        step(&mut tree).map_err(|source| GenerationError::Handler { handler, source })?;
    }
    Ok(tree.into_target())
}
