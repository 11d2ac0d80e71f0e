//! The `TABLE_NAME` constant.

use crate::model::error::BuilderStateError;
use crate::model::tree::{CallTarget, TreeFactory};

/// `pub const TABLE_NAME: &'static str = Tables::table_name::<Self>();`
pub(crate) fn table_name(tree: &mut TreeFactory<'_>) -> Result<(), BuilderStateError> {
    let init = tree.invoke_generic(
        &CallTarget::Owner(tree.type_ref("Tables")),
        "table_name",
        &[tree.self_type_ref()],
        &[],
    );
    let constant = tree.new_const(
        "TABLE_NAME",
        &syn::parse_quote!(&'static str),
        &init,
        "Table this model is stored in.",
    );
    tree.inject(constant)
}
