//! Procedural macros for `domain_model`.
//!
//! The [`macro@domain_model`] attribute turns a plain struct with named fields
//! into an active-record style model. A single expansion reads the attribute
//! arguments, snapshots the declared fields, and runs a fixed sequence of
//! handlers that inject accessors, the primary key, the table name constant,
//! and thin persistence/query methods forwarding into the `domain_model`
//! runtime.

use proc_macro::TokenStream;

mod model;

/// Augments a struct with generated accessor, mapping and persistence members.
///
/// Recognised options:
///
/// - `primary_field_name = "id"`: name of the synthesised primary key field.
/// - `primary_column_name = "id"`: column the primary key maps to.
/// - `primary_class = i64`: primary key type (a type or a string literal).
/// - `fluent_setters = false`: whether setters return `&mut Self`.
/// - `table_name = "..."`: explicit table name instead of the derived one.
/// - `crate = "..."`: path of the runtime crate when it is renamed.
/// - `validator = path::to::rules`: `fn(&Self) -> Vec<Violation>` rules.
///
/// Declared fields marked `#[transient]` still receive accessors but are
/// excluded from persistence.
///
/// Getters take the field name unchanged, so a declared field must not share
/// a name with a generated associated item: `TABLE_NAME`, `create_query`,
/// `create_persistence`, `save`, `create`, `create_all`, `update`,
/// `update_where`, `destroy`, `destroy_where`, `execute`, `query`,
/// `query_with`, `query_by_sql`, `query_first_with`, `query_first`, `count`,
/// `validate`, `new_instance_from`, `raw_attribute`, `set_raw_attribute` and
/// `raw_attributes`. The primary key field name and `raw_attributes` are also
/// taken as field names. A collision is a compile error naming the member.
///
/// ```rust,ignore
/// use domain_model::domain_model;
///
/// #[domain_model(fluent_setters = true)]
/// #[derive(Debug, Default)]
/// pub struct Order {
///     amount: f64,
///     status: String,
/// }
///
/// let mut order = Order::default();
/// order.set_amount(10.0).set_status("open".to_owned());
/// let stored = Order::create(order, false)?;
/// ```
#[proc_macro_attribute]
pub fn domain_model(args: TokenStream, input: TokenStream) -> TokenStream {
    model::expand(args.into(), input.into())
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}

#[cfg(test)]
mod tests;
