//! One function per generated member group, each taking the pass's
//! [`TreeFactory`](super::tree::TreeFactory).

mod accessors;
mod factories;
mod forward;
mod instance;
mod persistence;
mod queries;
mod table;
mod wiring;

pub(crate) use accessors::{accessor_pairs, primary_key, raw_attributes};
pub(crate) use factories::{create_persistence, create_query};
pub(crate) use instance::{new_instance_from, validate};
pub(crate) use persistence::{
    create, create_all, destroy, destroy_where, execute, save, update, update_where,
};
pub(crate) use queries::{count, query, query_by_sql, query_first, query_first_with, query_with};
pub(crate) use table::table_name;
pub(crate) use wiring::model_trait;
