//! Active-record members for plain Rust structs.
//!
//! Annotating a struct with [`macro@domain_model`] injects accessors, a
//! primary key, a `TABLE_NAME` constant and a family of persistence and
//! query methods. The generated methods are thin: each obtains a handle from
//! this crate and forwards to it, so all behaviour lives here and any
//! backend can be plugged in through the [`Executor`] trait.
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use domain_model::{Databases, domain_model};
//!
//! #[domain_model]
//! #[derive(Debug, Default)]
//! pub struct Order {
//!     amount: f64,
//! }
//!
//! Databases::install(Arc::new(MyExecutor::connect()?));
//! let open = Order::query("amount > ?", &[100.into()])?;
//! ```

pub use domain_model_macros::domain_model;

mod beans;
mod databases;
mod error;
mod executor;
mod model;
mod persistence;
mod query;
mod relation;
mod tables;
mod validation;

pub use beans::Beans;
pub use databases::{Databases, PersistenceFactory, QueryFactory};
pub use error::{StorageError, StorageResult};
pub use executor::Executor;
pub use model::DomainModel;
pub use persistence::Persistence;
pub use query::Query;
pub use relation::Relation;
pub use tables::Tables;
pub use validation::{ValidationError, Violation};

/// Dynamic column and property value.
pub use serde_json::Value;

/// One result row keyed by column name.
pub type Row = serde_json::Map<String, Value>;

#[doc(hidden)]
pub mod __private {
    pub use serde;
    pub use serde_json;
}
