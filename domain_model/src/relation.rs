//! Child collections loaded alongside a query.

use crate::DomainModel;

/// A one-to-many relation preloaded by `query_with`.
///
/// Child rows whose `foreign_key` column equals a parent's primary key are
/// stored on that parent as a raw attribute called `name`, holding an array
/// of row objects.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Relation {
    name: String,
    table: String,
    foreign_key: String,
}

impl Relation {
    /// Describes a relation to rows of `table`.
    pub fn new(name: impl Into<String>, table: impl Into<String>, foreign_key: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            table: table.into(),
            foreign_key: foreign_key.into(),
        }
    }

    /// Describes a relation to the table of model `C`.
    pub fn has_many<C: DomainModel>(name: impl Into<String>, foreign_key: impl Into<String>) -> Self {
        Self::new(name, C::TABLE, foreign_key)
    }

    /// Raw attribute the child rows are stored under.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Table holding the child rows.
    #[must_use]
    pub fn table(&self) -> &str {
        &self.table
    }

    /// Column of the child table referencing the parent key.
    #[must_use]
    pub fn foreign_key(&self) -> &str {
        &self.foreign_key
    }
}
