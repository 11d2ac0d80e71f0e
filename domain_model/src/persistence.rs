//! Write handles: inserts, updates and deletes for one model type.

use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use crate::beans::Beans;
use crate::executor::{self, Executor};
use crate::{DomainModel, Row, StorageError, StorageResult, Tables, Value};

/// Persists models of type `T`.
pub struct Persistence<T> {
    executor: Option<Arc<dyn Executor>>,
    model: PhantomData<fn() -> T>,
}

impl<T> fmt::Debug for Persistence<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Persistence")
            .field("installed", &self.executor.is_some())
            .finish()
    }
}

struct Columns {
    names: Vec<String>,
    values: Vec<Value>,
}

impl Columns {
    /// Splits a row into column names and values, leaving out the primary key
    /// unless `keep_key` is set.
    fn of(row: Row, keep_key: bool, primary: &str) -> Self {
        let (names, values) = row
            .into_iter()
            .filter(|(name, _)| keep_key || name != primary)
            .unzip();
        Self { names, values }
    }
}

impl<T: DomainModel> Persistence<T> {
    pub(crate) const fn new(executor: Option<Arc<dyn Executor>>) -> Self {
        Self {
            executor,
            model: PhantomData,
        }
    }

    fn backend(&self) -> StorageResult<&dyn Executor> {
        self.executor.as_deref().ok_or(StorageError::NoDatabase)
    }

    fn check(bean: &T, skip_validation: bool) -> StorageResult<()> {
        if !skip_validation {
            Tables::validate(bean, false)?;
        }
        Ok(())
    }

    fn insert_sql(bean: &T) -> StorageResult<(String, Vec<Value>)> {
        let columns = Columns::of(Beans::to_row(bean)?, bean.is_persisted(), T::PRIMARY_COLUMN);
        if columns.names.is_empty() {
            return Ok((format!("INSERT INTO {} DEFAULT VALUES", T::TABLE), Vec::new()));
        }
        let placeholders = vec!["?"; columns.names.len()].join(", ");
        let sql = format!(
            "INSERT INTO {} ({}) VALUES ({placeholders})",
            T::TABLE,
            columns.names.join(", ")
        );
        Ok((sql, columns.values))
    }

    /// Inserts an unsaved `bean` or updates a saved one by primary key.
    ///
    /// An insert stores the generated key on `bean`, so saving it again
    /// updates the same row.
    ///
    /// # Errors
    ///
    /// Fails on validation, conversion or backend errors.
    pub fn save(&self, bean: &mut T, skip_validation: bool) -> StorageResult<()> {
        if bean.is_persisted() {
            self.update(bean.primary_key().clone(), bean, skip_validation)
                .map(drop)
        } else {
            self.insert_in_place(bean, skip_validation)
        }
    }

    /// Inserts `bean` and returns it carrying the generated primary key.
    ///
    /// # Errors
    ///
    /// Fails on validation, conversion or backend errors.
    pub fn insert(&self, mut bean: T, skip_validation: bool) -> StorageResult<T> {
        self.insert_in_place(&mut bean, skip_validation)?;
        Ok(bean)
    }

    fn insert_in_place(&self, bean: &mut T, skip_validation: bool) -> StorageResult<()> {
        Self::check(bean, skip_validation)?;
        let (sql, params) = Self::insert_sql(bean)?;
        if let Some(key) = executor::insert(self.backend()?, &sql, &params)? {
            bean.set_primary_key(serde_json::from_value(key)?);
        }
        Ok(())
    }

    /// Inserts every bean, returning the affected row count of each insert.
    ///
    /// All beans are validated before anything is written.
    ///
    /// # Errors
    ///
    /// Fails on the first validation, conversion or backend error.
    pub fn insert_all(&self, beans: &[T], skip_validation: bool) -> StorageResult<Vec<u64>> {
        for bean in beans {
            Self::check(bean, skip_validation)?;
        }
        let backend = self.backend()?;
        beans
            .iter()
            .map(|bean| {
                let (sql, params) = Self::insert_sql(bean)?;
                executor::execute(backend, &sql, &params)
            })
            .collect()
    }

    /// Writes the persistent fields of `bean` to the row keyed by `id`.
    ///
    /// # Errors
    ///
    /// Fails on validation, conversion or backend errors, and with
    /// [`StorageError::UnexpectedShape`] when the model has no columns
    /// besides its primary key.
    pub fn update(&self, id: T::PrimaryKey, bean: &T, skip_validation: bool) -> StorageResult<u64> {
        Self::check(bean, skip_validation)?;
        let Columns { names, mut values } = Columns::of(Beans::to_row(bean)?, false, T::PRIMARY_COLUMN);
        if names.is_empty() {
            return Err(StorageError::UnexpectedShape {
                sql: format!("UPDATE {} SET", T::TABLE),
                detail: format!("{} has no columns besides its primary key", T::MODEL_NAME),
            });
        }
        let assignments = names
            .iter()
            .map(|name| format!("{name} = ?"))
            .collect::<Vec<_>>()
            .join(", ");
        let sql = format!(
            "UPDATE {} SET {assignments} WHERE {} = ?",
            T::TABLE,
            T::PRIMARY_COLUMN
        );
        values.push(serde_json::to_value(id)?);
        executor::execute(self.backend()?, &sql, &values)
    }

    /// Applies the raw `updates` clause to rows matching the raw `predicate`.
    ///
    /// # Errors
    ///
    /// Fails when no executor is installed or the backend fails.
    pub fn update_where(&self, updates: &str, predicate: &str) -> StorageResult<u64> {
        let sql = format!("UPDATE {} SET {updates} WHERE {predicate}", T::TABLE);
        executor::execute(self.backend()?, &sql, &[])
    }

    /// Deletes the row keyed by `id`.
    ///
    /// # Errors
    ///
    /// Fails on conversion or backend errors.
    pub fn delete(&self, id: T::PrimaryKey) -> StorageResult<u64> {
        let sql = format!("DELETE FROM {} WHERE {} = ?", T::TABLE, T::PRIMARY_COLUMN);
        executor::execute(self.backend()?, &sql, &[serde_json::to_value(id)?])
    }

    /// Deletes rows matching the raw `predicate`.
    ///
    /// # Errors
    ///
    /// Fails when no executor is installed or the backend fails.
    pub fn delete_where(&self, predicate: &str) -> StorageResult<u64> {
        let sql = format!("DELETE FROM {} WHERE {predicate}", T::TABLE);
        executor::execute(self.backend()?, &sql, &[])
    }
}
