//! Table-level operations that need no handle.

use crate::beans::Beans;
use crate::executor;
use crate::{Databases, DomainModel, StorageError, StorageResult, ValidationError, Value, Violation};

/// Table name resolution, raw SQL, counting and validation.
#[derive(Clone, Copy, Debug)]
pub struct Tables;

impl Tables {
    /// The table `T` is stored in.
    #[must_use]
    pub const fn table_name<T: DomainModel>() -> &'static str {
        T::TABLE
    }

    /// Runs a raw statement, returning the affected row count.
    ///
    /// # Errors
    ///
    /// Fails when no executor is installed or the backend fails.
    pub fn execute(sql: &str, params: &[Value]) -> StorageResult<u64> {
        let backend = Databases::executor()?;
        executor::execute(backend.as_ref(), sql, params)
    }

    /// Runs a raw query and maps every row onto `T`.
    ///
    /// # Errors
    ///
    /// Fails when no executor is installed, the backend fails, or a row does
    /// not fit `T`.
    pub fn query<T: DomainModel>(sql: &str, params: &[Value]) -> StorageResult<Vec<T>> {
        let backend = Databases::executor()?;
        executor::query(backend.as_ref(), sql, params)?
            .into_iter()
            .map(Beans::from_row::<T>)
            .collect()
    }

    /// Counts the rows of `T`'s table matching the raw `predicate`.
    ///
    /// # Errors
    ///
    /// Fails when no executor is installed, the backend fails, or the result
    /// is not a single non-negative integer.
    pub fn count<T: DomainModel>(predicate: &str, params: &[Value]) -> StorageResult<u64> {
        let mut sql = format!("SELECT COUNT(*) AS count FROM {}", T::TABLE);
        let predicate = predicate.trim();
        if !predicate.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(predicate);
        }
        let backend = Databases::executor()?;
        let rows = executor::query(backend.as_ref(), &sql, params)?;
        let count = rows
            .first()
            .and_then(|row| row.values().next())
            .and_then(Value::as_u64);
        count.ok_or_else(|| StorageError::UnexpectedShape {
            sql,
            detail: "expected one row holding a non-negative count".to_owned(),
        })
    }

    /// Checks `bean` against its validation rules.
    ///
    /// With `silent` set the violations are returned even when there are
    /// some; otherwise any violation is an error.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] when `silent` is unset and a rule fails.
    pub fn validate<T: DomainModel>(bean: &T, silent: bool) -> Result<Vec<Violation>, ValidationError> {
        let violations = bean.violations();
        if silent || violations.is_empty() {
            Ok(violations)
        } else {
            Err(ValidationError::new(T::MODEL_NAME, violations))
        }
    }
}
