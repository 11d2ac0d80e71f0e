//! The seam between generated models and an actual database.

use tracing::debug;

use crate::{Row, StorageResult, Value};

/// Runs SQL against a backing store.
///
/// Statements use `?` placeholders bound positionally from `params`.
/// Implementations map their own failures with
/// [`StorageError::backend`](crate::StorageError::backend).
pub trait Executor: Send + Sync {
    /// Runs a statement returning rows.
    ///
    /// # Errors
    ///
    /// Returns an error when the backend rejects the statement.
    fn query(&self, sql: &str, params: &[Value]) -> StorageResult<Vec<Row>>;

    /// Runs a statement and returns the number of affected rows.
    ///
    /// # Errors
    ///
    /// Returns an error when the backend rejects the statement.
    fn execute(&self, sql: &str, params: &[Value]) -> StorageResult<u64>;

    /// Runs an insert and returns the generated key, if the backend made one.
    ///
    /// # Errors
    ///
    /// Returns an error when the backend rejects the statement.
    fn insert(&self, sql: &str, params: &[Value]) -> StorageResult<Option<Value>>;
}

pub(crate) fn query(executor: &dyn Executor, sql: &str, params: &[Value]) -> StorageResult<Vec<Row>> {
    debug!(sql, params = params.len(), "query");
    executor.query(sql, params)
}

pub(crate) fn execute(executor: &dyn Executor, sql: &str, params: &[Value]) -> StorageResult<u64> {
    debug!(sql, params = params.len(), "execute");
    executor.execute(sql, params)
}

pub(crate) fn insert(executor: &dyn Executor, sql: &str, params: &[Value]) -> StorageResult<Option<Value>> {
    debug!(sql, params = params.len(), "insert");
    executor.insert(sql, params)
}
