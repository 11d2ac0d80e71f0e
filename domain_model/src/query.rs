//! Narrowable `SELECT` handles.

use std::collections::HashMap;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use tracing::warn;

use crate::beans::Beans;
use crate::executor::{self, Executor};
use crate::{DomainModel, Relation, StorageError, StorageResult, Value};

/// A query over the table of `T`.
///
/// Narrowing methods mutate the handle in place; `execute` and `query_first`
/// can be called any number of times.
pub struct Query<T> {
    executor: Option<Arc<dyn Executor>>,
    predicate: Option<String>,
    params: Vec<Value>,
    order_by: Option<String>,
    limit: Option<u64>,
    offset: Option<u64>,
    model: PhantomData<fn() -> T>,
}

impl<T> fmt::Debug for Query<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Query")
            .field("predicate", &self.predicate)
            .field("params", &self.params)
            .field("order_by", &self.order_by)
            .field("limit", &self.limit)
            .field("offset", &self.offset)
            .finish_non_exhaustive()
    }
}

impl<T: DomainModel> Query<T> {
    pub(crate) const fn new(executor: Option<Arc<dyn Executor>>) -> Self {
        Self {
            executor,
            predicate: None,
            params: Vec::new(),
            order_by: None,
            limit: None,
            offset: None,
            model: PhantomData,
        }
    }

    /// Restricts rows to those matching the raw `predicate`, replacing any
    /// earlier predicate and its parameters. A blank predicate matches every
    /// row.
    pub fn filter(&mut self, predicate: &str, params: &[Value]) -> &mut Self {
        let predicate = predicate.trim();
        self.predicate = (!predicate.is_empty()).then(|| predicate.to_owned());
        self.params = params.to_vec();
        self
    }

    /// Orders rows by the raw `clause`, e.g. `"amount DESC"`.
    pub fn order_by(&mut self, clause: &str) -> &mut Self {
        self.order_by = Some(clause.to_owned());
        self
    }

    /// Returns at most `limit` rows.
    pub const fn limit(&mut self, limit: u64) -> &mut Self {
        self.limit = Some(limit);
        self
    }

    /// Skips the first `offset` rows.
    pub const fn offset(&mut self, offset: u64) -> &mut Self {
        self.offset = Some(offset);
        self
    }

    /// The statement [`execute`](Self::execute) runs.
    #[must_use]
    pub fn to_sql(&self) -> String {
        self.sql_with_limit(self.limit)
    }

    fn sql_with_limit(&self, limit: Option<u64>) -> String {
        let mut sql = format!("SELECT * FROM {}", T::TABLE);
        if let Some(predicate) = &self.predicate {
            sql.push_str(" WHERE ");
            sql.push_str(predicate);
        }
        if let Some(clause) = &self.order_by {
            sql.push_str(" ORDER BY ");
            sql.push_str(clause);
        }
        if let Some(limit) = limit {
            sql.push_str(&format!(" LIMIT {limit}"));
        }
        if let Some(offset) = self.offset {
            sql.push_str(&format!(" OFFSET {offset}"));
        }
        sql
    }

    fn executor(&self) -> StorageResult<&dyn Executor> {
        self.executor.as_deref().ok_or(StorageError::NoDatabase)
    }

    /// Loads every matching row, then preloads `relations`.
    ///
    /// # Errors
    ///
    /// Fails when no executor is installed, when the backend fails, or when
    /// a row does not fit `T`.
    pub fn execute(&self, relations: &[Relation]) -> StorageResult<Vec<T>> {
        self.load(&self.to_sql(), relations)
    }

    /// Loads the first matching row, then preloads `relations`.
    ///
    /// # Errors
    ///
    /// As for [`execute`](Self::execute).
    pub fn query_first(&self, relations: &[Relation]) -> StorageResult<Option<T>> {
        let sql = self.sql_with_limit(Some(1));
        Ok(self.load(&sql, relations)?.into_iter().next())
    }

    fn load(&self, sql: &str, relations: &[Relation]) -> StorageResult<Vec<T>> {
        let backend = self.executor()?;
        let rows = executor::query(backend, sql, &self.params)?;
        let mut models = rows
            .into_iter()
            .map(Beans::from_row::<T>)
            .collect::<StorageResult<Vec<T>>>()?;
        for relation in relations {
            preload(backend, relation, &mut models)?;
        }
        Ok(models)
    }
}

fn key_of<T: DomainModel>(model: &T) -> StorageResult<Value> {
    Ok(serde_json::to_value(model.primary_key())?)
}

/// Groups child rows by foreign key with one extra query per relation.
fn preload<T: DomainModel>(backend: &dyn Executor, relation: &Relation, models: &mut [T]) -> StorageResult<()> {
    if models.is_empty() {
        return Ok(());
    }
    let keys = models.iter().map(key_of).collect::<StorageResult<Vec<_>>>()?;
    let placeholders = vec!["?"; keys.len()].join(", ");
    let sql = format!(
        "SELECT * FROM {} WHERE {} IN ({placeholders})",
        relation.table(),
        relation.foreign_key()
    );
    let mut grouped: HashMap<String, Vec<Value>> = HashMap::new();
    for row in executor::query(backend, &sql, &keys)? {
        let Some(parent) = row.get(relation.foreign_key()).map(ToString::to_string) else {
            warn!(
                relation = relation.name(),
                column = relation.foreign_key(),
                "related row has no foreign key column"
            );
            continue;
        };
        grouped.entry(parent).or_default().push(Value::Object(row));
    }
    for (model, key) in models.iter_mut().zip(&keys) {
        let children = grouped.remove(&key.to_string()).unwrap_or_default();
        model
            .raw_attributes_mut()
            .insert(relation.name().to_owned(), Value::Array(children));
    }
    Ok(())
}
