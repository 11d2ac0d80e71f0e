//! An in-memory [`Executor`] that records statements and replays scripted
//! results.
//!
//! Each query pops the next scripted row set (or returns no rows), each
//! insert pops the next scripted key, and each execute reports the
//! configured affected row count.

use std::collections::VecDeque;

use domain_model::{Executor, Row, StorageError, StorageResult, Value};
use parking_lot::Mutex;

/// A statement seen by the executor.
#[derive(Clone, Debug, PartialEq)]
pub struct Recorded {
    /// The SQL text as received.
    pub sql: String,
    /// Bound parameters in order.
    pub params: Vec<Value>,
}

#[derive(Default)]
struct Script {
    statements: Vec<Recorded>,
    rows: VecDeque<Vec<Row>>,
    keys: VecDeque<Value>,
    failure: Option<String>,
}

/// Records every statement and answers from a script.
pub struct RecordingExecutor {
    script: Mutex<Script>,
    affected: u64,
}

impl Default for RecordingExecutor {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordingExecutor {
    /// An executor reporting one affected row per execute.
    #[must_use]
    pub fn new() -> Self {
        Self::with_affected(1)
    }

    /// An executor reporting `affected` rows per execute.
    #[must_use]
    pub fn with_affected(affected: u64) -> Self {
        Self {
            script: Mutex::new(Script::default()),
            affected,
        }
    }

    /// Queues the rows returned by the next query.
    pub fn push_rows<I>(&self, rows: I)
    where
        I: IntoIterator<Item = Value>,
    {
        let rows = rows
            .into_iter()
            .filter_map(|row| match row {
                Value::Object(map) => Some(map),
                _ => None,
            })
            .collect();
        self.script.lock().rows.push_back(rows);
    }

    /// Queues the key returned by the next insert.
    pub fn push_key(&self, key: Value) {
        self.script.lock().keys.push_back(key);
    }

    /// Makes the next statement fail with `message`.
    pub fn fail_next(&self, message: impl Into<String>) {
        self.script.lock().failure = Some(message.into());
    }

    /// Every statement received so far.
    #[must_use]
    pub fn statements(&self) -> Vec<Recorded> {
        self.script.lock().statements.clone()
    }

    /// SQL text of every statement received so far.
    #[must_use]
    pub fn sql(&self) -> Vec<String> {
        self.script
            .lock()
            .statements
            .iter()
            .map(|recorded| recorded.sql.clone())
            .collect()
    }

    fn record(&self, sql: &str, params: &[Value]) -> StorageResult<parking_lot::MutexGuard<'_, Script>> {
        let mut script = self.script.lock();
        script.statements.push(Recorded {
            sql: sql.to_owned(),
            params: params.to_vec(),
        });
        match script.failure.take() {
            Some(message) => Err(StorageError::backend(message)),
            None => Ok(script),
        }
    }
}

impl Executor for RecordingExecutor {
    fn query(&self, sql: &str, params: &[Value]) -> StorageResult<Vec<Row>> {
        Ok(self.record(sql, params)?.rows.pop_front().unwrap_or_default())
    }

    fn execute(&self, sql: &str, params: &[Value]) -> StorageResult<u64> {
        drop(self.record(sql, params)?);
        Ok(self.affected)
    }

    fn insert(&self, sql: &str, params: &[Value]) -> StorageResult<Option<Value>> {
        Ok(self.record(sql, params)?.keys.pop_front())
    }
}
