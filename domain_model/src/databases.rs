//! Process-wide executor registry and the factories generated models use.

use std::sync::Arc;

use parking_lot::{RwLock, const_rwlock};
use tracing::info;

use crate::{DomainModel, Executor, Persistence, Query, StorageError, StorageResult};

static EXECUTOR: RwLock<Option<Arc<dyn Executor>>> = const_rwlock(None);

/// Registry of the executor every generated model talks to.
#[derive(Clone, Copy, Debug)]
pub struct Databases;

impl Databases {
    /// Installs `executor`, returning the one it replaces.
    pub fn install(executor: Arc<dyn Executor>) -> Option<Arc<dyn Executor>> {
        let previous = EXECUTOR.write().replace(executor);
        info!(replaced = previous.is_some(), "database executor installed");
        previous
    }

    /// Removes the installed executor.
    pub fn uninstall() -> Option<Arc<dyn Executor>> {
        let previous = EXECUTOR.write().take();
        if previous.is_some() {
            info!("database executor uninstalled");
        }
        previous
    }

    /// The installed executor.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::NoDatabase`] when nothing is installed.
    pub fn executor() -> StorageResult<Arc<dyn Executor>> {
        Self::current().ok_or(StorageError::NoDatabase)
    }

    pub(crate) fn current() -> Option<Arc<dyn Executor>> {
        EXECUTOR.read().clone()
    }

    /// Factory behind every generated `create_query`.
    #[must_use]
    pub const fn query_factory() -> QueryFactory {
        QueryFactory { _private: () }
    }

    /// Factory behind every generated `create_persistence`.
    #[must_use]
    pub const fn persistence_factory() -> PersistenceFactory {
        PersistenceFactory { _private: () }
    }
}

/// Creates [`Query`] handles bound to the installed executor.
#[derive(Clone, Copy, Debug)]
pub struct QueryFactory {
    _private: (),
}

impl QueryFactory {
    /// A query over `T`'s table with no narrowing applied.
    #[must_use]
    pub fn create_query<T: DomainModel>(&self) -> Query<T> {
        Query::new(Databases::current())
    }
}

/// Creates [`Persistence`] handles bound to the installed executor.
#[derive(Clone, Copy, Debug)]
pub struct PersistenceFactory {
    _private: (),
}

impl PersistenceFactory {
    /// A persistence handle for `T`.
    #[must_use]
    pub fn create_persistence<T: DomainModel>(&self) -> Persistence<T> {
        Persistence::new(Databases::current())
    }
}
