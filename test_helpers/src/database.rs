//! Serialised access to the global executor registry.
//!
//! [`install`] takes a process-wide re-entrant lock, installs the executor
//! and returns a guard that restores the previously installed executor (or
//! none) when dropped. Tests touching the registry should also be marked
//! `#[serial]` so unrelated tests in the same binary do not race them.
//!
//! # Examples
//!
//! ```
//! use std::sync::Arc;
//! use domain_model_test_helpers::{RecordingExecutor, database};
//!
//! let executor = Arc::new(RecordingExecutor::new());
//! let _guard = database::install(executor.clone());
//! // Generated models now talk to `executor`.
//! ```

use std::sync::{Arc, LazyLock};

use domain_model::{Databases, Executor};
use parking_lot::{ReentrantMutex, ReentrantMutexGuard};

static REGISTRY_MUTEX: LazyLock<ReentrantMutex<()>> = LazyLock::new(ReentrantMutex::default);

/// RAII guard restoring the prior executor on drop.
#[must_use = "dropping restores the prior executor"]
pub struct DatabaseGuard {
    previous: Option<Arc<dyn Executor>>,
    _lock: ReentrantMutexGuard<'static, ()>,
}

/// Installs `executor` for the lifetime of the returned guard.
pub fn install(executor: Arc<dyn Executor>) -> DatabaseGuard {
    let lock = REGISTRY_MUTEX.lock();
    let previous = Databases::install(executor);
    DatabaseGuard {
        previous,
        _lock: lock,
    }
}

/// Removes any executor for the lifetime of the returned guard.
pub fn uninstalled() -> DatabaseGuard {
    let lock = REGISTRY_MUTEX.lock();
    let previous = Databases::uninstall();
    DatabaseGuard {
        previous,
        _lock: lock,
    }
}

impl Drop for DatabaseGuard {
    fn drop(&mut self) {
        match self.previous.take() {
            Some(previous) => {
                Databases::install(previous);
            }
            None => {
                Databases::uninstall();
            }
        }
    }
}
