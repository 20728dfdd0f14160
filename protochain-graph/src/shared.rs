//! Thread-safe handle around a [`PrototypeGraph`].
//!
//! Lookups walk parent links that a concurrent `set_parent` could rewrite, so
//! every operation, read or write, takes the same lock for its whole duration.

use crate::{GraphError, GraphResult, PrototypeGraph, Value};
use protochain_types::EntityId;
use std::sync::{Arc, Mutex, MutexGuard};

/// A cloneable, lock-guarded prototype graph.
#[derive(Debug, Clone, Default)]
pub struct SharedGraph {
    inner: Arc<Mutex<PrototypeGraph>>,
}

impl SharedGraph {
    #[must_use]
    pub fn new(graph: PrototypeGraph) -> Self {
        Self {
            inner: Arc::new(Mutex::new(graph)),
        }
    }

    fn lock(&self) -> GraphResult<MutexGuard<'_, PrototypeGraph>> {
        self.inner.lock().map_err(|_| GraphError::LockPoisoned)
    }

    /// Runs `f` with shared access while holding the lock.
    pub fn with<R>(&self, f: impl FnOnce(&PrototypeGraph) -> R) -> GraphResult<R> {
        let guard = self.lock()?;
        Ok(f(&*guard))
    }

    /// Runs `f` with exclusive access while holding the lock.
    ///
    /// A method that panics inside `f` poisons the lock; later calls then
    /// fail with [`GraphError::LockPoisoned`].
    pub fn with_mut<R>(&self, f: impl FnOnce(&mut PrototypeGraph) -> R) -> GraphResult<R> {
        let mut guard = self.lock()?;
        Ok(f(&mut *guard))
    }

    /// Resolves `name` from `id` and returns an owned copy.
    pub fn get(&self, id: EntityId, name: &str) -> GraphResult<Option<Value>> {
        self.with(|graph| graph.get(id, name).map(|v| v.cloned()))?
    }

    pub fn invoke(&self, id: EntityId, name: &str, args: &[Value]) -> GraphResult<Value> {
        self.with_mut(|graph| graph.invoke(id, name, args))?
    }

    pub fn set_parent(&self, child: EntityId, parent: Option<EntityId>) -> GraphResult<()> {
        self.with_mut(|graph| graph.set_parent(child, parent))?
    }
}
