use std::sync::{Arc, RwLock};

/// Holds the current version of a derived aggregate.
///
/// A rebuild constructs the new value off to the side and swaps it in under a
/// single write lock. Readers get an `Arc` to a complete value and keep it
/// even if a rebuild lands while they are still using it.
#[derive(Debug)]
pub struct SnapshotCell<T> {
    current: RwLock<Arc<T>>,
}

impl<T> SnapshotCell<T> {
    pub fn new(value: T) -> Self {
        Self {
            current: RwLock::new(Arc::new(value)),
        }
    }

    pub fn load(&self) -> Arc<T> {
        match self.current.read() {
            Ok(guard) => Arc::clone(&guard),
            // The lock only ever guards a whole Arc, so a poisoned value is still complete
            Err(poisoned) => Arc::clone(&poisoned.into_inner()),
        }
    }

    /// Swap in a new value, returning the previous one
    pub fn replace(&self, value: T) -> Arc<T> {
        let next = Arc::new(value);
        match self.current.write() {
            Ok(mut guard) => std::mem::replace(&mut *guard, next),
            Err(poisoned) => std::mem::replace(&mut *poisoned.into_inner(), next),
        }
    }
}

impl<T: Default> Default for SnapshotCell<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}
