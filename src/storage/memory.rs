//! In-process [`KeyValueStore`] backed by a `BTreeMap`.

use std::collections::BTreeMap;
use std::sync::{PoisonError, RwLock};

use super::KeyValueStore;
use crate::error::{LedgerError, LedgerResult};

/// Thread-safe ordered map guarded by a [`std::sync::RwLock`].
///
/// Iteration follows `BTreeMap` key order. A poisoned lock is reported as
/// [`LedgerError::StorageError`] rather than propagated as a panic.
#[derive(Debug)]
pub struct MemoryStore<V> {
    name: &'static str,
    entries: RwLock<BTreeMap<String, V>>,
}

impl<V> MemoryStore<V> {
    /// Creates an empty store. `name` labels storage errors.
    #[must_use]
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            entries: RwLock::new(BTreeMap::new()),
        }
    }

    fn poisoned<T>(&self, _: PoisonError<T>) -> LedgerError {
        LedgerError::StorageError(format!("{} store lock poisoned", self.name))
    }
}

impl<V> KeyValueStore<V> for MemoryStore<V>
where
    V: Clone + std::fmt::Debug + Send + Sync,
{
    fn get(&self, key: &str) -> LedgerResult<Option<V>> {
        let map = self.entries.read().map_err(|e| self.poisoned(e))?;
        Ok(map.get(key).cloned())
    }

    fn insert(&self, key: &str, value: V) -> LedgerResult<Option<V>> {
        let mut map = self.entries.write().map_err(|e| self.poisoned(e))?;
        Ok(map.insert(key.to_string(), value))
    }

    fn remove(&self, key: &str) -> LedgerResult<Option<V>> {
        let mut map = self.entries.write().map_err(|e| self.poisoned(e))?;
        Ok(map.remove(key))
    }

    fn values(&self) -> LedgerResult<Vec<V>> {
        let map = self.entries.read().map_err(|e| self.poisoned(e))?;
        Ok(map.values().cloned().collect())
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use tokio_test::assert_ok;

    use super::*;

    #[test]
    fn insert_get_and_overwrite() {
        let store = MemoryStore::new("test");
        assert_eq!(assert_ok!(store.insert("k", 1u64)), None);
        assert_eq!(assert_ok!(store.get("k")), Some(1));
        assert_eq!(assert_ok!(store.insert("k", 2)), Some(1));
        assert_eq!(assert_ok!(store.get("k")), Some(2));
    }

    #[test]
    fn missing_key_is_none() {
        let store: MemoryStore<u64> = MemoryStore::new("test");
        assert_eq!(assert_ok!(store.get("nope")), None);
        assert_eq!(assert_ok!(store.remove("nope")), None);
    }

    #[test]
    fn values_are_in_key_order() {
        let store = MemoryStore::new("test");
        for (k, v) in [("b", 2u64), ("c", 3), ("a", 1)] {
            let _ = store.insert(k, v);
        }
        assert_eq!(assert_ok!(store.values()), vec![1, 2, 3]);

        let _ = store.remove("b");
        assert_eq!(assert_ok!(store.values()), vec![1, 3]);
    }

    #[test]
    fn poisoned_lock_surfaces_storage_error() {
        let store = std::sync::Arc::new(MemoryStore::<u64>::new("poison"));
        let clone = std::sync::Arc::clone(&store);
        let _ = std::thread::spawn(move || {
            let _guard = clone.entries.write();
            panic!("poison the lock");
        })
        .join();

        let Err(LedgerError::StorageError(msg)) = store.get("k") else {
            panic!("expected storage error");
        };
        assert!(msg.contains("poison"));
    }
}
