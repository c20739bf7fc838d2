use std::sync::Arc;

use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use stratum_skiplist::{error::Result, level::GeometricLevel, skip_list::SkipList};

/// A skip list behind a reader-writer lock, cheap to clone across threads.
///
/// Lookups share the lock, inserts and removals take it exclusively, so every
/// operation sees the list between two whole operations.
pub struct SharedSkipList<K, V> {
    inner: Arc<RwLock<SkipList<K, V, GeometricLevel>>>,
}

impl<K, V> Clone for SharedSkipList<K, V> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<K, V> From<SkipList<K, V>> for SharedSkipList<K, V> {
    fn from(list: SkipList<K, V>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(list)),
        }
    }
}

impl<K, V> SharedSkipList<K, V> {
    pub fn new(max_level: usize) -> Result<Self> {
        Ok(SkipList::new(max_level)?.into())
    }

    pub fn len(&self) -> usize {
        self.inner.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().is_empty()
    }

    pub fn level(&self) -> usize {
        self.inner.read().level()
    }

    pub fn read(&self) -> RwLockReadGuard<'_, SkipList<K, V>> {
        self.inner.read()
    }

    pub fn write(&self) -> RwLockWriteGuard<'_, SkipList<K, V>> {
        self.inner.write()
    }
}

impl<K, V> SharedSkipList<K, V>
where
    K: Ord,
{
    pub fn insert(&self, key: K, value: V) -> Option<V> {
        self.inner.write().insert(key, value)
    }

    pub fn remove(&self, key: &K) -> Option<V> {
        self.inner.write().remove(key)
    }

    pub fn contains_key(&self, key: &K) -> bool {
        self.inner.read().contains_key(key)
    }
}

impl<K, V> SharedSkipList<K, V>
where
    K: Ord,
    V: Clone,
{
    pub fn get(&self, key: &K) -> Option<V> {
        self.inner.read().get(key).cloned()
    }
}

#[cfg(test)]
mod tests {
    use std::thread;

    use itertools::Itertools;

    use super::SharedSkipList;
    use crate::{options::SkipListOptions, test_utils::init_tracing};

    #[test]
    fn test_shared_basic() -> anyhow::Result<()> {
        init_tracing();

        let list = SharedSkipList::new(8)?;
        assert!(list.is_empty());
        assert_eq!(list.insert(1, "one".to_string()), None);
        assert_eq!(list.insert(1, "ONE".to_string()), Some("one".to_string()));
        assert_eq!(list.get(&1), Some("ONE".to_string()));
        assert!(list.contains_key(&1));
        assert_eq!(list.remove(&1), Some("ONE".to_string()));
        assert_eq!(list.remove(&1), None);
        assert_eq!(list.level(), 0);
        Ok(())
    }

    #[test]
    fn test_shared_concurrent() -> anyhow::Result<()> {
        const TEST_COUNT: usize = 2_000;
        const THREADS: usize = 4;

        init_tracing();

        let list: SharedSkipList<usize, usize> =
            SkipListOptions::new()
                .max_level(16)
                .seed(5)
                .build::<usize, usize>()?
                .into();

        thread::scope(|s| {
            for i in 0..THREADS {
                let list = list.clone();
                s.spawn(move || {
                    let offset = i * TEST_COUNT;
                    for j in offset..offset + TEST_COUNT {
                        list.insert(j, j * 2);
                    }
                    for j in offset..offset + TEST_COUNT {
                        assert_eq!(list.get(&j), Some(j * 2));
                    }
                    for j in (offset..offset + TEST_COUNT).step_by(2) {
                        assert_eq!(list.remove(&j), Some(j * 2));
                    }
                });
            }
        });

        assert_eq!(list.len(), THREADS * TEST_COUNT / 2);
        let keys = list.read().iter().map(|(k, _)| *k).collect_vec();
        let expected = (0..THREADS * TEST_COUNT).filter(|k| k % 2 == 1).collect_vec();
        assert_eq!(keys, expected);
        Ok(())
    }
}
