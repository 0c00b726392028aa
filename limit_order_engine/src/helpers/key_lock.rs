use std::{collections::HashMap, fmt::Debug, hash::Hash, sync::Arc};

use tokio::sync::{Mutex, OwnedMutexGuard};

/// A set of async locks, one per key.
///
/// Tasks that lock the same key run one after the other. Tasks with different keys don't block each other beyond a
/// brief look-up in the shared map. Locks are created on demand and dropped once nobody holds or waits on them.
pub struct KeyedLock<K> {
    locks: Mutex<HashMap<K, Arc<Mutex<()>>>>,
}

/// Holds the lock for a key until dropped.
#[must_use = "the key is unlocked as soon as the guard is dropped"]
pub struct KeyedLockGuard {
    _guard: OwnedMutexGuard<()>,
}

impl<K> Default for KeyedLock<K> {
    fn default() -> Self {
        Self { locks: Mutex::new(HashMap::new()) }
    }
}

impl<K> Debug for KeyedLock<K> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "KeyedLock")
    }
}

impl<K: Eq + Hash + Clone> KeyedLock<K> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Waits until `key` is free and locks it.
    pub async fn lock(&self, key: &K) -> KeyedLockGuard {
        let lock = {
            let mut locks = self.locks.lock().await;
            // An entry referenced only by the map has no holders and no waiters.
            locks.retain(|_, lock| Arc::strong_count(lock) > 1);
            locks.entry(key.clone()).or_default().clone()
        };
        KeyedLockGuard { _guard: lock.lock_owned().await }
    }

    /// The number of keys that are currently tracked.
    pub async fn tracked_keys(&self) -> usize {
        self.locks.lock().await.len()
    }
}

#[cfg(test)]
mod test {
    use std::{
        sync::atomic::{AtomicUsize, Ordering},
        time::Duration,
    };

    use super::*;

    #[tokio::test]
    async fn same_key_is_serialized() {
        let lock = Arc::new(KeyedLock::<u64>::new());
        let active = Arc::new(AtomicUsize::new(0));
        let max_active = Arc::new(AtomicUsize::new(0));
        let mut handles = Vec::new();
        for _ in 0..8 {
            let lock = Arc::clone(&lock);
            let active = Arc::clone(&active);
            let max_active = Arc::clone(&max_active);
            handles.push(tokio::spawn(async move {
                let _guard = lock.lock(&1).await;
                let now = active.fetch_add(1, Ordering::SeqCst) + 1;
                max_active.fetch_max(now, Ordering::SeqCst);
                tokio::time::sleep(Duration::from_millis(5)).await;
                active.fetch_sub(1, Ordering::SeqCst);
            }));
        }
        for h in handles {
            h.await.unwrap();
        }
        assert_eq!(max_active.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn different_keys_do_not_block() {
        let lock = KeyedLock::<&str>::new();
        let _a = lock.lock(&"a").await;
        let b = tokio::time::timeout(Duration::from_millis(100), lock.lock(&"b")).await;
        assert!(b.is_ok());
        let a_again = tokio::time::timeout(Duration::from_millis(20), lock.lock(&"a")).await;
        assert!(a_again.is_err());
    }

    #[tokio::test]
    async fn unused_keys_are_dropped() {
        let lock = KeyedLock::<u64>::new();
        {
            let _one = lock.lock(&1).await;
            let _two = lock.lock(&2).await;
            assert_eq!(lock.tracked_keys().await, 2);
        }
        let _three = lock.lock(&3).await;
        assert_eq!(lock.tracked_keys().await, 1);
    }
}
