//! Hot-swappable configuration cell.
//!
//! Readers clone a [`snapshot`](ConfigStore::snapshot) per operation, so a
//! SIGHUP reload applies to the next claim, offramp or activity read without
//! disturbing one already running.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::{RwLock, RwLockReadGuard};

/// Shared configuration value with a reload counter.
pub struct ConfigStore<T> {
    inner: Arc<Inner<T>>,
}

struct Inner<T> {
    data: RwLock<T>,
    version: AtomicU64,
}

impl<T> ConfigStore<T> {
    pub fn new(initial: T) -> Self {
        Self {
            inner: Arc::new(Inner {
                data: RwLock::new(initial),
                version: AtomicU64::new(0),
            }),
        }
    }

    /// Replace the stored value.
    pub async fn update(&self, value: T) {
        *self.inner.data.write().await = value;
        self.inner.version.fetch_add(1, Ordering::Relaxed);
    }

    pub async fn read(&self) -> RwLockReadGuard<'_, T> {
        self.inner.data.read().await
    }

    /// Number of updates applied so far.
    pub fn version(&self) -> u64 {
        self.inner.version.load(Ordering::Relaxed)
    }
}

impl<T: Clone> ConfigStore<T> {
    /// Clone the current value out of the lock.
    pub async fn snapshot(&self) -> T {
        self.inner.data.read().await.clone()
    }
}

impl<T> Clone for ConfigStore<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_update_is_visible_to_clones() {
        let store = ConfigStore::new(String::from("before"));
        let handle = store.clone();

        store.update(String::from("after")).await;

        assert_eq!(handle.snapshot().await, "after");
        assert_eq!(*handle.read().await, "after");
        assert_eq!(handle.version(), 1);
    }
}
