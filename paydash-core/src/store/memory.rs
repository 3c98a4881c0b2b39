use super::{KeyValueStore, StoreError};
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

/// Process-local store. Contents are lost on restart.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<(String, String), String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, namespace: &str, key: &str) -> Result<Option<String>, StoreError> {
        let entries = self.entries.read().await;
        Ok(entries
            .get(&(namespace.to_owned(), key.to_owned()))
            .cloned())
    }

    async fn put(&self, namespace: &str, key: &str, value: &str) -> Result<(), StoreError> {
        self.entries
            .write()
            .await
            .insert((namespace.to_owned(), key.to_owned()), value.to_owned());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{CARD_LAST4, DISPLAY, USER_IDS};

    #[tokio::test]
    async fn test_namespaces_are_isolated() {
        let store = MemoryStore::new();
        store.put(USER_IDS, "0xabc", "user-1").await.unwrap();

        assert_eq!(
            store.get(USER_IDS, "0xabc").await.unwrap().as_deref(),
            Some("user-1")
        );
        assert_eq!(store.get(DISPLAY, "0xabc").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_put_overwrites() {
        let store = MemoryStore::new();
        store.put(DISPLAY, CARD_LAST4, "1111").await.unwrap();
        store.put(DISPLAY, CARD_LAST4, "4242").await.unwrap();

        assert_eq!(
            store.get(DISPLAY, CARD_LAST4).await.unwrap().as_deref(),
            Some("4242")
        );
    }
}
