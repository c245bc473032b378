use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use async_trait::async_trait;

use super::KeyValueStore;
use crate::error::StoreError;

/// In-process map. Useful for tests and for embedding pre-fetched secrets.
#[derive(Debug, Default)]
pub struct MemoryStore {
    name: String,
    items: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            items: RwLock::default(),
        }
    }

    /// Builder insert. No guard can be live on an owned store, so a poisoned map is
    /// recovered and the poison cleared.
    pub fn with_item(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.items
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.into(), value.into());
        self.items.clear_poison();
        self
    }

    pub fn set_item(&self, key: impl Into<String>, value: impl Into<String>) -> Result<(), StoreError> {
        let mut items = self.items.write().map_err(|_| StoreError::Poisoned)?;
        items.insert(key.into(), value.into());
        Ok(())
    }

    pub fn remove_item(&self, key: &str) -> Result<bool, StoreError> {
        let mut items = self.items.write().map_err(|_| StoreError::Poisoned)?;
        Ok(items.remove(key).is_some())
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    fn name(&self) -> &str {
        &self.name
    }

    async fn get_item(&self, key: &str) -> Result<Option<String>, StoreError> {
        let items = self.items.read().map_err(|_| StoreError::Poisoned)?;
        Ok(items.get(key).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_store() {
        let store = MemoryStore::new("memory").with_item("a", "1");
        assert_eq!(store.get_item("a").await.unwrap().as_deref(), Some("1"));
        assert_eq!(store.get_item("b").await.unwrap(), None);

        store.set_item("b", "2").unwrap();
        assert_eq!(store.get_item("b").await.unwrap().as_deref(), Some("2"));
        assert!(store.remove_item("a").unwrap());
        assert!(!store.remove_item("a").unwrap());
        assert_eq!(store.name(), "memory");
    }

    #[tokio::test]
    async fn test_with_item_recovers_poisoned_map() {
        let store = MemoryStore::new("memory").with_item("a", "1");
        let _ = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let _guard = store.items.write().unwrap();
            panic!("writer died");
        }));
        assert!(matches!(store.set_item("b", "2"), Err(StoreError::Poisoned)));
        assert!(matches!(store.get_item("a").await, Err(StoreError::Poisoned)));

        let store = store.with_item("b", "2");
        assert_eq!(store.get_item("a").await.unwrap().as_deref(), Some("1"));
        assert_eq!(store.get_item("b").await.unwrap().as_deref(), Some("2"));
    }
}
