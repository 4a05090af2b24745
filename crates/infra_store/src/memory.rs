//! In-memory backend

use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::error::StoreError;
use crate::item::Item;
use crate::store::{KeyValueStore, StoreBackend};

type Key = (String, String);

/// Ordered map keyed by (pk, sk)
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    items: Arc<RwLock<BTreeMap<Key, Item>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.items.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.items.read().await.is_empty()
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, pk: &str, sk: &str) -> Result<Option<Item>, StoreError> {
        let items = self.items.read().await;
        Ok(items.get(&(pk.to_string(), sk.to_string())).cloned())
    }

    async fn put(&self, item: Item) -> Result<(), StoreError> {
        let key = (item.pk.clone(), item.sk.clone());
        self.items.write().await.insert(key, item);
        Ok(())
    }

    async fn put_if_absent(&self, item: Item) -> Result<(), StoreError> {
        let mut items = self.items.write().await;
        let key = (item.pk.clone(), item.sk.clone());
        if items.contains_key(&key) {
            return Err(StoreError::AlreadyExists { pk: key.0, sk: key.1 });
        }
        items.insert(key, item);
        Ok(())
    }

    async fn delete(&self, pk: &str, sk: &str) -> Result<bool, StoreError> {
        let mut items = self.items.write().await;
        Ok(items.remove(&(pk.to_string(), sk.to_string())).is_some())
    }

    async fn query(&self, pk: &str, sk_prefix: &str) -> Result<Vec<Item>, StoreError> {
        let items = self.items.read().await;
        let start = (pk.to_string(), sk_prefix.to_string());
        Ok(items
            .range(start..)
            .take_while(|((p, s), _)| p == pk && s.starts_with(sk_prefix))
            .map(|(_, item)| item.clone())
            .collect())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }

    fn backend(&self) -> StoreBackend {
        StoreBackend::Memory
    }
}
