//! Key-value store abstraction

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::StoreError;
use crate::item::Item;

/// Single-table item store
///
/// Writes are whole-item overwrites except [`put_if_absent`], which is the
/// only conditional write. Queries return items of one partition whose sort
/// key starts with a prefix, ordered by sort key.
///
/// [`put_if_absent`]: KeyValueStore::put_if_absent
#[async_trait]
pub trait KeyValueStore: Send + Sync + 'static {
    async fn get(&self, pk: &str, sk: &str) -> Result<Option<Item>, StoreError>;

    async fn put(&self, item: Item) -> Result<(), StoreError>;

    /// Fails with `StoreError::AlreadyExists` when (pk, sk) is taken
    async fn put_if_absent(&self, item: Item) -> Result<(), StoreError>;

    /// Returns whether an item was removed
    async fn delete(&self, pk: &str, sk: &str) -> Result<bool, StoreError>;

    async fn query(&self, pk: &str, sk_prefix: &str) -> Result<Vec<Item>, StoreError>;

    /// Cheap round trip used by health checks
    async fn ping(&self) -> Result<(), StoreError>;

    fn backend(&self) -> StoreBackend;
}

/// Which backend holds the items
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StoreBackend {
    #[default]
    Postgres,
    Memory,
}

impl StoreBackend {
    pub fn as_str(&self) -> &'static str {
        match self {
            StoreBackend::Postgres => "postgres",
            StoreBackend::Memory => "memory",
        }
    }
}

impl fmt::Display for StoreBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StoreBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(StoreBackend::Postgres),
            "memory" | "mem" => Ok(StoreBackend::Memory),
            other => Err(format!("unknown store backend '{}'", other)),
        }
    }
}
