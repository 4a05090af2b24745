//! Repositories implementing the domain ports over a [`KeyValueStore`]
//!
//! [`KeyValueStore`]: crate::KeyValueStore

pub mod journal;
pub mod progress;

pub use journal::JournalRepository;
pub use progress::ProgressRepository;

use chrono::Utc;
use serde::de::DeserializeOwned;
use std::time::Instant;

use core_kernel::{AdapterHealth, HealthCheckResult, PortError};

use crate::item::Item;
use crate::store::KeyValueStore;

/// Decodes every item of a query result
fn decode_all<T: DeserializeOwned>(items: Vec<Item>) -> Result<Vec<T>, PortError> {
    items
        .iter()
        .map(|item| item.decode::<T>().map_err(PortError::from))
        .collect()
}

/// Decodes a single item, mapping an absent item to `PortError::NotFound`
fn decode_one<T: DeserializeOwned>(
    item: Option<Item>,
    entity_type: &str,
    id: impl std::fmt::Display,
) -> Result<T, PortError> {
    match item {
        Some(item) => Ok(item.decode()?),
        None => Err(PortError::not_found(entity_type, id)),
    }
}

async fn check_store(store: &dyn KeyValueStore, adapter: &str) -> HealthCheckResult {
    let start = Instant::now();
    let result = store.ping().await;
    let latency_ms = start.elapsed().as_millis() as u64;
    let adapter_id = format!("{}-{}", adapter, store.backend());

    match result {
        Ok(()) => HealthCheckResult {
            adapter_id,
            status: AdapterHealth::Healthy,
            latency_ms,
            message: None,
            checked_at: Utc::now(),
        },
        Err(e) => HealthCheckResult {
            adapter_id,
            status: AdapterHealth::Unhealthy,
            latency_ms,
            message: Some(format!("Store error: {}", e)),
            checked_at: Utc::now(),
        },
    }
}
