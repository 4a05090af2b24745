//! Storage Infrastructure Layer
//!
//! This crate stores every journal record as one item in a single table
//! keyed by partition key (`pk`) and sort key (`sk`). Two backends implement
//! the [`KeyValueStore`] trait:
//!
//! - [`PostgresStore`]: a `journal_items` table on PostgreSQL via SQLx
//! - [`MemoryStore`]: an ordered in-process map for tests and local runs
//!
//! The repositories in [`repositories`] implement the domain ports on top of
//! either backend.
//!
//! # Example
//!
//! ```rust,ignore
//! use infra_store::{create_pool, DatabaseConfig, PostgresStore, JournalRepository};
//! use std::sync::Arc;
//!
//! let pool = create_pool(DatabaseConfig::new("postgres://localhost/journal")).await?;
//! let store = Arc::new(PostgresStore::new(pool));
//! store.migrate().await?;
//! let journal = JournalRepository::new(store);
//! ```

pub mod pool;
pub mod error;
pub mod keys;
pub mod item;
pub mod store;
pub mod memory;
pub mod postgres;
pub mod repositories;

pub use pool::{DatabasePool, create_pool, DatabaseConfig};
pub use error::StoreError;
pub use item::Item;
pub use store::{KeyValueStore, StoreBackend};
pub use memory::MemoryStore;
pub use postgres::PostgresStore;
pub use repositories::{JournalRepository, ProgressRepository};
