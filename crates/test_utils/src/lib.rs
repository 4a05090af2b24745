//! Test Utilities Crate
//!
//! Shared test infrastructure for the journal workspace.
//!
//! # Modules
//!
//! - `fixtures`: fixed users, principals, dates and note texts
//! - `builders`: builders for entries, checkoffs and partners
//! - `database`: PostgreSQL testcontainer management
//! - `assertions`: assertion helpers for reports and redaction
//! - `generators`: proptest strategies for journal data

pub mod fixtures;
pub mod builders;
pub mod database;
pub mod assertions;
pub mod generators;

pub use fixtures::*;
pub use builders::*;
pub use database::*;
pub use assertions::*;
pub use generators::*;
