//! Core Kernel - Foundational types and utilities for the training journal
//!
//! This crate provides the building blocks used across all domain modules:
//! - Strongly-typed identifiers and the principal/role model
//! - Calendar helpers (athlete-local "today", trend buckets)
//! - Text normalisation shared by tags, skills and positions
//! - Port abstractions shared by every storage adapter

pub mod identifiers;
pub mod principal;
pub mod temporal;
pub mod text;
pub mod ports;
pub mod error;

pub use identifiers::{
    EntryId, CommentId, PartnerId, SavedSearchId,
    CheckoffId, EvidenceId, AnnotationId, UserId,
};
pub use principal::{Principal, Role};
pub use temporal::{Timezone, Granularity, TemporalError};
pub use ports::{
    PortError, DomainPort, HealthCheckable, HealthCheckResult,
    AdapterHealth,
};
pub use error::CoreError;
