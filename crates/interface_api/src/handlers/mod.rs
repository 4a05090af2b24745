//! Request handlers
//!
//! Handlers parse path parameters, check the caller's access and delegate
//! to the services in [`crate::services`].

pub mod health;
pub mod me;
pub mod entries;
pub mod partners;
pub mod searches;
pub mod progress;

use std::fmt::Display;
use std::str::FromStr;

use core_kernel::UserId;

use crate::error::ApiError;

/// Parses an athlete or coach path segment
pub(crate) fn user_id(raw: &str) -> Result<UserId, ApiError> {
    Ok(UserId::new(raw)?)
}

/// Parses a record id path segment, with or without its display prefix
pub(crate) fn record_id<T>(raw: &str, kind: &str) -> Result<T, ApiError>
where
    T: FromStr,
    T::Err: Display,
{
    raw.parse()
        .map_err(|e| ApiError::invalid(format!("invalid {} id '{}': {}", kind, raw, e)))
}
