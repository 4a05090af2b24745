//! Store error types

use thiserror::Error;

use core_kernel::PortError;

/// Errors raised by a [`KeyValueStore`](crate::KeyValueStore) backend
#[derive(Debug, Error)]
pub enum StoreError {
    /// A conditional put found an existing item
    #[error("Item already exists: {pk} / {sk}")]
    AlreadyExists { pk: String, sk: String },

    #[error("Failed to connect to store: {0}")]
    ConnectionFailed(String),

    #[error("Query failed: {0}")]
    QueryFailed(String),

    #[error("Migration failed: {0}")]
    MigrationFailed(String),

    /// Item data could not be encoded or decoded
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Connection pool exhausted")]
    PoolExhausted,
}

impl StoreError {
    pub fn is_already_exists(&self) -> bool {
        matches!(self, StoreError::AlreadyExists { .. })
    }
}

/// Maps SQLx errors by PostgreSQL error class
///
/// <https://www.postgresql.org/docs/current/errcodes-appendix.html>
impl From<sqlx::Error> for StoreError {
    fn from(error: sqlx::Error) -> Self {
        match &error {
            sqlx::Error::PoolTimedOut => StoreError::PoolExhausted,
            sqlx::Error::Io(e) => StoreError::ConnectionFailed(e.to_string()),
            sqlx::Error::Database(db_err) => match db_err.code().as_deref() {
                Some(code) if code.starts_with("08") => {
                    StoreError::ConnectionFailed(db_err.message().to_string())
                }
                _ => StoreError::QueryFailed(db_err.message().to_string()),
            },
            _ => StoreError::QueryFailed(error.to_string()),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for StoreError {
    fn from(error: sqlx::migrate::MigrateError) -> Self {
        StoreError::MigrationFailed(error.to_string())
    }
}

impl From<StoreError> for PortError {
    fn from(error: StoreError) -> Self {
        match error {
            StoreError::AlreadyExists { pk, sk } => {
                PortError::conflict(format!("item {} / {} already exists", pk, sk))
            }
            StoreError::ConnectionFailed(_) | StoreError::PoolExhausted => PortError::Connection {
                message: error.to_string(),
                source: Some(Box::new(error)),
            },
            StoreError::Serialization(e) => PortError::transformation(e.to_string()),
            other => PortError::Internal {
                message: other.to_string(),
                source: Some(Box::new(other)),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_port_error_mapping() {
        let conflict: PortError = StoreError::AlreadyExists { pk: "ATHLETE#a".into(), sk: "COACH#c".into() }.into();
        assert!(conflict.is_conflict());

        let conn: PortError = StoreError::PoolExhausted.into();
        assert!(matches!(conn, PortError::Connection { .. }));

        let bad_json = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let transform: PortError = StoreError::from(bad_json).into();
        assert!(matches!(transform, PortError::Transformation { .. }));
    }
}
