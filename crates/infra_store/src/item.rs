//! Stored items

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::StoreError;

/// One record in the single-table store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub pk: String,
    pub sk: String,
    /// Record kind, see [`crate::keys::entity`]
    pub entity: String,
    /// JSON document of the record
    pub data: serde_json::Value,
    pub updated_at: DateTime<Utc>,
}

impl Item {
    /// Encodes a record as an item stamped with the current time
    pub fn encode<T: Serialize>(
        pk: impl Into<String>,
        sk: impl Into<String>,
        entity: &str,
        record: &T,
    ) -> Result<Self, StoreError> {
        Ok(Self {
            pk: pk.into(),
            sk: sk.into(),
            entity: entity.to_string(),
            data: serde_json::to_value(record)?,
            updated_at: Utc::now(),
        })
    }

    pub fn decode<T: DeserializeOwned>(&self) -> Result<T, StoreError> {
        Ok(serde_json::from_value(self.data.clone())?)
    }
}
