//! Saved-search DTOs

use serde::{Deserialize, Serialize};
use validator::Validate;

use domain_journal::{Entry, EntryQuery, SavedSearch};

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SavedSearchRequest {
    #[validate(length(min = 1, max = 60))]
    pub name: String,
    #[serde(default)]
    pub query: EntryQuery,
}

#[derive(Debug, Clone, Serialize)]
pub struct SearchResultsResponse {
    pub search: SavedSearch,
    pub entries: Vec<Entry>,
}
