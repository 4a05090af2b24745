//! Entry queries and saved searches

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use core_kernel::temporal::{check_range, in_range};
use core_kernel::text::{char_len, collapse_whitespace, slugify};
use core_kernel::{SavedSearchId, UserId};

use crate::entry::{normalize_tags, Entry, SessionType};
use crate::error::JournalError;
use crate::vocabulary::normalize_position;

pub const DEFAULT_LIMIT: usize = 50;
pub const MAX_SEARCH_NAME_LEN: usize = 60;
pub const MAX_QUERY_TEXT_LEN: usize = 200;

/// Filter over an athlete's entries
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EntryQuery {
    #[serde(default)]
    pub text: Option<String>,
    /// Every tag must be present
    #[serde(default)]
    pub tags: Vec<String>,
    /// Any position may match
    #[serde(default)]
    pub positions: Vec<String>,
    #[serde(default)]
    pub session_type: Option<SessionType>,
    #[serde(default)]
    pub from: Option<NaiveDate>,
    #[serde(default)]
    pub to: Option<NaiveDate>,
    #[serde(default)]
    pub limit: Option<usize>,
}

impl EntryQuery {
    /// Validates the query and canonicalises its terms
    pub fn normalize(mut self) -> Result<EntryQuery, JournalError> {
        check_range(self.from, self.to).map_err(|e| JournalError::invalid("from", e.to_string()))?;
        self.text = self
            .text
            .map(|t| collapse_whitespace(&t.to_lowercase()))
            .filter(|t| !t.is_empty());
        if self.text.as_deref().map_or(0, char_len) > MAX_QUERY_TEXT_LEN {
            return Err(JournalError::invalid(
                "text",
                format!("must be at most {} characters", MAX_QUERY_TEXT_LEN),
            ));
        }
        self.tags = normalize_tags(&self.tags)?;
        let mut positions: Vec<String> = Vec::new();
        for position in self.positions.iter().map(|p| normalize_position(p)) {
            if !position.is_empty() && !positions.contains(&position) {
                positions.push(position);
            }
        }
        self.positions = positions;
        if self.limit == Some(0) {
            return Err(JournalError::invalid("limit", "must be at least 1"));
        }
        Ok(self)
    }

    /// Whether the entry satisfies the query
    ///
    /// Private notes are searched only when `include_private` is set.
    pub fn matches(&self, entry: &Entry, include_private: bool) -> bool {
        if !in_range(entry.session_date, self.from, self.to) {
            return false;
        }
        if self.session_type.is_some_and(|t| t != entry.session_type) {
            return false;
        }
        if !self.tags.iter().all(|t| entry.tags.contains(t)) {
            return false;
        }
        if !self.positions.is_empty() {
            let positions = entry.positions();
            if !self.positions.iter().any(|p| positions.contains(p)) {
                return false;
            }
        }
        if let Some(text) = &self.text {
            let in_shared = entry.shared_notes.to_lowercase().contains(text.as_str());
            let in_private = include_private
                && entry
                    .private_notes
                    .as_deref()
                    .is_some_and(|n| n.to_lowercase().contains(text.as_str()));
            if !in_shared && !in_private {
                return false;
            }
        }
        true
    }

    /// Matching entries, newest session first, capped at the effective limit
    pub fn run<'a>(
        &self,
        entries: impl IntoIterator<Item = &'a Entry>,
        include_private: bool,
        max_page_size: usize,
    ) -> Vec<Entry> {
        let limit = self.limit.unwrap_or(DEFAULT_LIMIT).min(max_page_size.max(1));
        let mut results: Vec<Entry> = entries
            .into_iter()
            .filter(|e| self.matches(e, include_private))
            .cloned()
            .collect();
        results.sort_by(|a, b| {
            b.session_date
                .cmp(&a.session_date)
                .then(b.created_at.cmp(&a.created_at))
        });
        results.truncate(limit);
        results
    }
}

/// A named query an athlete can re-run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedSearch {
    pub id: SavedSearchId,
    pub athlete_id: UserId,
    pub name: String,
    pub query: EntryQuery,
    pub created_at: DateTime<Utc>,
}

impl SavedSearch {
    pub fn new(
        athlete_id: UserId,
        name: &str,
        query: EntryQuery,
        now: DateTime<Utc>,
    ) -> Result<Self, JournalError> {
        let name = collapse_whitespace(name);
        if name.is_empty() || name_key(&name).is_empty() {
            return Err(JournalError::invalid("name", "must not be empty"));
        }
        if char_len(&name) > MAX_SEARCH_NAME_LEN {
            return Err(JournalError::invalid(
                "name",
                format!("must be at most {} characters", MAX_SEARCH_NAME_LEN),
            ));
        }
        Ok(Self {
            id: SavedSearchId::new(),
            athlete_id,
            name,
            query: query.normalize()?,
            created_at: now,
        })
    }

    /// Case-insensitive uniqueness key of the name
    pub fn name_key(&self) -> String {
        name_key(&self.name)
    }
}

/// Uniqueness key for a saved-search name
pub fn name_key(name: &str) -> String {
    slugify(name)
}
