//! Coach and athlete comments on entries

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use core_kernel::text::char_len;
use core_kernel::{CommentId, EntryId, Principal, Role, UserId};

use crate::error::JournalError;

pub const MAX_COMMENT_LEN: usize = 2_000;

/// A comment on a journal entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    pub id: CommentId,
    pub athlete_id: UserId,
    pub entry_id: EntryId,
    pub author_id: UserId,
    pub author_role: Role,
    pub body: String,
    pub created_at: DateTime<Utc>,
}

impl Comment {
    pub fn new(
        athlete_id: UserId,
        entry_id: EntryId,
        author: &Principal,
        body: &str,
        now: DateTime<Utc>,
    ) -> Result<Self, JournalError> {
        let body = body.trim();
        if body.is_empty() {
            return Err(JournalError::invalid("body", "comment must not be empty"));
        }
        if char_len(body) > MAX_COMMENT_LEN {
            return Err(JournalError::invalid(
                "body",
                format!("must be at most {} characters", MAX_COMMENT_LEN),
            ));
        }
        Ok(Self {
            id: CommentId::new(),
            athlete_id,
            entry_id,
            author_id: author.user_id.clone(),
            author_role: author.primary_role(),
            body: body.to_string(),
            created_at: now,
        })
    }

    /// Author, entry owner or admin may delete
    pub fn can_be_deleted_by(&self, principal: &Principal) -> bool {
        principal.is_admin()
            || principal.user_id == self.author_id
            || principal.user_id == self.athlete_id
    }
}
