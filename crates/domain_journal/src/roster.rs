//! Coach roster: which coaches may read an athlete's journal

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use core_kernel::UserId;

use crate::error::JournalError;

/// Grants a coach read, comment and review access to an athlete
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoachLink {
    pub athlete_id: UserId,
    pub coach_id: UserId,
    pub created_at: DateTime<Utc>,
}

impl CoachLink {
    pub fn new(athlete_id: UserId, coach_id: UserId, now: DateTime<Utc>) -> Result<Self, JournalError> {
        if athlete_id == coach_id {
            return Err(JournalError::SelfCoaching);
        }
        Ok(Self {
            athlete_id,
            coach_id,
            created_at: now,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_self_coaching_rejected() {
        let id = UserId::new("a1").unwrap();
        let err = CoachLink::new(id.clone(), id, Utc::now()).unwrap_err();
        assert!(err.is_validation());
    }
}
