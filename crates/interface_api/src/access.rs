//! Access control
//!
//! Every athlete-scoped route is checked against the caller's relation to
//! the athlete: the athlete themself, a linked coach, or an admin.

use core_kernel::{Principal, Role, UserId};
use domain_journal::JournalPort;

use crate::error::ApiError;

/// How the caller relates to the athlete whose data is addressed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Relation {
    Owner,
    Admin,
    Coach,
}

impl Relation {
    /// Only the owner sees private notes
    pub fn sees_private(&self) -> bool {
        matches!(self, Relation::Owner)
    }
}

/// Owner, admin or linked coach; anyone else is forbidden
pub async fn require_reader(
    journal: &dyn JournalPort,
    principal: &Principal,
    athlete: &UserId,
) -> Result<Relation, ApiError> {
    if principal.user_id == *athlete {
        return Ok(Relation::Owner);
    }
    if principal.is_admin() {
        return Ok(Relation::Admin);
    }
    if principal.has_role(Role::Coach) && journal.is_coach_of(&principal.user_id, athlete).await? {
        return Ok(Relation::Coach);
    }
    Err(ApiError::forbidden(format!(
        "{} has no access to athlete {}",
        principal.user_id, athlete
    )))
}

/// Owner or admin
pub fn require_steward(principal: &Principal, athlete: &UserId) -> Result<Relation, ApiError> {
    if principal.user_id == *athlete {
        Ok(Relation::Owner)
    } else if principal.is_admin() {
        Ok(Relation::Admin)
    } else {
        Err(ApiError::forbidden(format!(
            "only athlete {} or an admin may do this",
            athlete
        )))
    }
}

/// Linked coach or admin, never the athlete themself
pub async fn require_reviewer(
    journal: &dyn JournalPort,
    principal: &Principal,
    athlete: &UserId,
) -> Result<Relation, ApiError> {
    match require_reader(journal, principal, athlete).await? {
        Relation::Owner => Err(ApiError::forbidden("athletes cannot review their own evidence")),
        relation => Ok(relation),
    }
}

/// Callers holding the coach role
pub fn require_coach(principal: &Principal) -> Result<(), ApiError> {
    if principal.has_role(Role::Coach) || principal.is_admin() {
        Ok(())
    } else {
        Err(ApiError::forbidden("coach role required"))
    }
}
