//! Progress annotations: dated notes pinned to the progress timeline

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use core_kernel::text::char_len;
use core_kernel::{AnnotationId, Principal, Role, UserId};
use domain_journal::vocabulary::normalize_position;

use crate::checkoff::skill_slug;
use crate::error::ProgressError;

pub const MAX_BODY_LEN: usize = 1_000;

/// Content of a new annotation
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnnotationDraft {
    pub date: Option<NaiveDate>,
    pub skill: Option<String>,
    pub position: Option<String>,
    pub body: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Annotation {
    pub id: AnnotationId,
    pub athlete_id: UserId,
    pub author_id: UserId,
    pub author_role: Role,
    pub date: NaiveDate,
    /// Skill slug
    pub skill: Option<String>,
    /// Canonical position
    pub position: Option<String>,
    pub body: String,
    pub created_at: DateTime<Utc>,
}

impl Annotation {
    /// `today` is used when the draft carries no date
    pub fn new(
        athlete_id: UserId,
        author: &Principal,
        draft: AnnotationDraft,
        today: NaiveDate,
        now: DateTime<Utc>,
    ) -> Result<Self, ProgressError> {
        let body = draft.body.trim();
        if body.is_empty() {
            return Err(ProgressError::invalid("body", "annotation must not be empty"));
        }
        if char_len(body) > MAX_BODY_LEN {
            return Err(ProgressError::invalid(
                "body",
                format!("must be at most {} characters", MAX_BODY_LEN),
            ));
        }
        Ok(Self {
            id: AnnotationId::new(),
            athlete_id,
            author_id: author.user_id.clone(),
            author_role: author.primary_role(),
            date: draft.date.unwrap_or(today),
            skill: draft.skill.map(|s| skill_slug(&s)).filter(|s| !s.is_empty()),
            position: draft
                .position
                .map(|p| normalize_position(&p))
                .filter(|p| !p.is_empty()),
            body: body.to_string(),
            created_at: now,
        })
    }

    /// Author or admin may delete
    pub fn can_be_deleted_by(&self, principal: &Principal) -> bool {
        principal.is_admin() || principal.user_id == self.author_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 7, 1).unwrap()
    }

    #[test]
    fn test_annotation_normalises_tags() {
        let coach = Principal::new(UserId::new("coach-1").unwrap(), vec![Role::Coach]);
        let draft = AnnotationDraft {
            date: None,
            skill: Some("Knee Cut".into()),
            position: Some("Side Mount".into()),
            body: " passing has clicked ".into(),
        };
        let a = Annotation::new(UserId::new("a1").unwrap(), &coach, draft, today(), Utc::now()).unwrap();
        assert_eq!(a.date, today());
        assert_eq!(a.skill.as_deref(), Some("knee-slice"));
        assert_eq!(a.position.as_deref(), Some("side control"));
        assert_eq!(a.body, "passing has clicked");
        assert_eq!(a.author_role, Role::Coach);
    }

    #[test]
    fn test_delete_rights() {
        let coach = Principal::new(UserId::new("coach-1").unwrap(), vec![Role::Coach]);
        let athlete = Principal::new(UserId::new("a1").unwrap(), vec![Role::Athlete]);
        let admin = Principal::new(UserId::new("root").unwrap(), vec![Role::Admin]);
        let draft = AnnotationDraft { body: "note".into(), ..Default::default() };
        let a = Annotation::new(athlete.user_id.clone(), &coach, draft, today(), Utc::now()).unwrap();
        assert!(a.can_be_deleted_by(&coach));
        assert!(a.can_be_deleted_by(&admin));
        assert!(!a.can_be_deleted_by(&athlete));
    }

    #[test]
    fn test_empty_body_rejected() {
        let athlete = Principal::new(UserId::new("a1").unwrap(), vec![Role::Athlete]);
        let draft = AnnotationDraft { body: "   ".into(), ..Default::default() };
        assert!(Annotation::new(athlete.user_id.clone(), &athlete, draft, today(), Utc::now()).is_err());
    }
}
