//! Checkoff evidence and its review

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use core_kernel::text::char_len;
use core_kernel::{CheckoffId, EntryId, EvidenceId, Principal, UserId};

use crate::checkoff::Checkoff;
use crate::error::ProgressError;

pub const MAX_NOTE_LEN: usize = 1_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EvidenceStatus {
    Pending,
    Confirmed,
    Rejected,
}

impl fmt::Display for EvidenceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            EvidenceStatus::Pending => "pending",
            EvidenceStatus::Confirmed => "confirmed",
            EvidenceStatus::Rejected => "rejected",
        })
    }
}

/// How the evidence was produced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EvidenceSource {
    /// Submitted by a person
    Manual,
    /// Proposed from an entry's structured extraction
    Extraction,
}

/// Reviewer decision
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewDecision {
    Confirm,
    Reject,
}

impl ReviewDecision {
    pub fn status(&self) -> EvidenceStatus {
        match self {
            ReviewDecision::Confirm => EvidenceStatus::Confirmed,
            ReviewDecision::Reject => EvidenceStatus::Rejected,
        }
    }
}

impl FromStr for ReviewDecision {
    type Err = ProgressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "confirm" | "confirmed" => Ok(ReviewDecision::Confirm),
            "reject" | "rejected" => Ok(ReviewDecision::Reject),
            other => Err(ProgressError::invalid("decision", format!("unknown decision '{}'", other))),
        }
    }
}

/// One piece of evidence towards a checkoff
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Evidence {
    pub id: EvidenceId,
    pub checkoff_id: CheckoffId,
    pub athlete_id: UserId,
    pub entry_id: Option<EntryId>,
    pub note: String,
    pub source: EvidenceSource,
    pub status: EvidenceStatus,
    pub submitted_by: UserId,
    pub reviewed_by: Option<UserId>,
    pub reviewed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl Evidence {
    /// Manual evidence, pending review
    ///
    /// Evidence needs a note, an entry reference, or both. The caller checks
    /// that a referenced entry exists.
    pub fn submit(
        checkoff: &Checkoff,
        entry_id: Option<EntryId>,
        note: &str,
        submitted_by: &Principal,
        now: DateTime<Utc>,
    ) -> Result<Self, ProgressError> {
        let note = note.trim();
        if char_len(note) > MAX_NOTE_LEN {
            return Err(ProgressError::invalid(
                "note",
                format!("must be at most {} characters", MAX_NOTE_LEN),
            ));
        }
        if note.is_empty() && entry_id.is_none() {
            return Err(ProgressError::invalid("note", "evidence needs a note or an entry"));
        }
        Ok(Self {
            id: EvidenceId::new(),
            checkoff_id: checkoff.id,
            athlete_id: checkoff.athlete_id.clone(),
            entry_id,
            note: note.to_string(),
            source: EvidenceSource::Manual,
            status: EvidenceStatus::Pending,
            submitted_by: submitted_by.user_id.clone(),
            reviewed_by: None,
            reviewed_at: None,
            created_at: now,
        })
    }

    /// Evidence proposed from an entry whose extraction names the skill
    pub fn proposed(checkoff: &Checkoff, entry_id: EntryId, session_date: NaiveDate, now: DateTime<Utc>) -> Self {
        Self {
            id: EvidenceId::new(),
            checkoff_id: checkoff.id,
            athlete_id: checkoff.athlete_id.clone(),
            entry_id: Some(entry_id),
            note: format!("{} noted in session on {}", checkoff.label, session_date),
            source: EvidenceSource::Extraction,
            status: EvidenceStatus::Pending,
            submitted_by: checkoff.athlete_id.clone(),
            reviewed_by: None,
            reviewed_at: None,
            created_at: now,
        }
    }

    /// Applies a reviewer decision
    ///
    /// # Errors
    ///
    /// - `SelfReview` when the reviewer owns the evidence
    /// - `AlreadyReviewed` when the decision matches the current status
    ///
    /// Whether the reviewer coaches the athlete is checked by the caller.
    pub fn review(
        &mut self,
        decision: ReviewDecision,
        reviewer: &Principal,
        now: DateTime<Utc>,
    ) -> Result<(), ProgressError> {
        if reviewer.user_id == self.athlete_id {
            return Err(ProgressError::SelfReview);
        }
        let status = decision.status();
        if status == self.status {
            return Err(ProgressError::AlreadyReviewed(status));
        }
        self.status = status;
        self.reviewed_by = Some(reviewer.user_id.clone());
        self.reviewed_at = Some(now);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_kernel::Role;

    fn principal(id: &str, roles: Vec<Role>) -> Principal {
        Principal::new(UserId::new(id).unwrap(), roles)
    }

    fn checkoff() -> Checkoff {
        Checkoff::new(UserId::new("a1").unwrap(), "kimura", None, 2, Utc::now()).unwrap()
    }

    #[test]
    fn test_submit_requires_note_or_entry() {
        let athlete = principal("a1", vec![Role::Athlete]);
        assert!(Evidence::submit(&checkoff(), None, "  ", &athlete, Utc::now()).is_err());
        assert!(Evidence::submit(&checkoff(), Some(EntryId::new()), "", &athlete, Utc::now()).is_ok());
        let long = "x".repeat(MAX_NOTE_LEN + 1);
        assert!(Evidence::submit(&checkoff(), None, &long, &athlete, Utc::now()).is_err());
    }

    #[test]
    fn test_review_rules() {
        let athlete = principal("a1", vec![Role::Athlete]);
        let coach = principal("coach-1", vec![Role::Coach]);
        let mut e = Evidence::submit(&checkoff(), None, "hit it twice", &athlete, Utc::now()).unwrap();

        assert!(matches!(
            e.review(ReviewDecision::Confirm, &athlete, Utc::now()),
            Err(ProgressError::SelfReview)
        ));

        e.review(ReviewDecision::Confirm, &coach, Utc::now()).unwrap();
        assert_eq!(e.status, EvidenceStatus::Confirmed);
        assert_eq!(e.reviewed_by.as_ref().map(UserId::as_str), Some("coach-1"));

        assert!(matches!(
            e.review(ReviewDecision::Confirm, &coach, Utc::now()),
            Err(ProgressError::AlreadyReviewed(EvidenceStatus::Confirmed))
        ));

        e.review(ReviewDecision::Reject, &coach, Utc::now()).unwrap();
        assert_eq!(e.status, EvidenceStatus::Rejected);
    }

    #[test]
    fn test_proposed_evidence_is_pending_extraction() {
        let c = checkoff();
        let date = NaiveDate::from_ymd_opt(2024, 3, 4).unwrap();
        let e = Evidence::proposed(&c, EntryId::new(), date, Utc::now());
        assert_eq!(e.source, EvidenceSource::Extraction);
        assert_eq!(e.status, EvidenceStatus::Pending);
        assert_eq!(e.note, "kimura noted in session on 2024-03-04");
    }

    #[test]
    fn test_decision_parse() {
        assert_eq!("Confirm".parse::<ReviewDecision>().unwrap(), ReviewDecision::Confirm);
        assert!("maybe".parse::<ReviewDecision>().is_err());
    }
}
