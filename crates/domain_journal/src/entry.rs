//! Journal entry aggregate

use chrono::{DateTime, Days, Months, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use core_kernel::text::{char_len, collapse_whitespace, slugify};
use core_kernel::{EntryId, PartnerId, UserId};

use crate::action_pack::ActionPack;
use crate::error::JournalError;
use crate::extraction::{ExtractedOutcome, StructuredExtraction};
use crate::vocabulary::{canonical_technique, normalize_position};

pub const MAX_NOTES_LEN: usize = 10_000;
pub const MAX_TAGS: usize = 20;
pub const MAX_TAG_LEN: usize = 40;
pub const MAX_ROUNDS_LOGGED: usize = 50;
pub const MAX_POSITION_LEN: usize = 60;
/// Sessions may be back-dated at most this many years
pub const MAX_SESSION_AGE_YEARS: u32 = 50;

/// Kind of training session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionType {
    #[default]
    Gi,
    Nogi,
    OpenMat,
    Drilling,
    Competition,
    Private,
}

impl SessionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionType::Gi => "gi",
            SessionType::Nogi => "nogi",
            SessionType::OpenMat => "open_mat",
            SessionType::Drilling => "drilling",
            SessionType::Competition => "competition",
            SessionType::Private => "private",
        }
    }
}

impl fmt::Display for SessionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SessionType {
    type Err = JournalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match slugify(s).as_str() {
            "gi" => Ok(SessionType::Gi),
            "nogi" | "no-gi" => Ok(SessionType::Nogi),
            "open-mat" | "openmat" => Ok(SessionType::OpenMat),
            "drilling" => Ok(SessionType::Drilling),
            "competition" => Ok(SessionType::Competition),
            "private" => Ok(SessionType::Private),
            _ => Err(JournalError::invalid("session_type", format!("unknown session type '{}'", s))),
        }
    }
}

/// Result of a round or exchange from the athlete's point of view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Win,
    Loss,
    Draw,
}

/// One logged sparring round
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundLog {
    pub partner_id: Option<PartnerId>,
    /// Where the round was decided
    pub position: String,
    pub outcome: Outcome,
    pub submission: Option<String>,
}

/// Session metrics entered by the athlete
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionMetrics {
    pub duration_minutes: Option<u32>,
    /// Perceived intensity, 1 (easy flow) to 10 (competition pace)
    pub intensity: Option<u8>,
    /// Number of rounds rolled, logged or not
    pub rounds: Option<u32>,
}

/// Editable content of an entry, as submitted by the athlete
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EntryDraft {
    pub session_date: Option<NaiveDate>,
    pub session_type: SessionType,
    pub shared_notes: String,
    pub private_notes: Option<String>,
    pub metrics: SessionMetrics,
    pub tags: Vec<String>,
    pub rounds: Vec<RoundLog>,
}

impl EntryDraft {
    /// Validates and normalises the draft
    ///
    /// Notes are trimmed, tags are lower-cased and de-duplicated, round
    /// positions are mapped onto the canonical vocabulary and the session
    /// date defaults to `today`.
    pub fn normalize(mut self, today: NaiveDate) -> Result<(NaiveDate, EntryDraft), JournalError> {
        self.shared_notes = self.shared_notes.trim().to_string();
        self.private_notes = self
            .private_notes
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty());

        if char_len(&self.shared_notes) > MAX_NOTES_LEN {
            return Err(JournalError::invalid(
                "shared_notes",
                format!("must be at most {} characters", MAX_NOTES_LEN),
            ));
        }
        if self.private_notes.as_deref().map_or(0, char_len) > MAX_NOTES_LEN {
            return Err(JournalError::invalid(
                "private_notes",
                format!("must be at most {} characters", MAX_NOTES_LEN),
            ));
        }

        validate_metrics(&self.metrics)?;
        self.tags = normalize_tags(&self.tags)?;
        self.rounds = normalize_rounds(self.rounds)?;

        if self.shared_notes.is_empty() && self.private_notes.is_none() && self.rounds.is_empty() {
            return Err(JournalError::EmptyEntry);
        }

        let latest = today.checked_add_days(Days::new(1)).unwrap_or(today);
        let session_date = self.session_date.unwrap_or(today);
        if session_date > latest {
            return Err(JournalError::FutureSession(session_date));
        }
        let earliest = today
            .checked_sub_months(Months::new(MAX_SESSION_AGE_YEARS * 12))
            .unwrap_or(NaiveDate::MIN);
        if session_date < earliest {
            return Err(JournalError::SessionTooOld(session_date));
        }
        self.session_date = Some(session_date);

        Ok((session_date, self))
    }
}

fn validate_metrics(metrics: &SessionMetrics) -> Result<(), JournalError> {
    if let Some(minutes) = metrics.duration_minutes {
        if !(1..=600).contains(&minutes) {
            return Err(JournalError::invalid("duration_minutes", "must be between 1 and 600"));
        }
    }
    if let Some(intensity) = metrics.intensity {
        if !(1..=10).contains(&intensity) {
            return Err(JournalError::invalid("intensity", "must be between 1 and 10"));
        }
    }
    if let Some(rounds) = metrics.rounds {
        if rounds > 100 {
            return Err(JournalError::invalid("rounds", "must be at most 100"));
        }
    }
    Ok(())
}

/// Trims, lower-cases and de-duplicates tags, keeping first occurrence order
pub fn normalize_tags(tags: &[String]) -> Result<Vec<String>, JournalError> {
    let mut normalized: Vec<String> = Vec::with_capacity(tags.len());
    for tag in tags {
        let tag = collapse_whitespace(&tag.to_lowercase());
        if tag.is_empty() {
            return Err(JournalError::invalid("tags", "tags must not be blank"));
        }
        if char_len(&tag) > MAX_TAG_LEN {
            return Err(JournalError::invalid(
                "tags",
                format!("tag '{}' exceeds {} characters", tag, MAX_TAG_LEN),
            ));
        }
        if !normalized.contains(&tag) {
            normalized.push(tag);
        }
    }
    if normalized.len() > MAX_TAGS {
        return Err(JournalError::invalid(
            "tags",
            format!("at most {} tags are allowed", MAX_TAGS),
        ));
    }
    Ok(normalized)
}

fn normalize_rounds(rounds: Vec<RoundLog>) -> Result<Vec<RoundLog>, JournalError> {
    if rounds.len() > MAX_ROUNDS_LOGGED {
        return Err(JournalError::invalid(
            "rounds",
            format!("at most {} rounds can be logged", MAX_ROUNDS_LOGGED),
        ));
    }
    rounds
        .into_iter()
        .map(|mut round| {
            let trimmed = round.position.trim();
            if trimmed.is_empty() {
                return Err(JournalError::invalid("position", "every round needs a position"));
            }
            if char_len(trimmed) > MAX_POSITION_LEN {
                return Err(JournalError::invalid(
                    "position",
                    format!("must be at most {} characters", MAX_POSITION_LEN),
                ));
            }
            round.position = normalize_position(trimmed);
            round.submission = round
                .submission
                .map(|s| collapse_whitespace(&s.to_lowercase()))
                .filter(|s| !s.is_empty());
            Ok(round)
        })
        .collect()
}

/// A single training-session record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    pub id: EntryId,
    pub athlete_id: UserId,
    pub session_date: NaiveDate,
    pub session_type: SessionType,
    /// Visible to linked coaches
    pub shared_notes: String,
    /// Visible to the athlete only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub private_notes: Option<String>,
    pub metrics: SessionMetrics,
    pub tags: Vec<String>,
    pub rounds: Vec<RoundLog>,
    pub structured: Option<StructuredExtraction>,
    pub action_pack: Option<ActionPack>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Entry {
    /// Creates an entry from a draft
    ///
    /// # Errors
    ///
    /// Returns a validation error when the draft breaks an entry rule.
    pub fn new(
        athlete_id: UserId,
        draft: EntryDraft,
        today: NaiveDate,
        now: DateTime<Utc>,
    ) -> Result<Self, JournalError> {
        let (session_date, draft) = draft.normalize(today)?;
        Ok(Self {
            id: EntryId::new(),
            athlete_id,
            session_date,
            session_type: draft.session_type,
            shared_notes: draft.shared_notes,
            private_notes: draft.private_notes,
            metrics: draft.metrics,
            tags: draft.tags,
            rounds: draft.rounds,
            structured: None,
            action_pack: None,
            created_at: now,
            updated_at: now,
        })
    }

    /// Replaces the editable content
    ///
    /// Derived fields are cleared; the caller recomputes them.
    pub fn revise(
        &mut self,
        draft: EntryDraft,
        today: NaiveDate,
        now: DateTime<Utc>,
    ) -> Result<(), JournalError> {
        let (session_date, draft) = draft.normalize(today)?;
        self.session_date = session_date;
        self.session_type = draft.session_type;
        self.shared_notes = draft.shared_notes;
        self.private_notes = draft.private_notes;
        self.metrics = draft.metrics;
        self.tags = draft.tags;
        self.rounds = draft.rounds;
        self.structured = None;
        self.action_pack = None;
        self.updated_at = now;
        Ok(())
    }

    /// Attaches structured extraction and the action pack derived from it
    pub fn attach_analysis(&mut self, extraction: StructuredExtraction, now: DateTime<Utc>) {
        self.action_pack = Some(ActionPack::from_extraction(&extraction, now));
        self.structured = Some(extraction);
        self.updated_at = now;
    }

    /// The entry as a non-owner sees it
    pub fn redacted(&self) -> Entry {
        Entry {
            private_notes: None,
            ..self.clone()
        }
    }

    /// Outcomes for analytics: structured outcomes when extracted, else rounds
    pub fn outcome_records(&self) -> Vec<ExtractedOutcome> {
        match &self.structured {
            Some(structured) => structured.outcomes.clone(),
            None => self
                .rounds
                .iter()
                .map(|r| ExtractedOutcome {
                    position: r.position.clone(),
                    outcome: r.outcome,
                })
                .collect(),
        }
    }

    /// Canonical positions this entry touches
    pub fn positions(&self) -> Vec<String> {
        let mut positions: Vec<String> = Vec::new();
        let structured = self
            .structured
            .iter()
            .flat_map(|s| s.positions.iter().cloned());
        for position in self.rounds.iter().map(|r| r.position.clone()).chain(structured) {
            if !positions.contains(&position) {
                positions.push(position);
            }
        }
        positions
    }

    /// Skill slugs this entry touches: tags, techniques and extracted skills
    pub fn skills(&self) -> Vec<String> {
        let mut skills: Vec<String> = Vec::new();
        let mut push = |slug: String| {
            if !slug.is_empty() && !skills.contains(&slug) {
                skills.push(slug);
            }
        };
        for tag in &self.tags {
            push(slugify(canonical_technique(tag).unwrap_or(tag.as_str())));
        }
        for submission in self.rounds.iter().filter_map(|r| r.submission.as_deref()) {
            push(slugify(canonical_technique(submission).unwrap_or(submission)));
        }
        if let Some(structured) = &self.structured {
            for technique in &structured.techniques {
                push(slugify(technique));
            }
            for skill in &structured.skills {
                push(skill.clone());
            }
        }
        skills
    }

    /// Skills the extraction saw performed successfully
    ///
    /// Empty when the entry has not been analysed.
    pub fn extracted_skills(&self) -> &[String] {
        self.structured.as_ref().map_or(&[], |s| s.skills.as_slice())
    }

    /// Whether a round references the partner
    pub fn mentions_partner(&self, partner_id: PartnerId) -> bool {
        self.rounds.iter().any(|r| r.partner_id == Some(partner_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 10).unwrap()
    }

    fn athlete() -> UserId {
        UserId::new("athlete-1").unwrap()
    }

    fn draft(notes: &str) -> EntryDraft {
        EntryDraft {
            shared_notes: notes.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_session_date_defaults_to_today() {
        let entry = Entry::new(athlete(), draft("drilled knee slice"), today(), Utc::now()).unwrap();
        assert_eq!(entry.session_date, today());
    }

    #[test]
    fn test_empty_entry_rejected() {
        let err = Entry::new(athlete(), draft("   "), today(), Utc::now()).unwrap_err();
        assert!(matches!(err, JournalError::EmptyEntry));
    }

    #[test]
    fn test_private_notes_alone_are_enough() {
        let mut d = draft("");
        d.private_notes = Some("felt flat, bad sleep".to_string());
        assert!(Entry::new(athlete(), d, today(), Utc::now()).is_ok());
    }

    #[test]
    fn test_future_session_rejected_beyond_one_day() {
        let mut d = draft("flow rolls");
        d.session_date = today().checked_add_days(Days::new(1));
        assert!(Entry::new(athlete(), d.clone(), today(), Utc::now()).is_ok());

        d.session_date = today().checked_add_days(Days::new(2));
        let err = Entry::new(athlete(), d, today(), Utc::now()).unwrap_err();
        assert!(matches!(err, JournalError::FutureSession(_)));
    }

    #[test]
    fn test_unanalysed_entry_has_no_extracted_skills() {
        let mut d = draft("hit a triangle from guard");
        d.tags = vec!["triangle".to_string()];
        let entry = Entry::new(athlete(), d, today(), Utc::now()).unwrap();
        assert!(entry.structured.is_none());
        assert!(entry.extracted_skills().is_empty());
        assert!(entry.skills().contains(&"triangle".to_string()));
    }

    #[test]
    fn test_session_date_floor() {
        let mut d = draft("flow rolls");
        d.session_date = today().checked_sub_months(Months::new(MAX_SESSION_AGE_YEARS * 12));
        assert!(Entry::new(athlete(), d.clone(), today(), Utc::now()).is_ok());

        d.session_date = NaiveDate::from_ymd_opt(1, 1, 1);
        let err = Entry::new(athlete(), d, today(), Utc::now()).unwrap_err();
        assert!(matches!(err, JournalError::SessionTooOld(_)));
        assert!(err.is_validation());
    }

    #[test]
    fn test_tags_normalized_and_deduplicated() {
        let tags = vec!["Guard  Retention".to_string(), "guard retention".to_string(), "Armbar".to_string()];
        assert_eq!(normalize_tags(&tags).unwrap(), vec!["guard retention", "armbar"]);
        assert!(normalize_tags(&["  ".to_string()]).is_err());
        let too_many: Vec<String> = (0..=MAX_TAGS).map(|i| format!("t{}", i)).collect();
        assert!(normalize_tags(&too_many).is_err());
    }

    #[test]
    fn test_metric_bounds() {
        let mut d = draft("hard rounds");
        d.metrics.intensity = Some(11);
        assert!(Entry::new(athlete(), d.clone(), today(), Utc::now()).is_err());
        d.metrics.intensity = Some(10);
        d.metrics.duration_minutes = Some(0);
        assert!(Entry::new(athlete(), d, today(), Utc::now()).is_err());
    }

    #[test]
    fn test_round_positions_canonicalised() {
        let mut d = draft("");
        d.rounds = vec![RoundLog {
            partner_id: None,
            position: " Side Mount ".to_string(),
            outcome: Outcome::Loss,
            submission: Some("Americana".to_string()),
        }];
        let entry = Entry::new(athlete(), d, today(), Utc::now()).unwrap();
        assert_eq!(entry.rounds[0].position, "side control");
        assert_eq!(entry.rounds[0].submission.as_deref(), Some("americana"));
        assert_eq!(entry.positions(), vec!["side control".to_string()]);
        assert_eq!(entry.skills(), vec!["americana".to_string()]);
    }

    #[test]
    fn test_redacted_hides_private_notes() {
        let mut d = draft("shared");
        d.private_notes = Some("secret".to_string());
        let entry = Entry::new(athlete(), d, today(), Utc::now()).unwrap();
        assert!(entry.redacted().private_notes.is_none());
        assert_eq!(entry.redacted().shared_notes, "shared");
    }

    #[test]
    fn test_session_type_parse() {
        assert_eq!("No-Gi".parse::<SessionType>().unwrap(), SessionType::Nogi);
        assert_eq!("open mat".parse::<SessionType>().unwrap(), SessionType::OpenMat);
        assert!("yoga".parse::<SessionType>().is_err());
    }
}
