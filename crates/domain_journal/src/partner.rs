//! Training-partner profiles

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use core_kernel::text::{char_len, collapse_whitespace};
use core_kernel::{PartnerId, UserId};

use crate::entry::{Entry, Outcome};
use crate::error::JournalError;

pub const MAX_DISPLAY_NAME_LEN: usize = 60;
pub const MAX_PARTNER_NOTES_LEN: usize = 1_000;

/// Belt rank
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Belt {
    White,
    Blue,
    Purple,
    Brown,
    Black,
    #[default]
    Unknown,
}

/// Editable partner fields
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PartnerDraft {
    pub display_name: String,
    pub belt: Belt,
    pub weight_class: Option<String>,
    pub notes: Option<String>,
}

impl PartnerDraft {
    fn normalize(self) -> Result<PartnerDraft, JournalError> {
        let display_name = collapse_whitespace(&self.display_name);
        if display_name.is_empty() {
            return Err(JournalError::invalid("display_name", "must not be empty"));
        }
        if char_len(&display_name) > MAX_DISPLAY_NAME_LEN {
            return Err(JournalError::invalid(
                "display_name",
                format!("must be at most {} characters", MAX_DISPLAY_NAME_LEN),
            ));
        }
        let notes = self.notes.map(|n| n.trim().to_string()).filter(|n| !n.is_empty());
        if notes.as_deref().map_or(0, char_len) > MAX_PARTNER_NOTES_LEN {
            return Err(JournalError::invalid(
                "notes",
                format!("must be at most {} characters", MAX_PARTNER_NOTES_LEN),
            ));
        }
        Ok(PartnerDraft {
            display_name,
            belt: self.belt,
            weight_class: self
                .weight_class
                .map(|w| collapse_whitespace(&w))
                .filter(|w| !w.is_empty()),
            notes,
        })
    }
}

/// Someone the athlete trains with
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartnerProfile {
    pub id: PartnerId,
    pub athlete_id: UserId,
    pub display_name: String,
    pub belt: Belt,
    pub weight_class: Option<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl PartnerProfile {
    pub fn new(athlete_id: UserId, draft: PartnerDraft, now: DateTime<Utc>) -> Result<Self, JournalError> {
        let draft = draft.normalize()?;
        Ok(Self {
            id: PartnerId::new(),
            athlete_id,
            display_name: draft.display_name,
            belt: draft.belt,
            weight_class: draft.weight_class,
            notes: draft.notes,
            created_at: now,
            updated_at: now,
        })
    }

    pub fn update(&mut self, draft: PartnerDraft, now: DateTime<Utc>) -> Result<(), JournalError> {
        let draft = draft.normalize()?;
        self.display_name = draft.display_name;
        self.belt = draft.belt;
        self.weight_class = draft.weight_class;
        self.notes = draft.notes;
        self.updated_at = now;
        Ok(())
    }
}

/// Head-to-head record against one partner
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartnerRecord {
    pub partner_id: PartnerId,
    pub rounds: u32,
    pub wins: u32,
    pub losses: u32,
    pub draws: u32,
}

impl PartnerRecord {
    /// Tallies every logged round against the partner
    pub fn from_entries<'a>(partner_id: PartnerId, entries: impl IntoIterator<Item = &'a Entry>) -> Self {
        let mut record = PartnerRecord {
            partner_id,
            ..Default::default()
        };
        for round in entries
            .into_iter()
            .flat_map(|e| e.rounds.iter())
            .filter(|r| r.partner_id == Some(partner_id))
        {
            record.rounds += 1;
            match round.outcome {
                Outcome::Win => record.wins += 1,
                Outcome::Loss => record.losses += 1,
                Outcome::Draw => record.draws += 1,
            }
        }
        record
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::{EntryDraft, RoundLog};
    use chrono::NaiveDate;

    fn athlete() -> UserId {
        UserId::new("a1").unwrap()
    }

    #[test]
    fn test_partner_name_required() {
        let draft = PartnerDraft {
            display_name: "   ".to_string(),
            ..Default::default()
        };
        assert!(PartnerProfile::new(athlete(), draft, Utc::now()).is_err());
    }

    #[test]
    fn test_partner_update_normalizes() {
        let mut p = PartnerProfile::new(
            athlete(),
            PartnerDraft { display_name: "Marcos".into(), ..Default::default() },
            Utc::now(),
        )
        .unwrap();
        p.update(
            PartnerDraft {
                display_name: "  Marcos   S. ".into(),
                belt: Belt::Brown,
                weight_class: Some("  ".into()),
                notes: Some(" loves leg locks ".into()),
            },
            Utc::now(),
        )
        .unwrap();
        assert_eq!(p.display_name, "Marcos S.");
        assert_eq!(p.belt, Belt::Brown);
        assert!(p.weight_class.is_none());
        assert_eq!(p.notes.as_deref(), Some("loves leg locks"));
    }

    #[test]
    fn test_partner_record() {
        let partner = PartnerId::new();
        let other = PartnerId::new();
        let round = |pid, outcome| RoundLog {
            partner_id: Some(pid),
            position: "mount".into(),
            outcome,
            submission: None,
        };
        let draft = EntryDraft {
            rounds: vec![
                round(partner, Outcome::Win),
                round(partner, Outcome::Loss),
                round(other, Outcome::Win),
                round(partner, Outcome::Draw),
            ],
            ..Default::default()
        };
        let entry = Entry::new(athlete(), draft, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(), Utc::now()).unwrap();
        let record = PartnerRecord::from_entries(partner, [&entry]);
        assert_eq!((record.rounds, record.wins, record.losses, record.draws), (3, 1, 1, 1));
        assert!(entry.mentions_partner(other));
    }
}
