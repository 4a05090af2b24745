//! Test Data Builders

use chrono::{DateTime, NaiveDate, Utc};
use fake::faker::name::en::Name;
use fake::Fake;

use core_kernel::{PartnerId, UserId};
use domain_journal::{
    Belt, Entry, EntryDraft, Outcome, PartnerDraft, PartnerProfile, RoundLog, SessionType,
};
use domain_progress::Checkoff;

use crate::fixtures::{DateFixtures, NoteFixtures, UserFixtures};

/// A logged round without partner or submission
pub fn round(position: &str, outcome: Outcome) -> RoundLog {
    RoundLog {
        partner_id: None,
        position: position.to_string(),
        outcome,
        submission: None,
    }
}

/// Builder for journal entries
pub struct EntryBuilder {
    athlete: UserId,
    draft: EntryDraft,
    today: NaiveDate,
    now: DateTime<Utc>,
}

impl Default for EntryBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl EntryBuilder {
    pub fn new() -> Self {
        Self {
            athlete: UserFixtures::athlete_id(),
            draft: EntryDraft {
                session_date: Some(DateFixtures::today()),
                shared_notes: NoteFixtures::flow_roll().to_string(),
                ..Default::default()
            },
            today: DateFixtures::today(),
            now: DateFixtures::now(),
        }
    }

    pub fn athlete(mut self, athlete: UserId) -> Self {
        self.athlete = athlete;
        self
    }

    pub fn on(mut self, date: NaiveDate) -> Self {
        self.draft.session_date = Some(date);
        self
    }

    pub fn session_type(mut self, session_type: SessionType) -> Self {
        self.draft.session_type = session_type;
        self
    }

    pub fn notes(mut self, notes: &str) -> Self {
        self.draft.shared_notes = notes.to_string();
        self
    }

    pub fn private_notes(mut self, notes: &str) -> Self {
        self.draft.private_notes = Some(notes.to_string());
        self
    }

    pub fn minutes(mut self, minutes: u32) -> Self {
        self.draft.metrics.duration_minutes = Some(minutes);
        self
    }

    pub fn tag(mut self, tag: &str) -> Self {
        self.draft.tags.push(tag.to_string());
        self
    }

    pub fn round(mut self, position: &str, outcome: Outcome) -> Self {
        self.draft.rounds.push(round(position, outcome));
        self
    }

    pub fn round_with(mut self, partner: PartnerId, position: &str, outcome: Outcome) -> Self {
        self.draft.rounds.push(RoundLog {
            partner_id: Some(partner),
            ..round(position, outcome)
        });
        self
    }

    pub fn draft(&self) -> EntryDraft {
        self.draft.clone()
    }

    /// Builds the entry; panics on an invalid draft
    pub fn build(self) -> Entry {
        Entry::new(self.athlete, self.draft, self.today, self.now).expect("valid entry draft")
    }
}

/// Builder for checkoffs
pub struct CheckoffBuilder {
    athlete: UserId,
    skill: String,
    threshold: u32,
}

impl Default for CheckoffBuilder {
    fn default() -> Self {
        Self::new("triangle")
    }
}

impl CheckoffBuilder {
    pub fn new(skill: &str) -> Self {
        Self {
            athlete: UserFixtures::athlete_id(),
            skill: skill.to_string(),
            threshold: 2,
        }
    }

    pub fn athlete(mut self, athlete: UserId) -> Self {
        self.athlete = athlete;
        self
    }

    pub fn threshold(mut self, threshold: u32) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn build(self) -> Checkoff {
        Checkoff::new(self.athlete, &self.skill, None, self.threshold, DateFixtures::now())
            .expect("valid checkoff")
    }
}

/// Partner draft with a generated display name
pub fn partner_draft() -> PartnerDraft {
    let name: String = Name().fake();
    PartnerDraft {
        display_name: name,
        belt: Belt::Blue,
        weight_class: Some("middle".to_string()),
        notes: None,
    }
}

pub fn partner(athlete: UserId) -> PartnerProfile {
    PartnerProfile::new(athlete, partner_draft(), DateFixtures::now()).expect("valid partner")
}
