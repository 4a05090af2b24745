//! Property-based Test Generators
//!
//! Proptest strategies for journal data.

use chrono::{Days, NaiveDate};
use proptest::prelude::*;

use core_kernel::UserId;
use domain_journal::{Entry, EntryDraft, Outcome, RoundLog, SessionType};

use crate::fixtures::DateFixtures;

pub fn outcome_strategy() -> impl Strategy<Value = Outcome> {
    prop_oneof![Just(Outcome::Win), Just(Outcome::Loss), Just(Outcome::Draw)]
}

pub fn position_strategy() -> impl Strategy<Value = &'static str> {
    prop_oneof![
        Just("mount"),
        Just("side control"),
        Just("closed guard"),
        Just("half guard"),
        Just("back control"),
        Just("turtle"),
    ]
}

pub fn session_type_strategy() -> impl Strategy<Value = SessionType> {
    prop_oneof![
        Just(SessionType::Gi),
        Just(SessionType::Nogi),
        Just(SessionType::OpenMat),
        Just(SessionType::Drilling),
        Just(SessionType::Competition),
    ]
}

pub fn round_strategy() -> impl Strategy<Value = RoundLog> {
    (position_strategy(), outcome_strategy()).prop_map(|(position, outcome)| RoundLog {
        partner_id: None,
        position: position.to_string(),
        outcome,
        submission: None,
    })
}

/// A session date within the 120 days before the fixture "today"
pub fn session_date_strategy() -> impl Strategy<Value = NaiveDate> {
    (0u64..120).prop_map(|back| {
        DateFixtures::today()
            .checked_sub_days(Days::new(back))
            .unwrap_or_else(DateFixtures::today)
    })
}

pub fn entry_draft_strategy() -> impl Strategy<Value = EntryDraft> {
    (
        session_date_strategy(),
        session_type_strategy(),
        prop::collection::vec(round_strategy(), 0..6),
        prop::option::of(1u32..180),
        prop::collection::vec("[a-z]{3,10}", 0..4),
    )
        .prop_map(|(date, session_type, rounds, minutes, tags)| {
            let mut draft = EntryDraft {
                session_date: Some(date),
                session_type,
                rounds,
                tags,
                ..Default::default()
            };
            draft.metrics.duration_minutes = minutes;
            draft
        })
}

pub fn entry_strategy(athlete: UserId) -> impl Strategy<Value = Entry> {
    entry_draft_strategy().prop_map(move |draft| {
        Entry::new(athlete.clone(), draft, DateFixtures::today(), DateFixtures::now())
            .expect("generated drafts are valid")
    })
}
