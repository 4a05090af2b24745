//! Pre-built Test Fixtures

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use core_kernel::{Principal, Role, UserId};

/// Fixed user identities
pub struct UserFixtures;

impl UserFixtures {
    pub const ATHLETE: &'static str = "athlete-ana";
    pub const OTHER_ATHLETE: &'static str = "athlete-bruno";
    pub const COACH: &'static str = "coach-carla";
    pub const ADMIN: &'static str = "admin-dora";

    pub fn athlete_id() -> UserId {
        UserId::new(Self::ATHLETE).unwrap()
    }

    pub fn other_athlete_id() -> UserId {
        UserId::new(Self::OTHER_ATHLETE).unwrap()
    }

    pub fn coach_id() -> UserId {
        UserId::new(Self::COACH).unwrap()
    }

    pub fn athlete() -> Principal {
        Principal::new(Self::athlete_id(), vec![Role::Athlete])
    }

    pub fn coach() -> Principal {
        Principal::new(Self::coach_id(), vec![Role::Coach])
    }

    pub fn admin() -> Principal {
        Principal::new(UserId::new(Self::ADMIN).unwrap(), vec![Role::Admin])
    }
}

/// Fixed calendar points
pub struct DateFixtures;

impl DateFixtures {
    /// "Today" for fixture entries
    pub fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 28).unwrap()
    }

    /// A Monday, so week buckets start on it
    pub fn week_start() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 3).unwrap()
    }

    pub fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 28, 19, 30, 0).unwrap()
    }
}

/// Representative note texts
pub struct NoteFixtures;

impl NoteFixtures {
    /// Mentions a half guard leak and a triangle win
    pub fn mixed_session() -> &'static str {
        "Got passed from half guard twice. Hit a triangle from closed guard. Drilled knee slice."
    }

    pub fn flow_roll() -> &'static str {
        "Easy flow rolls, worked on breathing."
    }

    pub fn private_note() -> &'static str {
        "Left knee felt tweaky, keep an eye on it."
    }
}
