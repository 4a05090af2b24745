//! Checkoffs: skill certification driven by confirmed evidence

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use core_kernel::text::{char_len, collapse_whitespace, slugify};
use core_kernel::{CheckoffId, UserId};
use domain_journal::vocabulary::canonical_technique;

use crate::error::ProgressError;
use crate::evidence::{Evidence, EvidenceStatus};

pub const MAX_SKILL_LEN: usize = 80;
pub const MIN_THRESHOLD: u32 = 1;
pub const MAX_THRESHOLD: u32 = 10;

/// Checkoff status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckoffStatus {
    /// Not yet enough confirmed evidence
    Pending,
    /// Threshold reached for the first time
    Earned,
    /// Confirmed evidence dropped below the threshold
    Superseded,
    /// Threshold reached again after being superseded
    Revalidated,
}

impl CheckoffStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CheckoffStatus::Pending => "pending",
            CheckoffStatus::Earned => "earned",
            CheckoffStatus::Superseded => "superseded",
            CheckoffStatus::Revalidated => "revalidated",
        }
    }
}

impl fmt::Display for CheckoffStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lifecycle table
///
/// | current     | confirmed >= threshold | confirmed < threshold |
/// |-------------|------------------------|-----------------------|
/// | pending     | earned                 | pending               |
/// | earned      | earned                 | superseded            |
/// | superseded  | revalidated            | superseded            |
/// | revalidated | revalidated            | superseded            |
pub fn next_status(current: CheckoffStatus, confirmed: u32, threshold: u32) -> CheckoffStatus {
    use CheckoffStatus::*;
    let met = confirmed >= threshold;
    match (current, met) {
        (Pending, true) => Earned,
        (Pending, false) => Pending,
        (Earned, true) => Earned,
        (Earned, false) => Superseded,
        (Superseded, true) => Revalidated,
        (Superseded, false) => Superseded,
        (Revalidated, true) => Revalidated,
        (Revalidated, false) => Superseded,
    }
}

/// Canonical skill slug for free text
///
/// Known techniques map onto their canonical name first, so "Arm Bar" and
/// "juji gatame" both become `armbar`.
pub fn skill_slug(text: &str) -> String {
    let normalized = collapse_whitespace(text);
    slugify(canonical_technique(&normalized).unwrap_or(normalized.as_str()))
}

/// A recorded status transition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusChange {
    pub from: CheckoffStatus,
    pub to: CheckoffStatus,
    pub confirmed_count: u32,
    pub at: DateTime<Utc>,
}

/// Skill certification record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Checkoff {
    pub id: CheckoffId,
    pub athlete_id: UserId,
    /// Skill slug, unique per athlete
    pub skill: String,
    /// Display name
    pub label: String,
    pub status: CheckoffStatus,
    pub evidence_threshold: u32,
    pub confirmed_count: u32,
    pub earned_at: Option<DateTime<Utc>>,
    pub superseded_at: Option<DateTime<Utc>>,
    pub revalidated_at: Option<DateTime<Utc>>,
    pub history: Vec<StatusChange>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Checkoff {
    /// Opens a pending checkoff for a skill
    ///
    /// # Errors
    ///
    /// Returns a validation error for an empty or over-long skill, or a
    /// threshold outside 1..=10.
    pub fn new(
        athlete_id: UserId,
        skill: &str,
        label: Option<&str>,
        evidence_threshold: u32,
        now: DateTime<Utc>,
    ) -> Result<Self, ProgressError> {
        let slug = skill_slug(skill);
        if slug.is_empty() {
            return Err(ProgressError::invalid("skill", "must not be empty"));
        }
        if char_len(&slug) > MAX_SKILL_LEN {
            return Err(ProgressError::invalid(
                "skill",
                format!("must be at most {} characters", MAX_SKILL_LEN),
            ));
        }
        if !(MIN_THRESHOLD..=MAX_THRESHOLD).contains(&evidence_threshold) {
            return Err(ProgressError::invalid(
                "evidence_threshold",
                format!("must be between {} and {}", MIN_THRESHOLD, MAX_THRESHOLD),
            ));
        }

        let label = label
            .map(collapse_whitespace)
            .filter(|l| !l.is_empty())
            .or_else(|| canonical_technique(skill).map(str::to_string))
            .unwrap_or_else(|| collapse_whitespace(skill));
        if char_len(&label) > MAX_SKILL_LEN {
            return Err(ProgressError::invalid(
                "label",
                format!("must be at most {} characters", MAX_SKILL_LEN),
            ));
        }

        Ok(Self {
            id: CheckoffId::new(),
            athlete_id,
            skill: slug,
            label,
            status: CheckoffStatus::Pending,
            evidence_threshold,
            confirmed_count: 0,
            earned_at: None,
            superseded_at: None,
            revalidated_at: None,
            history: Vec::new(),
            created_at: now,
            updated_at: now,
        })
    }

    /// Recounts confirmed evidence and applies the lifecycle table
    ///
    /// Evidence for other checkoffs is ignored. Returns the transition when
    /// the status changed.
    pub fn merge(&mut self, evidence: &[Evidence], now: DateTime<Utc>) -> Option<StatusChange> {
        let confirmed = evidence
            .iter()
            .filter(|e| e.checkoff_id == self.id && e.status == EvidenceStatus::Confirmed)
            .count() as u32;

        let next = next_status(self.status, confirmed, self.evidence_threshold);
        let count_changed = confirmed != self.confirmed_count;
        self.confirmed_count = confirmed;

        if next == self.status {
            if count_changed {
                self.updated_at = now;
            }
            return None;
        }

        let change = StatusChange {
            from: self.status,
            to: next,
            confirmed_count: confirmed,
            at: now,
        };
        match next {
            CheckoffStatus::Earned => self.earned_at = Some(now),
            CheckoffStatus::Superseded => self.superseded_at = Some(now),
            CheckoffStatus::Revalidated => self.revalidated_at = Some(now),
            CheckoffStatus::Pending => {}
        }
        tracing::info!(
            checkoff_id = %self.id,
            athlete_id = %self.athlete_id,
            skill = %self.skill,
            from = %change.from,
            to = %change.to,
            confirmed,
            "Checkoff status changed"
        );
        self.status = next;
        self.history.push(change.clone());
        self.updated_at = now;
        Some(change)
    }
}
