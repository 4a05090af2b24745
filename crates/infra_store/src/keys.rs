//! Partition and sort key layout
//!
//! | record                  | pk                | sk                               |
//! |-------------------------|-------------------|----------------------------------|
//! | entry                   | `ATHLETE#{a}`     | `ENTRY#{entry}`                  |
//! | comment                 | `ATHLETE#{a}`     | `COMMENT#{entry}#{comment}`      |
//! | partner                 | `ATHLETE#{a}`     | `PARTNER#{partner}`              |
//! | saved search            | `ATHLETE#{a}`     | `SEARCH#{search}`                |
//! | saved search name guard | `ATHLETE#{a}`     | `SEARCHNAME#{slug}`              |
//! | checkoff                | `ATHLETE#{a}`     | `CHECKOFF#{checkoff}`            |
//! | checkoff skill guard    | `ATHLETE#{a}`     | `SKILL#{slug}`                   |
//! | evidence                | `ATHLETE#{a}`     | `EVIDENCE#{checkoff}#{evidence}` |
//! | annotation              | `ATHLETE#{a}`     | `ANNOTATION#{annotation}`        |
//! | progress report         | `ATHLETE#{a}`     | `REPORT#progress`                |
//! | coach link              | `ATHLETE#{a}`     | `COACH#{c}`                      |
//! | coach link (reverse)    | `COACH#{c}`       | `ATHLETE#{a}`                    |

use core_kernel::{
    AnnotationId, CheckoffId, CommentId, EntryId, EvidenceId, PartnerId, SavedSearchId, UserId,
};

pub const ENTRY_PREFIX: &str = "ENTRY#";
pub const COMMENT_PREFIX: &str = "COMMENT#";
pub const PARTNER_PREFIX: &str = "PARTNER#";
pub const SEARCH_PREFIX: &str = "SEARCH#";
pub const CHECKOFF_PREFIX: &str = "CHECKOFF#";
pub const EVIDENCE_PREFIX: &str = "EVIDENCE#";
pub const ANNOTATION_PREFIX: &str = "ANNOTATION#";
pub const COACH_PREFIX: &str = "COACH#";
pub const ATHLETE_PREFIX: &str = "ATHLETE#";
pub const REPORT_SK: &str = "REPORT#progress";

/// Entity names stored alongside each item
pub mod entity {
    pub const ENTRY: &str = "entry";
    pub const COMMENT: &str = "comment";
    pub const PARTNER: &str = "partner";
    pub const SAVED_SEARCH: &str = "saved_search";
    pub const GUARD: &str = "guard";
    pub const CHECKOFF: &str = "checkoff";
    pub const EVIDENCE: &str = "evidence";
    pub const ANNOTATION: &str = "annotation";
    pub const REPORT: &str = "progress_report";
    pub const COACH_LINK: &str = "coach_link";
}

pub fn athlete_pk(athlete: &UserId) -> String {
    format!("{}{}", ATHLETE_PREFIX, athlete)
}

pub fn coach_pk(coach: &UserId) -> String {
    format!("{}{}", COACH_PREFIX, coach)
}

pub fn entry_sk(id: EntryId) -> String {
    format!("{}{}", ENTRY_PREFIX, id)
}

/// Prefix of every comment on one entry
pub fn comment_prefix(entry: EntryId) -> String {
    format!("{}{}#", COMMENT_PREFIX, entry)
}

pub fn comment_sk(entry: EntryId, id: CommentId) -> String {
    format!("{}{}", comment_prefix(entry), id)
}

pub fn partner_sk(id: PartnerId) -> String {
    format!("{}{}", PARTNER_PREFIX, id)
}

pub fn search_sk(id: SavedSearchId) -> String {
    format!("{}{}", SEARCH_PREFIX, id)
}

pub fn search_name_sk(name_key: &str) -> String {
    format!("SEARCHNAME#{}", name_key)
}

pub fn checkoff_sk(id: CheckoffId) -> String {
    format!("{}{}", CHECKOFF_PREFIX, id)
}

pub fn checkoff_skill_sk(skill: &str) -> String {
    format!("SKILL#{}", skill)
}

/// Prefix of every evidence item of one checkoff
pub fn evidence_prefix(checkoff: CheckoffId) -> String {
    format!("{}{}#", EVIDENCE_PREFIX, checkoff)
}

pub fn evidence_sk(checkoff: CheckoffId, id: EvidenceId) -> String {
    format!("{}{}", evidence_prefix(checkoff), id)
}

pub fn annotation_sk(id: AnnotationId) -> String {
    format!("{}{}", ANNOTATION_PREFIX, id)
}

/// Athlete-side sort key of a coach link
pub fn coach_link_sk(coach: &UserId) -> String {
    format!("{}{}", COACH_PREFIX, coach)
}

/// Coach-side sort key of a coach link
pub fn athlete_link_sk(athlete: &UserId) -> String {
    format!("{}{}", ATHLETE_PREFIX, athlete)
}
