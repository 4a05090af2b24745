//! Structured extraction of entry notes
//!
//! The production extractor is an external AI service; this module defines
//! the port it plugs into and ships a deterministic keyword extractor that
//! is used when no external service is configured.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use core_kernel::text::{contains_phrase, sentences, slugify};
use core_kernel::{DomainPort, PortError};

use crate::entry::{Entry, Outcome};
use crate::vocabulary::{canonical_technique, mentions, POSITIONS, TECHNIQUES};

/// Phrases that mark an exchange the athlete lost. Checked before wins,
/// since "got swept" also contains "swept".
const LOSS_CUES: &[&str] = &[
    "got swept", "got passed", "got submitted", "got tapped", "got caught", "got taken down",
    "lost", "stuck", "struggled", "couldn't", "could not", "gave up",
];

const WIN_CUES: &[&str] = &[
    "submitted", "tapped", "finished", "swept", "passed", "escaped", "hit", "landed", "won",
    "took down", "scored",
];

/// Who produced the structured fields
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractionSource {
    Keyword,
    External,
}

/// One position/result pair derived from an entry
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ExtractedOutcome {
    pub position: String,
    pub outcome: Outcome,
}

/// Structured fields derived from an entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructuredExtraction {
    /// Canonical positions, in order of first mention
    pub positions: Vec<String>,
    /// Canonical technique names
    pub techniques: Vec<String>,
    /// Logged rounds plus outcomes read from the notes
    pub outcomes: Vec<ExtractedOutcome>,
    /// Skill slugs demonstrated successfully (checkoff candidates)
    pub skills: Vec<String>,
    pub source: ExtractionSource,
    pub extracted_at: DateTime<Utc>,
}

/// Port for structured-extraction services
#[async_trait]
pub trait ExtractionPort: DomainPort {
    /// Derives structured fields from an entry
    ///
    /// Implementations must only read the entry's shared notes and rounds.
    async fn extract(&self, entry: &Entry) -> Result<StructuredExtraction, PortError>;
}

/// Deterministic vocabulary-based extractor
#[derive(Debug, Clone, Copy, Default)]
pub struct KeywordExtractor;

impl KeywordExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Runs the extraction with an explicit clock
    pub fn extract_at(&self, entry: &Entry, now: DateTime<Utc>) -> StructuredExtraction {
        let notes = entry.shared_notes.as_str();

        let mut positions: Vec<String> = Vec::new();
        for position in mentions(&POSITIONS, notes)
            .into_iter()
            .map(str::to_string)
            .chain(entry.rounds.iter().map(|r| r.position.clone()))
        {
            push_unique(&mut positions, position);
        }

        let mut techniques: Vec<String> = Vec::new();
        for technique in mentions(&TECHNIQUES, notes) {
            push_unique(&mut techniques, technique.to_string());
        }
        for submission in entry.rounds.iter().filter_map(|r| r.submission.as_deref()) {
            push_unique(
                &mut techniques,
                canonical_technique(submission).unwrap_or(submission).to_string(),
            );
        }

        let mut outcomes: Vec<ExtractedOutcome> = entry
            .rounds
            .iter()
            .map(|r| ExtractedOutcome {
                position: r.position.clone(),
                outcome: r.outcome,
            })
            .collect();

        let mut skills: Vec<String> = Vec::new();
        for round in entry.rounds.iter().filter(|r| r.outcome == Outcome::Win) {
            if let Some(submission) = round.submission.as_deref() {
                push_unique(&mut skills, slugify(canonical_technique(submission).unwrap_or(submission)));
            }
        }

        for sentence in sentences(notes) {
            let lower = sentence.to_lowercase();
            let Some(outcome) = classify(&lower) else {
                continue;
            };
            for position in mentions(&POSITIONS, sentence) {
                outcomes.push(ExtractedOutcome {
                    position: position.to_string(),
                    outcome,
                });
            }
            if outcome == Outcome::Win {
                for technique in mentions(&TECHNIQUES, sentence) {
                    push_unique(&mut skills, slugify(technique));
                }
            }
        }

        for tag in &entry.tags {
            if let Some(technique) = canonical_technique(tag) {
                push_unique(&mut skills, slugify(technique));
            }
        }

        StructuredExtraction {
            positions,
            techniques,
            outcomes,
            skills,
            source: ExtractionSource::Keyword,
            extracted_at: now,
        }
    }
}

impl DomainPort for KeywordExtractor {}

#[async_trait]
impl ExtractionPort for KeywordExtractor {
    async fn extract(&self, entry: &Entry) -> Result<StructuredExtraction, PortError> {
        Ok(self.extract_at(entry, Utc::now()))
    }
}

/// Result cue of a lower-cased sentence
fn classify(sentence: &str) -> Option<Outcome> {
    if LOSS_CUES.iter().any(|cue| contains_phrase(sentence, cue)) {
        Some(Outcome::Loss)
    } else if WIN_CUES.iter().any(|cue| contains_phrase(sentence, cue)) {
        Some(Outcome::Win)
    } else {
        None
    }
}

fn push_unique(values: &mut Vec<String>, value: String) {
    if !values.contains(&value) {
        values.push(value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::{EntryDraft, RoundLog};
    use chrono::NaiveDate;
    use core_kernel::UserId;

    fn entry(notes: &str, rounds: Vec<RoundLog>) -> Entry {
        let draft = EntryDraft {
            shared_notes: notes.to_string(),
            private_notes: Some("the half guard stuff was embarrassing".to_string()),
            rounds,
            tags: vec!["Knee Cut".to_string()],
            ..Default::default()
        };
        Entry::new(
            UserId::new("athlete-1").unwrap(),
            draft,
            NaiveDate::from_ymd_opt(2024, 6, 10).unwrap(),
            Utc::now(),
        )
        .unwrap()
    }

    #[test]
    fn test_sentence_outcomes_and_skills() {
        let e = entry(
            "Got swept from closed guard twice. Hit a triangle from closed guard! Drilled mount escapes.",
            vec![],
        );
        let x = KeywordExtractor::new().extract_at(&e, Utc::now());

        assert_eq!(x.positions, vec!["closed guard".to_string(), "mount".to_string()]);
        assert_eq!(x.techniques, vec!["triangle".to_string()]);
        assert_eq!(
            x.outcomes,
            vec![
                ExtractedOutcome { position: "closed guard".into(), outcome: Outcome::Loss },
                ExtractedOutcome { position: "closed guard".into(), outcome: Outcome::Win },
            ]
        );
        // triangle from the win sentence, knee slice from the tag
        assert_eq!(x.skills, vec!["triangle".to_string(), "knee-slice".to_string()]);
    }

    #[test]
    fn test_private_notes_are_ignored() {
        let e = entry("flow rolling only", vec![]);
        let x = KeywordExtractor::new().extract_at(&e, Utc::now());
        assert!(x.positions.is_empty());
        assert!(x.outcomes.is_empty());
    }

    #[test]
    fn test_rounds_feed_outcomes_and_skills() {
        let rounds = vec![
            RoundLog {
                partner_id: None,
                position: "back mount".to_string(),
                outcome: Outcome::Win,
                submission: Some("RNC".to_string()),
            },
            RoundLog {
                partner_id: None,
                position: "turtle".to_string(),
                outcome: Outcome::Draw,
                submission: None,
            },
        ];
        let x = KeywordExtractor::new().extract_at(&entry("", rounds), Utc::now());
        assert_eq!(x.positions, vec!["back control".to_string(), "turtle".to_string()]);
        assert_eq!(x.techniques, vec!["rear naked choke".to_string()]);
        assert_eq!(x.outcomes.len(), 2);
        assert_eq!(x.skills[0], "rear-naked-choke");
    }

    #[test]
    fn test_classify_loss_before_win() {
        assert_eq!(classify("got passed and then passed back"), Some(Outcome::Loss));
        assert_eq!(classify("escaped side control"), Some(Outcome::Win));
        assert_eq!(classify("drilled side control"), None);
    }

    #[tokio::test]
    async fn test_port_extract() {
        let e = entry("Landed a kimura from side control.", vec![]);
        let port: &dyn ExtractionPort = &KeywordExtractor::new();
        let x = port.extract(&e).await.unwrap();
        assert_eq!(x.source, ExtractionSource::Keyword);
        assert_eq!(x.skills, vec!["kimura".to_string(), "knee-slice".to_string()]);
    }
}
