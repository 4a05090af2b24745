//! Action packs: structured feedback attached to an entry

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::entry::Outcome;
use crate::extraction::StructuredExtraction;
use crate::vocabulary::{canonical_technique, drills_for};

pub const MAX_DRILLS: usize = 3;

/// Wins, leaks, focus and drills for one session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionPack {
    pub wins: Vec<String>,
    pub leaks: Vec<String>,
    pub focus: Option<String>,
    pub drills: Vec<String>,
    pub generated_at: DateTime<Utc>,
}

impl ActionPack {
    /// Builds the pack from an extraction
    pub fn from_extraction(extraction: &StructuredExtraction, now: DateTime<Utc>) -> Self {
        let mut wins_by_position: BTreeMap<&str, usize> = BTreeMap::new();
        let mut losses_by_position: BTreeMap<&str, usize> = BTreeMap::new();
        for record in &extraction.outcomes {
            match record.outcome {
                Outcome::Win => *wins_by_position.entry(record.position.as_str()).or_default() += 1,
                Outcome::Loss => *losses_by_position.entry(record.position.as_str()).or_default() += 1,
                Outcome::Draw => {}
            }
        }

        let win_counts = ranked(&wins_by_position);
        let loss_counts = ranked(&losses_by_position);

        let mut wins: Vec<String> = win_counts
            .iter()
            .map(|(position, n)| format!("{} {} from {}", n, plural(*n, "win", "wins"), position))
            .collect();
        wins.extend(extraction.skills.iter().map(|skill| {
            let label = canonical_technique(skill)
                .map(str::to_string)
                .unwrap_or_else(|| skill.replace('-', " "));
            format!("Landed {}", label)
        }));

        let leaks: Vec<String> = loss_counts
            .iter()
            .map(|(position, n)| format!("{} {} from {}", n, plural(*n, "loss", "losses"), position))
            .collect();

        let focus = loss_counts.first().map(|(position, _)| position.to_string());

        let mut drills: Vec<String> = Vec::new();
        for (position, _) in &loss_counts {
            for drill in drills_for(position) {
                if drills.len() == MAX_DRILLS {
                    break;
                }
                if !drills.contains(&drill) {
                    drills.push(drill);
                }
            }
        }

        Self {
            wins,
            leaks,
            focus,
            drills,
            generated_at: now,
        }
    }
}

/// Counts ordered by count desc, then position name
fn ranked<'a>(counts: &BTreeMap<&'a str, usize>) -> Vec<(&'a str, usize)> {
    let mut ranked: Vec<(&str, usize)> = counts.iter().map(|(k, v)| (*k, *v)).collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(b.0)));
    ranked
}

fn plural(n: usize, one: &'static str, many: &'static str) -> &'static str {
    if n == 1 {
        one
    } else {
        many
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extraction::{ExtractedOutcome, ExtractionSource};

    fn outcome(position: &str, outcome: Outcome) -> ExtractedOutcome {
        ExtractedOutcome {
            position: position.to_string(),
            outcome,
        }
    }

    fn extraction(outcomes: Vec<ExtractedOutcome>, skills: Vec<&str>) -> StructuredExtraction {
        StructuredExtraction {
            positions: vec![],
            techniques: vec![],
            outcomes,
            skills: skills.into_iter().map(str::to_string).collect(),
            source: ExtractionSource::Keyword,
            extracted_at: Utc::now(),
        }
    }

    #[test]
    fn test_pack_orders_and_focuses_on_worst_leak() {
        let x = extraction(
            vec![
                outcome("mount", Outcome::Loss),
                outcome("half guard", Outcome::Loss),
                outcome("half guard", Outcome::Loss),
                outcome("closed guard", Outcome::Win),
                outcome("turtle", Outcome::Draw),
            ],
            vec!["rear-naked-choke"],
        );
        let pack = ActionPack::from_extraction(&x, Utc::now());

        assert_eq!(pack.wins, vec!["1 win from closed guard", "Landed rear naked choke"]);
        assert_eq!(pack.leaks, vec!["2 losses from half guard", "1 loss from mount"]);
        assert_eq!(pack.focus.as_deref(), Some("half guard"));
        assert_eq!(
            pack.drills,
            vec![
                "underhook recovery from bottom half",
                "knee shield frame drill",
                "elbow-knee mount escape reps",
            ]
        );
    }

    #[test]
    fn test_ties_break_alphabetically() {
        let x = extraction(
            vec![outcome("turtle", Outcome::Loss), outcome("mount", Outcome::Loss)],
            vec![],
        );
        let pack = ActionPack::from_extraction(&x, Utc::now());
        assert_eq!(pack.focus.as_deref(), Some("mount"));
    }

    #[test]
    fn test_no_losses_means_no_focus() {
        let pack = ActionPack::from_extraction(&extraction(vec![], vec![]), Utc::now());
        assert!(pack.focus.is_none());
        assert!(pack.drills.is_empty());
        assert!(pack.wins.is_empty());
    }
}
