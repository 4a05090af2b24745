//! Progress views
//!
//! The report is a pure function of an athlete's entries, checkoffs,
//! evidence and annotations. Stored reports are always built with the
//! default filter; filtered reports are computed on read.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

use core_kernel::temporal::{check_range, in_range};
use core_kernel::{CheckoffId, Granularity, Timezone, UserId};
use domain_journal::vocabulary::{canonical_position, normalize_position};
use domain_journal::{Entry, Outcome, SessionType};

use crate::annotation::Annotation;
use crate::checkoff::{skill_slug, Checkoff, CheckoffStatus};
use crate::error::ProgressError;
use crate::evidence::{Evidence, EvidenceStatus};

/// Restricts which records a report covers
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressFilter {
    #[serde(default)]
    pub from: Option<NaiveDate>,
    #[serde(default)]
    pub to: Option<NaiveDate>,
    /// Skill slug
    #[serde(default)]
    pub skill: Option<String>,
    /// Canonical position
    #[serde(default)]
    pub position: Option<String>,
    #[serde(default)]
    pub session_type: Option<SessionType>,
    #[serde(default)]
    pub granularity: Granularity,
}

impl ProgressFilter {
    /// Validates the range and canonicalises skill and position
    pub fn normalize(mut self) -> Result<Self, ProgressError> {
        check_range(self.from, self.to)?;
        self.skill = self.skill.map(|s| skill_slug(&s)).filter(|s| !s.is_empty());
        self.position = self
            .position
            .map(|p| normalize_position(&p))
            .filter(|p| !p.is_empty());
        Ok(self)
    }

    /// True for the filter the stored report is built with
    pub fn is_unfiltered(&self) -> bool {
        *self == ProgressFilter::default()
    }

    fn selects_entry(&self, entry: &Entry) -> bool {
        in_range(entry.session_date, self.from, self.to)
            && self.session_type.map_or(true, |t| t == entry.session_type)
            && self
                .position
                .as_ref()
                .map_or(true, |p| entry.positions().contains(p))
            && self.skill.as_ref().map_or(true, |s| entry.skills().contains(s))
    }

    fn keeps_checkoff(&self, checkoff: &Checkoff) -> bool {
        self.skill.as_ref().map_or(true, |s| *s == checkoff.skill)
    }

    fn keeps_annotation(&self, annotation: &Annotation) -> bool {
        if !in_range(annotation.date, self.from, self.to) {
            return false;
        }
        if self.skill.is_none() && self.position.is_none() {
            return true;
        }
        let skill_hit = self.skill.is_some() && annotation.skill == self.skill;
        let position_hit = self.position.is_some() && annotation.position == self.position;
        skill_hit || position_hit
    }
}

/// Everything a report is built from
#[derive(Debug, Clone, Copy)]
pub struct ReportInputs<'a> {
    pub entries: &'a [Entry],
    pub checkoffs: &'a [Checkoff],
    pub evidence: &'a [Evidence],
    pub annotations: &'a [Annotation],
    /// Calendar used to date evidence reviews and status changes
    pub timezone: Timezone,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoffCounts {
    pub pending: usize,
    pub earned: usize,
    pub superseded: usize,
    pub revalidated: usize,
}

impl CheckoffCounts {
    fn add(&mut self, status: CheckoffStatus) {
        match status {
            CheckoffStatus::Pending => self.pending += 1,
            CheckoffStatus::Earned => self.earned += 1,
            CheckoffStatus::Superseded => self.superseded += 1,
            CheckoffStatus::Revalidated => self.revalidated += 1,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub entries: usize,
    pub minutes: u64,
    pub rounds: u64,
    pub wins: u64,
    pub losses: u64,
    pub draws: u64,
    /// Wins over decided and drawn outcomes; none without outcomes
    pub win_rate: Option<f64>,
    pub checkoffs: CheckoffCounts,
}

/// Timeline event kinds, in display order for a single day
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimelineKind {
    EntryLogged,
    EvidenceConfirmed,
    CheckoffStatus,
    Annotation,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimelineEvent {
    pub date: NaiveDate,
    pub kind: TimelineKind,
    /// Display id of the entry, evidence, checkoff or annotation
    pub reference: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skill: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<CheckoffStatus>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeatmapCell {
    pub position: String,
    pub wins: u64,
    pub losses: u64,
    pub draws: u64,
    pub total: u64,
    pub win_rate: Option<f64>,
    /// `total / max_total` over all cells, in 0..=1
    pub intensity: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendPoint {
    pub bucket_start: NaiveDate,
    pub entries: usize,
    pub minutes: u64,
    pub rounds: u64,
    pub wins: u64,
    pub losses: u64,
    pub draws: u64,
    pub win_rate: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressReport {
    pub athlete_id: UserId,
    pub generated_at: DateTime<Utc>,
    pub filter: ProgressFilter,
    pub summary: Summary,
    pub timeline: Vec<TimelineEvent>,
    pub heatmap: Vec<HeatmapCell>,
    pub trends: Vec<TrendPoint>,
}

#[derive(Debug, Clone, Copy, Default)]
struct Tally {
    wins: u64,
    losses: u64,
    draws: u64,
}

impl Tally {
    fn add(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::Win => self.wins += 1,
            Outcome::Loss => self.losses += 1,
            Outcome::Draw => self.draws += 1,
        }
    }

    fn total(&self) -> u64 {
        self.wins + self.losses + self.draws
    }

    fn win_rate(&self) -> Option<f64> {
        match self.total() {
            0 => None,
            total => Some(self.wins as f64 / total as f64),
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
struct Bucket {
    entries: usize,
    minutes: u64,
    rounds: u64,
    tally: Tally,
}

/// Builds the progress views report
///
/// # Errors
///
/// Fails for an inverted date range, or when trend buckets leave the
/// supported calendar.
pub fn build_report(
    athlete_id: &UserId,
    inputs: ReportInputs<'_>,
    filter: &ProgressFilter,
    now: DateTime<Utc>,
) -> Result<ProgressReport, ProgressError> {
    check_range(filter.from, filter.to)?;

    let mut summary = Summary::default();
    let mut totals = Tally::default();
    let mut cells: BTreeMap<String, Tally> = BTreeMap::new();
    let mut buckets: BTreeMap<NaiveDate, Bucket> = BTreeMap::new();
    let mut timeline: Vec<TimelineEvent> = Vec::new();

    for entry in inputs.entries.iter().filter(|e| filter.selects_entry(e)) {
        let minutes = u64::from(entry.metrics.duration_minutes.unwrap_or(0));
        let rounds = u64::from(entry.metrics.rounds.unwrap_or(entry.rounds.len() as u32));

        let bucket = buckets
            .entry(filter.granularity.bucket_start(entry.session_date))
            .or_default();
        bucket.entries += 1;
        bucket.minutes += minutes;
        bucket.rounds += rounds;

        summary.entries += 1;
        summary.minutes += minutes;
        summary.rounds += rounds;

        for record in entry.outcome_records() {
            totals.add(record.outcome);
            bucket.tally.add(record.outcome);
            // free-text positions count toward the totals but get no cell
            if let Some(position) = canonical_position(&record.position) {
                cells.entry(position.to_string()).or_default().add(record.outcome);
            }
        }

        timeline.push(TimelineEvent {
            date: entry.session_date,
            kind: TimelineKind::EntryLogged,
            reference: entry.id.to_string(),
            title: format!("{} session", entry.session_type),
            skill: None,
            position: None,
            status: None,
        });
    }

    let checkoffs: HashMap<CheckoffId, &Checkoff> = inputs
        .checkoffs
        .iter()
        .filter(|c| filter.keeps_checkoff(c))
        .map(|c| (c.id, c))
        .collect();

    for checkoff in checkoffs.values() {
        summary.checkoffs.add(checkoff.status);
        for change in &checkoff.history {
            let date = inputs.timezone.date_of(change.at);
            if !in_range(date, filter.from, filter.to) {
                continue;
            }
            timeline.push(TimelineEvent {
                date,
                kind: TimelineKind::CheckoffStatus,
                reference: checkoff.id.to_string(),
                title: format!("{} {}", checkoff.label, change.to),
                skill: Some(checkoff.skill.clone()),
                position: None,
                status: Some(change.to),
            });
        }
    }

    for evidence in inputs
        .evidence
        .iter()
        .filter(|e| e.status == EvidenceStatus::Confirmed)
    {
        let (Some(checkoff), Some(reviewed_at)) = (checkoffs.get(&evidence.checkoff_id), evidence.reviewed_at) else {
            continue;
        };
        let date = inputs.timezone.date_of(reviewed_at);
        if !in_range(date, filter.from, filter.to) {
            continue;
        }
        timeline.push(TimelineEvent {
            date,
            kind: TimelineKind::EvidenceConfirmed,
            reference: evidence.id.to_string(),
            title: format!("Evidence confirmed for {}", checkoff.label),
            skill: Some(checkoff.skill.clone()),
            position: None,
            status: None,
        });
    }

    for annotation in inputs.annotations.iter().filter(|a| filter.keeps_annotation(a)) {
        timeline.push(TimelineEvent {
            date: annotation.date,
            kind: TimelineKind::Annotation,
            reference: annotation.id.to_string(),
            title: annotation.body.clone(),
            skill: annotation.skill.clone(),
            position: annotation.position.clone(),
            status: None,
        });
    }

    timeline.sort_by(|a, b| {
        a.date
            .cmp(&b.date)
            .then(a.kind.cmp(&b.kind))
            .then_with(|| a.reference.cmp(&b.reference))
    });

    summary.wins = totals.wins;
    summary.losses = totals.losses;
    summary.draws = totals.draws;
    summary.win_rate = totals.win_rate();

    Ok(ProgressReport {
        athlete_id: athlete_id.clone(),
        generated_at: now,
        filter: filter.clone(),
        summary,
        timeline,
        heatmap: heatmap(cells),
        trends: trends(&buckets, filter.granularity)?,
    })
}

fn heatmap(cells: BTreeMap<String, Tally>) -> Vec<HeatmapCell> {
    let max_total = cells.values().map(Tally::total).max().unwrap_or(0);
    let mut heatmap: Vec<HeatmapCell> = cells
        .into_iter()
        .map(|(position, tally)| HeatmapCell {
            position,
            wins: tally.wins,
            losses: tally.losses,
            draws: tally.draws,
            total: tally.total(),
            win_rate: tally.win_rate(),
            intensity: if max_total == 0 {
                0.0
            } else {
                tally.total() as f64 / max_total as f64
            },
        })
        .collect();
    heatmap.sort_by(|a, b| b.total.cmp(&a.total).then_with(|| a.position.cmp(&b.position)));
    heatmap
}

/// Zero-filled buckets from the first to the last populated bucket
fn trends(
    buckets: &BTreeMap<NaiveDate, Bucket>,
    granularity: Granularity,
) -> Result<Vec<TrendPoint>, ProgressError> {
    let (Some(first), Some(last)) = (buckets.keys().next(), buckets.keys().next_back()) else {
        return Ok(Vec::new());
    };

    let mut points = Vec::new();
    let mut start = *first;
    while start <= *last {
        let bucket = buckets.get(&start).copied().unwrap_or_default();
        points.push(TrendPoint {
            bucket_start: start,
            entries: bucket.entries,
            minutes: bucket.minutes,
            rounds: bucket.rounds,
            wins: bucket.tally.wins,
            losses: bucket.tally.losses,
            draws: bucket.tally.draws,
            win_rate: bucket.tally.win_rate(),
        });
        start = granularity.next_bucket(start)?;
    }
    Ok(points)
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_kernel::{Principal, Role};
    use crate::annotation::AnnotationDraft;
    use domain_journal::{EntryDraft, RoundLog};

    fn day(m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, m, d).unwrap()
    }

    fn athlete() -> UserId {
        UserId::new("a1").unwrap()
    }

    fn round(position: &str, outcome: Outcome) -> RoundLog {
        RoundLog {
            partner_id: None,
            position: position.to_string(),
            outcome,
            submission: None,
        }
    }

    fn entry(date: NaiveDate, session_type: SessionType, minutes: u32, rounds: Vec<RoundLog>) -> Entry {
        let mut draft = EntryDraft {
            session_date: Some(date),
            session_type,
            shared_notes: "training".into(),
            rounds,
            ..Default::default()
        };
        draft.metrics.duration_minutes = Some(minutes);
        Entry::new(athlete(), draft, day(12, 31), Utc::now()).unwrap()
    }

    fn annotation_draft(date: NaiveDate, position: Option<&str>) -> AnnotationDraft {
        AnnotationDraft {
            date: Some(date),
            skill: None,
            position: position.map(str::to_string),
            body: "worth a look".into(),
        }
    }

    fn inputs<'a>(entries: &'a [Entry], annotations: &'a [Annotation]) -> ReportInputs<'a> {
        ReportInputs {
            entries,
            checkoffs: &[],
            evidence: &[],
            annotations,
            timezone: Timezone::default(),
        }
    }

    #[test]
    fn test_summary_and_heatmap() {
        let entries = vec![
            entry(day(3, 4), SessionType::Gi, 60, vec![
                round("mount", Outcome::Win),
                round("mount", Outcome::Win),
                round("half guard", Outcome::Loss),
            ]),
            entry(day(3, 6), SessionType::Nogi, 90, vec![round("half guard", Outcome::Draw)]),
        ];
        let report = build_report(&athlete(), inputs(&entries, &[]), &ProgressFilter::default(), Utc::now()).unwrap();

        assert_eq!(report.summary.entries, 2);
        assert_eq!(report.summary.minutes, 150);
        assert_eq!(report.summary.rounds, 4);
        assert_eq!((report.summary.wins, report.summary.losses, report.summary.draws), (2, 1, 1));
        assert_eq!(report.summary.win_rate, Some(0.5));

        // equal totals fall back to position order
        assert_eq!(report.heatmap[0].position, "half guard");
        assert_eq!(report.heatmap[1].position, "mount");
        assert_eq!(report.heatmap[1].intensity, 1.0);
        assert_eq!(report.heatmap[1].win_rate, Some(1.0));
    }

    #[test]
    fn test_heatmap_only_has_canonical_positions() {
        let entries = vec![entry(day(3, 4), SessionType::Gi, 60, vec![
            round("crucifix top", Outcome::Win),
            round("mount", Outcome::Loss),
        ])];
        let report = build_report(&athlete(), inputs(&entries, &[]), &ProgressFilter::default(), Utc::now()).unwrap();

        assert_eq!((report.summary.wins, report.summary.losses), (1, 1));
        assert_eq!(report.heatmap.len(), 1);
        assert_eq!(report.heatmap[0].position, "mount");
        assert_eq!(report.heatmap[0].total, 1);
    }

    #[test]
    fn test_no_rounds_means_no_win_rate() {
        let entries = vec![entry(day(3, 4), SessionType::Drilling, 45, vec![])];
        let report = build_report(&athlete(), inputs(&entries, &[]), &ProgressFilter::default(), Utc::now()).unwrap();
        assert_eq!(report.summary.win_rate, None);
        assert!(report.heatmap.is_empty());
    }

    #[test]
    fn test_trends_are_zero_filled() {
        let entries = vec![
            entry(day(1, 3), SessionType::Gi, 60, vec![round("mount", Outcome::Win)]),
            entry(day(1, 24), SessionType::Gi, 60, vec![]),
        ];
        let report = build_report(&athlete(), inputs(&entries, &[]), &ProgressFilter::default(), Utc::now()).unwrap();
        let starts: Vec<NaiveDate> = report.trends.iter().map(|t| t.bucket_start).collect();
        assert_eq!(starts, vec![day(1, 1), day(1, 8), day(1, 15), day(1, 22)]);
        assert_eq!(report.trends[1].entries, 0);
        assert_eq!(report.trends[1].win_rate, None);
        assert_eq!(report.trends[0].win_rate, Some(1.0));

        let monthly = ProgressFilter { granularity: Granularity::Month, ..Default::default() };
        let report = build_report(&athlete(), inputs(&entries, &[]), &monthly, Utc::now()).unwrap();
        assert_eq!(report.trends.len(), 1);
        assert_eq!(report.trends[0].entries, 2);
    }

    #[test]
    fn test_filters_select_entries_and_annotations() {
        let entries = vec![
            entry(day(2, 1), SessionType::Gi, 60, vec![round("mount", Outcome::Win)]),
            entry(day(2, 2), SessionType::Nogi, 60, vec![round("turtle", Outcome::Loss)]),
            entry(day(2, 20), SessionType::Gi, 60, vec![round("turtle", Outcome::Win)]),
        ];
        let coach = Principal::new(UserId::new("coach-1").unwrap(), vec![Role::Coach]);
        let annotations = vec![
            Annotation::new(athlete(), &coach, annotation_draft(day(2, 2), Some("turtle")), day(2, 2), Utc::now()).unwrap(),
            Annotation::new(athlete(), &coach, annotation_draft(day(2, 3), None), day(2, 3), Utc::now()).unwrap(),
        ];

        let filter = ProgressFilter {
            to: Some(day(2, 10)),
            position: Some("Turtle".into()),
            ..Default::default()
        }
        .normalize()
        .unwrap();
        let report = build_report(&athlete(), inputs(&entries, &annotations), &filter, Utc::now()).unwrap();
        assert_eq!(report.summary.entries, 1);
        assert_eq!(report.summary.losses, 1);

        let kinds: Vec<TimelineKind> = report.timeline.iter().map(|e| e.kind).collect();
        assert_eq!(kinds, vec![TimelineKind::EntryLogged, TimelineKind::Annotation]);

        let gi_only = ProgressFilter { session_type: Some(SessionType::Gi), ..Default::default() };
        let report = build_report(&athlete(), inputs(&entries, &annotations), &gi_only, Utc::now()).unwrap();
        assert_eq!(report.summary.entries, 2);
        assert_eq!(report.timeline.len(), 4);
    }

    #[test]
    fn test_inverted_range_rejected() {
        let filter = ProgressFilter { from: Some(day(3, 2)), to: Some(day(3, 1)), ..Default::default() };
        assert!(filter.clone().normalize().is_err());
        assert!(build_report(&athlete(), inputs(&[], &[]), &filter, Utc::now()).is_err());
    }

    #[test]
    fn test_default_filter_is_unfiltered() {
        assert!(ProgressFilter::default().is_unfiltered());
        assert!(!ProgressFilter { granularity: Granularity::Month, ..Default::default() }.is_unfiltered());
    }
}
