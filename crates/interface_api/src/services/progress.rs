//! Progress service: checkoffs, evidence review, annotations and reports
//!
//! Every write that changes what a report is built from rebuilds and stores
//! the athlete's unfiltered report before returning.

use chrono::Utc;
use serde::Serialize;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, info, instrument};

use core_kernel::{AnnotationId, CheckoffId, EntryId, EvidenceId, Principal, Timezone, UserId};
use domain_journal::{Entry, JournalPort};
use domain_progress::{
    build_report, Annotation, AnnotationDraft, Checkoff, Evidence, ProgressFilter, ProgressPort,
    ProgressReport, ReportInputs, ReviewDecision,
};

use crate::error::ApiError;

/// A checkoff with all of its evidence
#[derive(Debug, Clone, Serialize)]
pub struct CheckoffDetail {
    #[serde(flatten)]
    pub checkoff: Checkoff,
    pub evidence: Vec<Evidence>,
}

/// Result of a review: the evidence and the re-merged checkoff
#[derive(Debug, Clone, Serialize)]
pub struct ReviewOutcome {
    pub evidence: Evidence,
    pub checkoff: Checkoff,
}

#[derive(Clone)]
pub struct ProgressService {
    journal: Arc<dyn JournalPort>,
    progress: Arc<dyn ProgressPort>,
    timezone: Timezone,
    default_threshold: u32,
}

impl ProgressService {
    pub fn new(
        journal: Arc<dyn JournalPort>,
        progress: Arc<dyn ProgressPort>,
        timezone: Timezone,
        default_threshold: u32,
    ) -> Self {
        Self {
            journal,
            progress,
            timezone,
            default_threshold,
        }
    }

    pub fn port(&self) -> &dyn ProgressPort {
        self.progress.as_ref()
    }

    // ========================================================================
    // Reports
    // ========================================================================

    /// Rebuilds and stores the unfiltered report
    #[instrument(skip(self), fields(athlete_id = %athlete))]
    pub async fn refresh(&self, athlete: &UserId) -> Result<ProgressReport, ApiError> {
        let report = self.build(athlete, &ProgressFilter::default()).await?;
        self.progress.save_report(&report).await?;
        debug!(timeline = report.timeline.len(), "Stored progress report");
        Ok(report)
    }

    /// The stored report for an unfiltered read, otherwise a fresh one
    pub async fn report(&self, athlete: &UserId, filter: ProgressFilter) -> Result<ProgressReport, ApiError> {
        let filter = filter.normalize()?;
        if filter.is_unfiltered() {
            if let Some(report) = self.progress.get_report(athlete).await? {
                return Ok(report);
            }
            return self.refresh(athlete).await;
        }
        self.build(athlete, &filter).await
    }

    async fn build(&self, athlete: &UserId, filter: &ProgressFilter) -> Result<ProgressReport, ApiError> {
        let entries = self.journal.list_entries(athlete).await?;
        let checkoffs = self.progress.list_checkoffs(athlete).await?;
        let evidence = self.progress.list_evidence(athlete).await?;
        let annotations = self.progress.list_annotations(athlete).await?;
        let inputs = ReportInputs {
            entries: &entries,
            checkoffs: &checkoffs,
            evidence: &evidence,
            annotations: &annotations,
            timezone: self.timezone,
        };
        Ok(build_report(athlete, inputs, filter, Utc::now())?)
    }

    // ========================================================================
    // Checkoffs
    // ========================================================================

    #[instrument(skip(self, label), fields(athlete_id = %athlete))]
    pub async fn create_checkoff(
        &self,
        athlete: &UserId,
        skill: &str,
        label: Option<&str>,
        threshold: Option<u32>,
    ) -> Result<Checkoff, ApiError> {
        let checkoff = Checkoff::new(
            athlete.clone(),
            skill,
            label,
            threshold.unwrap_or(self.default_threshold),
            Utc::now(),
        )?;
        self.progress.create_checkoff(&checkoff).await?;
        self.refresh(athlete).await?;
        info!(checkoff_id = %checkoff.id, skill = %checkoff.skill, "Checkoff created");
        Ok(checkoff)
    }

    pub async fn list_checkoffs(&self, athlete: &UserId) -> Result<Vec<Checkoff>, ApiError> {
        Ok(self.progress.list_checkoffs(athlete).await?)
    }

    pub async fn checkoff_detail(&self, athlete: &UserId, id: CheckoffId) -> Result<CheckoffDetail, ApiError> {
        let checkoff = self.progress.get_checkoff(athlete, id).await?;
        let evidence = self.progress.list_evidence_for(athlete, id).await?;
        Ok(CheckoffDetail { checkoff, evidence })
    }

    /// Recounts a checkoff's confirmed evidence and stores it
    async fn remerge(&self, athlete: &UserId, id: CheckoffId) -> Result<Checkoff, ApiError> {
        let mut checkoff = self.progress.get_checkoff(athlete, id).await?;
        let evidence = self.progress.list_evidence_for(athlete, id).await?;
        checkoff.merge(&evidence, Utc::now());
        self.progress.save_checkoff(&checkoff).await?;
        Ok(checkoff)
    }

    // ========================================================================
    // Evidence
    // ========================================================================

    /// Manual evidence; a referenced entry must exist
    #[instrument(skip(self, note, submitter), fields(athlete_id = %athlete, checkoff_id = %checkoff_id))]
    pub async fn submit_evidence(
        &self,
        athlete: &UserId,
        checkoff_id: CheckoffId,
        entry_id: Option<EntryId>,
        note: &str,
        submitter: &Principal,
    ) -> Result<Evidence, ApiError> {
        let checkoff = self.progress.get_checkoff(athlete, checkoff_id).await?;
        if let Some(entry_id) = entry_id {
            self.journal.get_entry(athlete, entry_id).await?;
        }
        let evidence = Evidence::submit(&checkoff, entry_id, note, submitter, Utc::now())?;
        self.progress.save_evidence(&evidence).await?;
        self.refresh(athlete).await?;
        Ok(evidence)
    }

    /// Applies a decision and re-merges the checkoff
    #[instrument(skip(self, reviewer), fields(athlete_id = %athlete, evidence_id = %evidence_id))]
    pub async fn review_evidence(
        &self,
        athlete: &UserId,
        checkoff_id: CheckoffId,
        evidence_id: EvidenceId,
        decision: ReviewDecision,
        reviewer: &Principal,
    ) -> Result<ReviewOutcome, ApiError> {
        let mut evidence = self.progress.get_evidence(athlete, checkoff_id, evidence_id).await?;
        evidence.review(decision, reviewer, Utc::now())?;
        self.progress.save_evidence(&evidence).await?;

        let checkoff = self.remerge(athlete, checkoff_id).await?;
        self.refresh(athlete).await?;
        info!(status = %evidence.status, checkoff_status = %checkoff.status, "Evidence reviewed");
        Ok(ReviewOutcome { evidence, checkoff })
    }

    /// Proposes evidence for every checkoff whose skill the extraction saw
    /// performed successfully
    ///
    /// Techniques the athlete was caught in never count. At most one
    /// proposal exists per (checkoff, entry). The report is rebuilt either
    /// way.
    #[instrument(skip(self, entry), fields(athlete_id = %entry.athlete_id, entry_id = %entry.id))]
    pub async fn sync_entry(&self, entry: &Entry) -> Result<(), ApiError> {
        let athlete = &entry.athlete_id;
        let skills = entry.extracted_skills();
        let checkoffs = self.progress.list_checkoffs(athlete).await?;
        let existing = self.progress.list_evidence(athlete).await?;
        let proposed_for: HashSet<CheckoffId> = existing
            .iter()
            .filter(|e| e.entry_id == Some(entry.id))
            .map(|e| e.checkoff_id)
            .collect();

        let now = Utc::now();
        for checkoff in checkoffs
            .iter()
            .filter(|c| skills.contains(&c.skill) && !proposed_for.contains(&c.id))
        {
            let evidence = Evidence::proposed(checkoff, entry.id, entry.session_date, now);
            self.progress.save_evidence(&evidence).await?;
            debug!(checkoff_id = %checkoff.id, evidence_id = %evidence.id, "Proposed evidence");
        }

        self.refresh(athlete).await?;
        Ok(())
    }

    /// Drops an entry's evidence and re-merges the checkoffs it counted for
    #[instrument(skip(self), fields(athlete_id = %athlete, entry_id = %entry_id))]
    pub async fn forget_entry(&self, athlete: &UserId, entry_id: EntryId) -> Result<(), ApiError> {
        let mut affected: Vec<CheckoffId> = Vec::new();
        for evidence in self
            .progress
            .list_evidence(athlete)
            .await?
            .into_iter()
            .filter(|e| e.entry_id == Some(entry_id))
        {
            self.progress
                .delete_evidence(athlete, evidence.checkoff_id, evidence.id)
                .await?;
            if !affected.contains(&evidence.checkoff_id) {
                affected.push(evidence.checkoff_id);
            }
        }
        for checkoff_id in affected {
            self.remerge(athlete, checkoff_id).await?;
        }
        self.refresh(athlete).await?;
        Ok(())
    }

    // ========================================================================
    // Annotations
    // ========================================================================

    pub async fn create_annotation(
        &self,
        athlete: &UserId,
        author: &Principal,
        draft: AnnotationDraft,
    ) -> Result<Annotation, ApiError> {
        let annotation = Annotation::new(
            athlete.clone(),
            author,
            draft,
            self.timezone.today(),
            Utc::now(),
        )?;
        self.progress.save_annotation(&annotation).await?;
        self.refresh(athlete).await?;
        Ok(annotation)
    }

    pub async fn list_annotations(&self, athlete: &UserId) -> Result<Vec<Annotation>, ApiError> {
        Ok(self.progress.list_annotations(athlete).await?)
    }

    /// Author or admin only
    pub async fn delete_annotation(
        &self,
        athlete: &UserId,
        id: AnnotationId,
        principal: &Principal,
    ) -> Result<(), ApiError> {
        let annotation = self.progress.get_annotation(athlete, id).await?;
        if !annotation.can_be_deleted_by(principal) {
            return Err(ApiError::forbidden("only the author or an admin may delete an annotation"));
        }
        self.progress.delete_annotation(athlete, id).await?;
        self.refresh(athlete).await?;
        Ok(())
    }
}
