//! Progress repository

use async_trait::async_trait;
use serde_json::json;
use std::sync::Arc;
use tracing::{debug, instrument};

use core_kernel::{
    AnnotationId, CheckoffId, DomainPort, EvidenceId, HealthCheckResult, HealthCheckable,
    PortError, UserId,
};
use domain_progress::{Annotation, Checkoff, Evidence, ProgressPort, ProgressReport};

use crate::item::Item;
use crate::keys::{self, entity};
use crate::store::KeyValueStore;

use super::{check_store, decode_all, decode_one};

/// `ProgressPort` over any [`KeyValueStore`]
#[derive(Clone)]
pub struct ProgressRepository {
    store: Arc<dyn KeyValueStore>,
}

impl ProgressRepository {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }
}

impl std::fmt::Debug for ProgressRepository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProgressRepository")
            .field("backend", &self.store.backend())
            .finish()
    }
}

impl DomainPort for ProgressRepository {}

#[async_trait]
impl HealthCheckable for ProgressRepository {
    async fn health_check(&self) -> HealthCheckResult {
        check_store(self.store.as_ref(), "progress-store").await
    }
}

fn sort_evidence(evidence: &mut [Evidence]) {
    evidence.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
}

#[async_trait]
impl ProgressPort for ProgressRepository {
    // ========================================================================
    // Checkoffs
    // ========================================================================

    /// Claims the skill guard first so two checkoffs never share a skill
    #[instrument(skip(self, checkoff), fields(athlete_id = %checkoff.athlete_id, skill = %checkoff.skill))]
    async fn create_checkoff(&self, checkoff: &Checkoff) -> Result<(), PortError> {
        let pk = keys::athlete_pk(&checkoff.athlete_id);
        let guard = Item::encode(
            pk.clone(),
            keys::checkoff_skill_sk(&checkoff.skill),
            entity::GUARD,
            &json!({ "checkoff_id": checkoff.id }),
        )?;
        self.store.put_if_absent(guard).await.map_err(|e| {
            if e.is_already_exists() {
                PortError::conflict(format!("a checkoff for skill '{}' already exists", checkoff.skill))
            } else {
                e.into()
            }
        })?;

        let item = Item::encode(pk, keys::checkoff_sk(checkoff.id), entity::CHECKOFF, checkoff)?;
        self.store.put(item).await?;
        Ok(())
    }

    #[instrument(skip(self, checkoff), fields(checkoff_id = %checkoff.id, status = %checkoff.status))]
    async fn save_checkoff(&self, checkoff: &Checkoff) -> Result<(), PortError> {
        let item = Item::encode(
            keys::athlete_pk(&checkoff.athlete_id),
            keys::checkoff_sk(checkoff.id),
            entity::CHECKOFF,
            checkoff,
        )?;
        self.store.put(item).await?;
        Ok(())
    }

    #[instrument(skip(self), fields(athlete_id = %athlete, checkoff_id = %id))]
    async fn get_checkoff(&self, athlete: &UserId, id: CheckoffId) -> Result<Checkoff, PortError> {
        let item = self.store.get(&keys::athlete_pk(athlete), &keys::checkoff_sk(id)).await?;
        decode_one(item, "Checkoff", id)
    }

    /// Ordered by skill
    #[instrument(skip(self), fields(athlete_id = %athlete))]
    async fn list_checkoffs(&self, athlete: &UserId) -> Result<Vec<Checkoff>, PortError> {
        let items = self.store.query(&keys::athlete_pk(athlete), keys::CHECKOFF_PREFIX).await?;
        let mut checkoffs: Vec<Checkoff> = decode_all(items)?;
        checkoffs.sort_by(|a, b| a.skill.cmp(&b.skill));
        Ok(checkoffs)
    }

    // ========================================================================
    // Evidence
    // ========================================================================

    #[instrument(skip(self, evidence), fields(checkoff_id = %evidence.checkoff_id, evidence_id = %evidence.id))]
    async fn save_evidence(&self, evidence: &Evidence) -> Result<(), PortError> {
        let item = Item::encode(
            keys::athlete_pk(&evidence.athlete_id),
            keys::evidence_sk(evidence.checkoff_id, evidence.id),
            entity::EVIDENCE,
            evidence,
        )?;
        self.store.put(item).await?;
        Ok(())
    }

    #[instrument(skip(self), fields(athlete_id = %athlete, evidence_id = %id))]
    async fn get_evidence(
        &self,
        athlete: &UserId,
        checkoff: CheckoffId,
        id: EvidenceId,
    ) -> Result<Evidence, PortError> {
        let item = self
            .store
            .get(&keys::athlete_pk(athlete), &keys::evidence_sk(checkoff, id))
            .await?;
        decode_one(item, "Evidence", id)
    }

    #[instrument(skip(self), fields(athlete_id = %athlete, checkoff_id = %checkoff))]
    async fn list_evidence_for(&self, athlete: &UserId, checkoff: CheckoffId) -> Result<Vec<Evidence>, PortError> {
        let items = self
            .store
            .query(&keys::athlete_pk(athlete), &keys::evidence_prefix(checkoff))
            .await?;
        let mut evidence: Vec<Evidence> = decode_all(items)?;
        sort_evidence(&mut evidence);
        Ok(evidence)
    }

    #[instrument(skip(self), fields(athlete_id = %athlete))]
    async fn list_evidence(&self, athlete: &UserId) -> Result<Vec<Evidence>, PortError> {
        let items = self.store.query(&keys::athlete_pk(athlete), keys::EVIDENCE_PREFIX).await?;
        let mut evidence: Vec<Evidence> = decode_all(items)?;
        sort_evidence(&mut evidence);
        debug!(count = evidence.len(), "Listed evidence");
        Ok(evidence)
    }

    #[instrument(skip(self), fields(athlete_id = %athlete, evidence_id = %id))]
    async fn delete_evidence(&self, athlete: &UserId, checkoff: CheckoffId, id: EvidenceId) -> Result<(), PortError> {
        if self
            .store
            .delete(&keys::athlete_pk(athlete), &keys::evidence_sk(checkoff, id))
            .await?
        {
            Ok(())
        } else {
            Err(PortError::not_found("Evidence", id))
        }
    }

    // ========================================================================
    // Annotations
    // ========================================================================

    #[instrument(skip(self, annotation), fields(annotation_id = %annotation.id))]
    async fn save_annotation(&self, annotation: &Annotation) -> Result<(), PortError> {
        let item = Item::encode(
            keys::athlete_pk(&annotation.athlete_id),
            keys::annotation_sk(annotation.id),
            entity::ANNOTATION,
            annotation,
        )?;
        self.store.put(item).await?;
        Ok(())
    }

    #[instrument(skip(self), fields(athlete_id = %athlete, annotation_id = %id))]
    async fn get_annotation(&self, athlete: &UserId, id: AnnotationId) -> Result<Annotation, PortError> {
        let item = self.store.get(&keys::athlete_pk(athlete), &keys::annotation_sk(id)).await?;
        decode_one(item, "Annotation", id)
    }

    #[instrument(skip(self), fields(athlete_id = %athlete))]
    async fn list_annotations(&self, athlete: &UserId) -> Result<Vec<Annotation>, PortError> {
        let items = self.store.query(&keys::athlete_pk(athlete), keys::ANNOTATION_PREFIX).await?;
        let mut annotations: Vec<Annotation> = decode_all(items)?;
        annotations.sort_by(|a, b| a.date.cmp(&b.date).then(a.created_at.cmp(&b.created_at)));
        Ok(annotations)
    }

    #[instrument(skip(self), fields(athlete_id = %athlete, annotation_id = %id))]
    async fn delete_annotation(&self, athlete: &UserId, id: AnnotationId) -> Result<(), PortError> {
        if self
            .store
            .delete(&keys::athlete_pk(athlete), &keys::annotation_sk(id))
            .await?
        {
            Ok(())
        } else {
            Err(PortError::not_found("Annotation", id))
        }
    }

    // ========================================================================
    // Stored report
    // ========================================================================

    #[instrument(skip(self, report), fields(athlete_id = %report.athlete_id))]
    async fn save_report(&self, report: &ProgressReport) -> Result<(), PortError> {
        let item = Item::encode(
            keys::athlete_pk(&report.athlete_id),
            keys::REPORT_SK,
            entity::REPORT,
            report,
        )?;
        self.store.put(item).await?;
        Ok(())
    }

    #[instrument(skip(self), fields(athlete_id = %athlete))]
    async fn get_report(&self, athlete: &UserId) -> Result<Option<ProgressReport>, PortError> {
        let item = self.store.get(&keys::athlete_pk(athlete), keys::REPORT_SK).await?;
        item.map(|i| i.decode::<ProgressReport>())
            .transpose()
            .map_err(PortError::from)
    }
}
