//! Progress Domain Ports

use async_trait::async_trait;

use core_kernel::{
    AnnotationId, CheckoffId, DomainPort, EvidenceId, HealthCheckable, PortError, UserId,
};

use crate::annotation::Annotation;
use crate::checkoff::Checkoff;
use crate::evidence::Evidence;
use crate::views::ProgressReport;

/// Storage port for the progress domain
#[async_trait]
pub trait ProgressPort: DomainPort + HealthCheckable {
    // ========================================================================
    // Checkoffs
    // ========================================================================

    /// Create-once per (athlete, skill); `PortError::Conflict` otherwise
    async fn create_checkoff(&self, checkoff: &Checkoff) -> Result<(), PortError>;

    async fn save_checkoff(&self, checkoff: &Checkoff) -> Result<(), PortError>;

    async fn get_checkoff(&self, athlete: &UserId, id: CheckoffId) -> Result<Checkoff, PortError>;

    async fn list_checkoffs(&self, athlete: &UserId) -> Result<Vec<Checkoff>, PortError>;

    // ========================================================================
    // Evidence
    // ========================================================================

    async fn save_evidence(&self, evidence: &Evidence) -> Result<(), PortError>;

    async fn get_evidence(
        &self,
        athlete: &UserId,
        checkoff: CheckoffId,
        id: EvidenceId,
    ) -> Result<Evidence, PortError>;

    /// All evidence of one checkoff, oldest first
    async fn list_evidence_for(&self, athlete: &UserId, checkoff: CheckoffId) -> Result<Vec<Evidence>, PortError>;

    /// All evidence of the athlete, oldest first
    async fn list_evidence(&self, athlete: &UserId) -> Result<Vec<Evidence>, PortError>;

    async fn delete_evidence(&self, athlete: &UserId, checkoff: CheckoffId, id: EvidenceId) -> Result<(), PortError>;

    // ========================================================================
    // Annotations
    // ========================================================================

    async fn save_annotation(&self, annotation: &Annotation) -> Result<(), PortError>;

    async fn get_annotation(&self, athlete: &UserId, id: AnnotationId) -> Result<Annotation, PortError>;

    /// Ordered by date, then creation
    async fn list_annotations(&self, athlete: &UserId) -> Result<Vec<Annotation>, PortError>;

    async fn delete_annotation(&self, athlete: &UserId, id: AnnotationId) -> Result<(), PortError>;

    // ========================================================================
    // Stored report
    // ========================================================================

    async fn save_report(&self, report: &ProgressReport) -> Result<(), PortError>;

    async fn get_report(&self, athlete: &UserId) -> Result<Option<ProgressReport>, PortError>;
}
