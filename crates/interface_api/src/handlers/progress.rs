//! Checkoff, evidence, annotation and progress-report handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};

use core_kernel::{AnnotationId, CheckoffId, EvidenceId, Principal};
use domain_progress::{Annotation, Checkoff, Evidence, ProgressFilter, ProgressReport, ReviewDecision};

use crate::access::{require_reader, require_reviewer};
use crate::dto::progress::{
    AnnotationRequest, CheckoffRequest, EvidenceRequest, ProgressParams, ReviewRequest,
};
use crate::dto::{QueryParams, ValidatedJson};
use crate::services::{CheckoffDetail, ReviewOutcome};
use crate::{error::ApiError, AppState};

use super::{record_id, user_id};

// ============================================================================
// Checkoffs
// ============================================================================

pub async fn create_checkoff(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(athlete): Path<String>,
    ValidatedJson(request): ValidatedJson<CheckoffRequest>,
) -> Result<(StatusCode, Json<Checkoff>), ApiError> {
    let athlete = user_id(&athlete)?;
    require_reader(state.journal.port(), &principal, &athlete).await?;
    let checkoff = state
        .progress
        .create_checkoff(
            &athlete,
            &request.skill,
            request.label.as_deref(),
            request.evidence_threshold,
        )
        .await?;
    Ok((StatusCode::CREATED, Json(checkoff)))
}

pub async fn list_checkoffs(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(athlete): Path<String>,
) -> Result<Json<Vec<Checkoff>>, ApiError> {
    let athlete = user_id(&athlete)?;
    require_reader(state.journal.port(), &principal, &athlete).await?;
    Ok(Json(state.progress.list_checkoffs(&athlete).await?))
}

pub async fn get_checkoff(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path((athlete, checkoff)): Path<(String, String)>,
) -> Result<Json<CheckoffDetail>, ApiError> {
    let athlete = user_id(&athlete)?;
    require_reader(state.journal.port(), &principal, &athlete).await?;
    let detail = state
        .progress
        .checkoff_detail(&athlete, record_id::<CheckoffId>(&checkoff, "checkoff")?)
        .await?;
    Ok(Json(detail))
}

// ============================================================================
// Evidence
// ============================================================================

pub async fn submit_evidence(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path((athlete, checkoff)): Path<(String, String)>,
    ValidatedJson(request): ValidatedJson<EvidenceRequest>,
) -> Result<(StatusCode, Json<Evidence>), ApiError> {
    let athlete = user_id(&athlete)?;
    require_reader(state.journal.port(), &principal, &athlete).await?;
    let evidence = state
        .progress
        .submit_evidence(
            &athlete,
            record_id::<CheckoffId>(&checkoff, "checkoff")?,
            request.entry_id,
            &request.note,
            &principal,
        )
        .await?;
    Ok((StatusCode::CREATED, Json(evidence)))
}

pub async fn review_evidence(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path((athlete, checkoff, evidence)): Path<(String, String, String)>,
    ValidatedJson(request): ValidatedJson<ReviewRequest>,
) -> Result<Json<ReviewOutcome>, ApiError> {
    let athlete = user_id(&athlete)?;
    require_reviewer(state.journal.port(), &principal, &athlete).await?;
    let decision: ReviewDecision = request.decision.parse()?;
    let outcome = state
        .progress
        .review_evidence(
            &athlete,
            record_id::<CheckoffId>(&checkoff, "checkoff")?,
            record_id::<EvidenceId>(&evidence, "evidence")?,
            decision,
            &principal,
        )
        .await?;
    Ok(Json(outcome))
}

// ============================================================================
// Annotations
// ============================================================================

pub async fn create_annotation(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(athlete): Path<String>,
    ValidatedJson(request): ValidatedJson<AnnotationRequest>,
) -> Result<(StatusCode, Json<Annotation>), ApiError> {
    let athlete = user_id(&athlete)?;
    require_reader(state.journal.port(), &principal, &athlete).await?;
    let annotation = state
        .progress
        .create_annotation(&athlete, &principal, request.into())
        .await?;
    Ok((StatusCode::CREATED, Json(annotation)))
}

pub async fn list_annotations(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(athlete): Path<String>,
) -> Result<Json<Vec<Annotation>>, ApiError> {
    let athlete = user_id(&athlete)?;
    require_reader(state.journal.port(), &principal, &athlete).await?;
    Ok(Json(state.progress.list_annotations(&athlete).await?))
}

pub async fn delete_annotation(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path((athlete, annotation)): Path<(String, String)>,
) -> Result<StatusCode, ApiError> {
    let athlete = user_id(&athlete)?;
    require_reader(state.journal.port(), &principal, &athlete).await?;
    state
        .progress
        .delete_annotation(
            &athlete,
            record_id::<AnnotationId>(&annotation, "annotation")?,
            &principal,
        )
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

// ============================================================================
// Report
// ============================================================================

/// Stored report without a query string, fresh report with one
pub async fn progress_report(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(athlete): Path<String>,
    QueryParams(params): QueryParams<ProgressParams>,
) -> Result<Json<ProgressReport>, ApiError> {
    let athlete = user_id(&athlete)?;
    require_reader(state.journal.port(), &principal, &athlete).await?;
    let report = state
        .progress
        .report(&athlete, ProgressFilter::from(params))
        .await?;
    Ok(Json(report))
}
