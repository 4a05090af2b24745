//! Checkoff, evidence, annotation and report DTOs

use chrono::NaiveDate;
use serde::Deserialize;
use validator::Validate;

use core_kernel::{EntryId, Granularity};
use domain_journal::SessionType;
use domain_progress::{AnnotationDraft, ProgressFilter};

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CheckoffRequest {
    #[validate(length(min = 1, max = 80))]
    pub skill: String,
    #[validate(length(max = 80))]
    pub label: Option<String>,
    #[validate(range(min = 1, max = 10))]
    pub evidence_threshold: Option<u32>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct EvidenceRequest {
    pub entry_id: Option<EntryId>,
    #[serde(default)]
    #[validate(length(max = 1000))]
    pub note: String,
}

/// `decision` is `confirm` or `reject`
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ReviewRequest {
    #[validate(length(min = 1))]
    pub decision: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct AnnotationRequest {
    pub date: Option<NaiveDate>,
    #[validate(length(max = 80))]
    pub skill: Option<String>,
    #[validate(length(max = 60))]
    pub position: Option<String>,
    #[validate(length(min = 1, max = 1000))]
    pub body: String,
}

impl From<AnnotationRequest> for AnnotationDraft {
    fn from(request: AnnotationRequest) -> Self {
        AnnotationDraft {
            date: request.date,
            skill: request.skill,
            position: request.position,
            body: request.body,
        }
    }
}

/// Query string of the progress report
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProgressParams {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub skill: Option<String>,
    pub position: Option<String>,
    pub session_type: Option<SessionType>,
    pub granularity: Option<Granularity>,
}

impl From<ProgressParams> for ProgressFilter {
    fn from(params: ProgressParams) -> Self {
        ProgressFilter {
            from: params.from,
            to: params.to,
            skill: params.skill,
            position: params.position,
            session_type: params.session_type,
            granularity: params.granularity.unwrap_or_default(),
        }
    }
}
