//! Entry and comment DTOs

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use validator::Validate;

use core_kernel::PartnerId;
use domain_journal::{EntryDraft, EntryQuery, Outcome, RoundLog, SessionMetrics, SessionType};

use super::split_list;

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct MetricsRequest {
    #[validate(range(min = 1, max = 600))]
    pub duration_minutes: Option<u32>,
    #[validate(range(min = 1, max = 10))]
    pub intensity: Option<u8>,
    #[validate(range(max = 100))]
    pub rounds: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RoundRequest {
    pub partner_id: Option<PartnerId>,
    #[validate(length(min = 1, max = 60))]
    pub position: String,
    pub outcome: Outcome,
    #[validate(length(max = 80))]
    pub submission: Option<String>,
}

/// Body of entry create and update
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(default)]
pub struct EntryRequest {
    pub session_date: Option<NaiveDate>,
    pub session_type: SessionType,
    #[validate(length(max = 10000))]
    pub shared_notes: String,
    #[validate(length(max = 10000))]
    pub private_notes: Option<String>,
    #[validate(nested)]
    pub metrics: MetricsRequest,
    #[validate(length(max = 20))]
    pub tags: Vec<String>,
    #[validate(length(max = 50), nested)]
    pub rounds: Vec<RoundRequest>,
}

impl From<EntryRequest> for EntryDraft {
    fn from(request: EntryRequest) -> Self {
        EntryDraft {
            session_date: request.session_date,
            session_type: request.session_type,
            shared_notes: request.shared_notes,
            private_notes: request.private_notes,
            metrics: SessionMetrics {
                duration_minutes: request.metrics.duration_minutes,
                intensity: request.metrics.intensity,
                rounds: request.metrics.rounds,
            },
            tags: request.tags,
            rounds: request
                .rounds
                .into_iter()
                .map(|r| RoundLog {
                    partner_id: r.partner_id,
                    position: r.position,
                    outcome: r.outcome,
                    submission: r.submission,
                })
                .collect(),
        }
    }
}

/// Query string of the entry list
///
/// `tags` and `positions` are comma-separated.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EntryListParams {
    pub text: Option<String>,
    pub tags: Option<String>,
    pub positions: Option<String>,
    pub session_type: Option<SessionType>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub limit: Option<usize>,
}

impl From<EntryListParams> for EntryQuery {
    fn from(params: EntryListParams) -> Self {
        EntryQuery {
            text: params.text,
            tags: split_list(params.tags.as_deref()),
            positions: split_list(params.positions.as_deref()),
            session_type: params.session_type,
            from: params.from,
            to: params.to,
            limit: params.limit,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CommentRequest {
    #[validate(length(min = 1, max = 2000))]
    pub body: String,
}
