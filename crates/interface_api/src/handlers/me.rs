//! Identity and coach-roster handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};

use core_kernel::Principal;
use domain_journal::CoachLink;

use crate::access::{require_coach, require_reader, require_steward};
use crate::dto::roster::{CoachLinkRequest, MeResponse};
use crate::dto::ValidatedJson;
use crate::{error::ApiError, AppState};

use super::user_id;

/// The caller as the service sees them
pub async fn me(Extension(principal): Extension<Principal>) -> Json<MeResponse> {
    Json(MeResponse {
        primary_role: principal.primary_role(),
        user_id: principal.user_id,
        roles: principal.roles,
    })
}

/// Athletes linked to the calling coach
pub async fn my_athletes(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
) -> Result<Json<Vec<CoachLink>>, ApiError> {
    require_coach(&principal)?;
    Ok(Json(state.journal.list_athletes(&principal.user_id).await?))
}

pub async fn link_coach(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(athlete): Path<String>,
    ValidatedJson(request): ValidatedJson<CoachLinkRequest>,
) -> Result<(StatusCode, Json<CoachLink>), ApiError> {
    let athlete = user_id(&athlete)?;
    require_steward(&principal, &athlete)?;
    let coach = user_id(&request.coach_id)?;
    let link = state.journal.link_coach(&athlete, coach).await?;
    Ok((StatusCode::CREATED, Json(link)))
}

pub async fn list_coaches(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(athlete): Path<String>,
) -> Result<Json<Vec<CoachLink>>, ApiError> {
    let athlete = user_id(&athlete)?;
    require_reader(state.journal.port(), &principal, &athlete).await?;
    Ok(Json(state.journal.list_coaches(&athlete).await?))
}

pub async fn unlink_coach(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path((athlete, coach)): Path<(String, String)>,
) -> Result<StatusCode, ApiError> {
    let athlete = user_id(&athlete)?;
    require_steward(&principal, &athlete)?;
    state.journal.unlink_coach(&athlete, &user_id(&coach)?).await?;
    Ok(StatusCode::NO_CONTENT)
}
