//! Partner handlers
//!
//! Readers may view partners; only the athlete or an admin changes them.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};

use core_kernel::{PartnerId, Principal};

use crate::access::{require_reader, require_steward};
use crate::dto::partners::PartnerRequest;
use crate::dto::ValidatedJson;
use crate::services::journal::PartnerDetail;
use crate::{error::ApiError, AppState};

use super::{record_id, user_id};

pub async fn create_partner(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(athlete): Path<String>,
    ValidatedJson(request): ValidatedJson<PartnerRequest>,
) -> Result<(StatusCode, Json<PartnerDetail>), ApiError> {
    let athlete = user_id(&athlete)?;
    require_steward(&principal, &athlete)?;
    let partner = state.journal.create_partner(&athlete, request.into()).await?;
    Ok((StatusCode::CREATED, Json(partner)))
}

pub async fn list_partners(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(athlete): Path<String>,
) -> Result<Json<Vec<PartnerDetail>>, ApiError> {
    let athlete = user_id(&athlete)?;
    require_reader(state.journal.port(), &principal, &athlete).await?;
    Ok(Json(state.journal.list_partners(&athlete).await?))
}

pub async fn get_partner(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path((athlete, partner)): Path<(String, String)>,
) -> Result<Json<PartnerDetail>, ApiError> {
    let athlete = user_id(&athlete)?;
    require_reader(state.journal.port(), &principal, &athlete).await?;
    let partner = state
        .journal
        .get_partner(&athlete, record_id::<PartnerId>(&partner, "partner")?)
        .await?;
    Ok(Json(partner))
}

pub async fn update_partner(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path((athlete, partner)): Path<(String, String)>,
    ValidatedJson(request): ValidatedJson<PartnerRequest>,
) -> Result<Json<PartnerDetail>, ApiError> {
    let athlete = user_id(&athlete)?;
    require_steward(&principal, &athlete)?;
    let partner = state
        .journal
        .update_partner(&athlete, record_id::<PartnerId>(&partner, "partner")?, request.into())
        .await?;
    Ok(Json(partner))
}

pub async fn delete_partner(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path((athlete, partner)): Path<(String, String)>,
) -> Result<StatusCode, ApiError> {
    let athlete = user_id(&athlete)?;
    require_steward(&principal, &athlete)?;
    state
        .journal
        .delete_partner(&athlete, record_id::<PartnerId>(&partner, "partner")?)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
