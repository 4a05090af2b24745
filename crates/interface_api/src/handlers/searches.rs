//! Saved-search handlers (owner or admin only)

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};

use core_kernel::{Principal, SavedSearchId};
use domain_journal::SavedSearch;

use crate::access::{require_steward, Relation};
use crate::dto::searches::{SavedSearchRequest, SearchResultsResponse};
use crate::dto::ValidatedJson;
use crate::{error::ApiError, AppState};

use super::{record_id, user_id};

pub async fn create_search(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(athlete): Path<String>,
    ValidatedJson(request): ValidatedJson<SavedSearchRequest>,
) -> Result<(StatusCode, Json<SavedSearch>), ApiError> {
    let athlete = user_id(&athlete)?;
    require_steward(&principal, &athlete)?;
    let search = state
        .journal
        .create_search(&athlete, &request.name, request.query)
        .await?;
    Ok((StatusCode::CREATED, Json(search)))
}

pub async fn list_searches(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(athlete): Path<String>,
) -> Result<Json<Vec<SavedSearch>>, ApiError> {
    let athlete = user_id(&athlete)?;
    require_steward(&principal, &athlete)?;
    Ok(Json(state.journal.list_searches(&athlete).await?))
}

pub async fn get_search(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path((athlete, search)): Path<(String, String)>,
) -> Result<Json<SavedSearch>, ApiError> {
    let athlete = user_id(&athlete)?;
    require_steward(&principal, &athlete)?;
    let search = state
        .journal
        .get_search(&athlete, record_id::<SavedSearchId>(&search, "search")?)
        .await?;
    Ok(Json(search))
}

pub async fn delete_search(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path((athlete, search)): Path<(String, String)>,
) -> Result<StatusCode, ApiError> {
    let athlete = user_id(&athlete)?;
    require_steward(&principal, &athlete)?;
    state
        .journal
        .delete_search(&athlete, record_id::<SavedSearchId>(&search, "search")?)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Runs the search; an admin sees redacted entries
pub async fn search_results(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path((athlete, search)): Path<(String, String)>,
) -> Result<Json<SearchResultsResponse>, ApiError> {
    let athlete = user_id(&athlete)?;
    let relation = require_steward(&principal, &athlete)?;
    let (search, entries) = state
        .journal
        .run_search(&athlete, record_id::<SavedSearchId>(&search, "search")?, relation.sees_private())
        .await?;
    let entries = match relation {
        Relation::Owner => entries,
        _ => entries.into_iter().map(|e| e.redacted()).collect(),
    };
    Ok(Json(SearchResultsResponse { search, entries }))
}
