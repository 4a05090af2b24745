//! Entry and comment handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};

use core_kernel::{CommentId, EntryId, Principal};
use domain_journal::{Comment, Entry, EntryQuery};

use crate::access::{require_reader, require_steward, Relation};
use crate::dto::entries::{CommentRequest, EntryListParams, EntryRequest};
use crate::dto::{QueryParams, ValidatedJson};
use crate::{error::ApiError, AppState};

use super::{record_id, user_id};

fn view(entry: Entry, relation: Relation) -> Entry {
    if relation.sees_private() {
        entry
    } else {
        entry.redacted()
    }
}

pub async fn create_entry(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(athlete): Path<String>,
    ValidatedJson(request): ValidatedJson<EntryRequest>,
) -> Result<(StatusCode, Json<Entry>), ApiError> {
    let athlete = user_id(&athlete)?;
    let relation = require_steward(&principal, &athlete)?;
    let entry = state.journal.create_entry(&athlete, request.into()).await?;
    Ok((StatusCode::CREATED, Json(view(entry, relation))))
}

/// Lists entries, optionally filtered by the query string
pub async fn list_entries(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(athlete): Path<String>,
    QueryParams(params): QueryParams<EntryListParams>,
) -> Result<Json<Vec<Entry>>, ApiError> {
    let athlete = user_id(&athlete)?;
    let relation = require_reader(state.journal.port(), &principal, &athlete).await?;
    let entries = state
        .journal
        .list_entries(&athlete, EntryQuery::from(params), relation.sees_private())
        .await?;
    Ok(Json(entries.into_iter().map(|e| view(e, relation)).collect()))
}

pub async fn get_entry(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path((athlete, entry)): Path<(String, String)>,
) -> Result<Json<Entry>, ApiError> {
    let athlete = user_id(&athlete)?;
    let relation = require_reader(state.journal.port(), &principal, &athlete).await?;
    let entry = state.journal.get_entry(&athlete, record_id::<EntryId>(&entry, "entry")?).await?;
    Ok(Json(view(entry, relation)))
}

pub async fn update_entry(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path((athlete, entry)): Path<(String, String)>,
    ValidatedJson(request): ValidatedJson<EntryRequest>,
) -> Result<Json<Entry>, ApiError> {
    let athlete = user_id(&athlete)?;
    let relation = require_steward(&principal, &athlete)?;
    let id = record_id::<EntryId>(&entry, "entry")?;
    let entry = state.journal.update_entry(&athlete, id, request.into()).await?;
    Ok(Json(view(entry, relation)))
}

pub async fn delete_entry(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path((athlete, entry)): Path<(String, String)>,
) -> Result<StatusCode, ApiError> {
    let athlete = user_id(&athlete)?;
    require_steward(&principal, &athlete)?;
    state
        .journal
        .delete_entry(&athlete, record_id::<EntryId>(&entry, "entry")?)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Re-runs structured extraction for an entry
pub async fn extract_entry(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path((athlete, entry)): Path<(String, String)>,
) -> Result<Json<Entry>, ApiError> {
    let athlete = user_id(&athlete)?;
    let relation = require_steward(&principal, &athlete)?;
    let entry = state
        .journal
        .extract_entry(&athlete, record_id::<EntryId>(&entry, "entry")?)
        .await?;
    Ok(Json(view(entry, relation)))
}

// ============================================================================
// Comments
// ============================================================================

pub async fn create_comment(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path((athlete, entry)): Path<(String, String)>,
    ValidatedJson(request): ValidatedJson<CommentRequest>,
) -> Result<(StatusCode, Json<Comment>), ApiError> {
    let athlete = user_id(&athlete)?;
    require_reader(state.journal.port(), &principal, &athlete).await?;
    let comment = state
        .journal
        .add_comment(&athlete, record_id::<EntryId>(&entry, "entry")?, &principal, &request.body)
        .await?;
    Ok((StatusCode::CREATED, Json(comment)))
}

pub async fn list_comments(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path((athlete, entry)): Path<(String, String)>,
) -> Result<Json<Vec<Comment>>, ApiError> {
    let athlete = user_id(&athlete)?;
    require_reader(state.journal.port(), &principal, &athlete).await?;
    let comments = state
        .journal
        .list_comments(&athlete, record_id::<EntryId>(&entry, "entry")?)
        .await?;
    Ok(Json(comments))
}

pub async fn delete_comment(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path((athlete, entry, comment)): Path<(String, String, String)>,
) -> Result<StatusCode, ApiError> {
    let athlete = user_id(&athlete)?;
    require_reader(state.journal.port(), &principal, &athlete).await?;
    state
        .journal
        .delete_comment(
            &athlete,
            record_id::<EntryId>(&entry, "entry")?,
            record_id::<CommentId>(&comment, "comment")?,
            &principal,
        )
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
