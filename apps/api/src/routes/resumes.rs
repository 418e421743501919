//! Axum route handlers for stored résumés.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use tracing::info;

use crate::errors::AppError;
use crate::models::resume::{ResumePatch, ResumeRecord};
use crate::models::validation::validate_record;
use crate::state::AppState;
use crate::store::StoredResume;

#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub message: String,
}

/// Unwraps a JSON body, reporting malformed payloads in the API error shape.
pub(crate) fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, AppError> {
    payload
        .map(|Json(value)| value)
        .map_err(|rejection| AppError::BadRequest(rejection.body_text()))
}

fn not_found(id: i64) -> AppError {
    AppError::NotFound(format!("Resume {id} not found"))
}

/// POST /api/v1/resumes
pub async fn handle_create_resume(
    State(state): State<AppState>,
    payload: Result<Json<ResumeRecord>, JsonRejection>,
) -> Result<(StatusCode, Json<StoredResume>), AppError> {
    let record = json_body(payload)?;
    validate_record(&record).map_err(AppError::Validation)?;

    let stored = state.store.create(record).await?;
    info!(id = stored.id, "Resume created");
    Ok((StatusCode::CREATED, Json(stored)))
}

/// GET /api/v1/resumes
pub async fn handle_list_resumes(
    State(state): State<AppState>,
) -> Result<Json<Vec<StoredResume>>, AppError> {
    Ok(Json(state.store.list().await?))
}

/// GET /api/v1/resumes/:id
pub async fn handle_get_resume(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<StoredResume>, AppError> {
    let stored = state.store.get(id).await?.ok_or_else(|| not_found(id))?;
    Ok(Json(stored))
}

/// PUT /api/v1/resumes/:id
///
/// Partial update: only the fields present in the body change. The merged record must
/// still satisfy every required-field rule.
pub async fn handle_update_resume(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    payload: Result<Json<ResumePatch>, JsonRejection>,
) -> Result<Json<StoredResume>, AppError> {
    let patch = json_body(payload)?;

    let current = state.store.get(id).await?.ok_or_else(|| not_found(id))?;
    validate_record(&current.record.merged(patch.clone())).map_err(AppError::Validation)?;

    let updated = state
        .store
        .update(id, patch)
        .await?
        .ok_or_else(|| not_found(id))?;
    info!(id, "Resume updated");
    Ok(Json(updated))
}

/// DELETE /api/v1/resumes/:id
pub async fn handle_delete_resume(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<DeleteResponse>, AppError> {
    if !state.store.delete(id).await? {
        return Err(not_found(id));
    }
    info!(id, "Resume deleted");
    Ok(Json(DeleteResponse {
        message: "Resume deleted successfully".to_string(),
    }))
}
