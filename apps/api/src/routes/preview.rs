//! Axum route handlers for live preview rendering.

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::models::resume::ResumeRecord;
use crate::render::preview::Viewport;
use crate::render::projector::{project, Projection};
use crate::routes::resumes::json_body;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct PreviewParams {
    pub viewport: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct PreviewResponse {
    pub viewport: Viewport,
    pub projection: Projection,
    pub markup: String,
}

fn viewport_from(params: &PreviewParams) -> Result<Viewport, AppError> {
    match params.viewport.as_deref() {
        None => Ok(Viewport::default()),
        Some(name) => Viewport::parse(name).ok_or_else(|| {
            AppError::BadRequest(format!("viewport must be 'desktop' or 'mobile', got '{name}'"))
        }),
    }
}

fn render_preview(
    state: &AppState,
    record: &ResumeRecord,
    viewport: Viewport,
) -> Result<PreviewResponse, AppError> {
    let projection = project(record)?;
    let markup = state.preview.render(&projection, viewport)?;
    Ok(PreviewResponse {
        viewport,
        projection,
        markup,
    })
}

/// POST /api/v1/preview?viewport=desktop|mobile
///
/// Renders an unsaved record exactly as the editor would show it.
pub async fn handle_preview_record(
    State(state): State<AppState>,
    Query(params): Query<PreviewParams>,
    payload: Result<Json<ResumeRecord>, JsonRejection>,
) -> Result<Json<PreviewResponse>, AppError> {
    let viewport = viewport_from(&params)?;
    let record = json_body(payload)?;
    Ok(Json(render_preview(&state, &record, viewport)?))
}

/// GET /api/v1/resumes/:id/preview?viewport=desktop|mobile
pub async fn handle_preview_stored(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Query(params): Query<PreviewParams>,
) -> Result<Json<PreviewResponse>, AppError> {
    let viewport = viewport_from(&params)?;
    let stored = state
        .store
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Resume {id} not found")))?;
    Ok(Json(render_preview(&state, &stored.record, viewport)?))
}
