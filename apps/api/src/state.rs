use std::sync::Arc;

use crate::render::preview::PreviewRenderer;
use crate::store::ResumeStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Postgres-backed when `DATABASE_URL` is set, in-memory otherwise.
    pub store: Arc<dyn ResumeStore>,
    /// Compiled preview templates, shared across requests.
    pub preview: Arc<PreviewRenderer>,
}
