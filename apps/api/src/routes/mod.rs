pub mod health;
pub mod preview;
pub mod resumes;

use axum::{
    routing::{get, post},
    Router,
};

use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route(
            "/api/v1/resumes",
            post(resumes::handle_create_resume).get(resumes::handle_list_resumes),
        )
        .route(
            "/api/v1/resumes/:id",
            get(resumes::handle_get_resume)
                .put(resumes::handle_update_resume)
                .delete(resumes::handle_delete_resume),
        )
        .route(
            "/api/v1/resumes/:id/preview",
            get(preview::handle_preview_stored),
        )
        .route("/api/v1/preview", post(preview::handle_preview_record))
        .with_state(state)
}
