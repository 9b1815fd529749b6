use axum::{extract::State, http::header, response::IntoResponse, Json};

use crate::preview::{build_view, render_text, ResumeView};
use crate::state::AppState;

/// GET /api/v1/resume/preview
pub async fn handle_preview(State(state): State<AppState>) -> Json<ResumeView> {
    Json(build_view(&state.store.snapshot()))
}

/// GET /api/v1/resume/preview.txt
pub async fn handle_preview_text(State(state): State<AppState>) -> impl IntoResponse {
    let text = render_text(&build_view(&state.store.snapshot()));
    ([(header::CONTENT_TYPE, "text/plain; charset=utf-8")], text)
}
