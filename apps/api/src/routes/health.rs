use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::state::AppState;

/// GET /health
/// Returns a simple status object with service version and the active
/// persistence and export settings.
pub async fn health_handler(State(state): State<AppState>) -> Json<Value> {
    let config = &state.config;
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "service": "resume-builder",
        "storage_backend": config.storage_backend.as_str(),
        "autosave_debounce_ms": config.autosave_debounce.as_millis() as u64,
        "export_timeout_secs": config.export_timeout.as_secs(),
        "export_busy": state.exporter.is_busy()
    }))
}
