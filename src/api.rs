//! HTTP API endpoints for state management.
//!
//! Snapshot export/import for backup during live events, plus the word
//! pack listing the room-creation UI needs.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use std::sync::Arc;

use crate::state::export::RoomsExport;
use crate::state::AppState;
use crate::types::WordPackId;
use crate::words;

/// GET /api/export - snapshot every live room
pub async fn export_state(State(state): State<Arc<AppState>>) -> Json<RoomsExport> {
    Json(state.export_state().await)
}

/// POST /api/import - replace all rooms from a snapshot
pub async fn import_state(
    State(state): State<Arc<AppState>>,
    Json(export): Json<RoomsExport>,
) -> Response {
    match state.import_state(export).await {
        Ok(count) => (
            StatusCode::OK,
            Json(serde_json::json!({ "imported": count })),
        )
            .into_response(),
        Err(msg) => (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({ "error": msg })),
        )
            .into_response(),
    }
}

/// GET /api/packs - word packs available for room setup
pub async fn list_word_packs() -> Json<Vec<WordPackId>> {
    Json(words::available_packs())
}
