use axum::{extract::State, http::StatusCode};

use rollcall_core::error::AppError;
use rollcall_core::health::database_ready;

use crate::state::AppState;

// ── GET /readyz ──────────────────────────────────────────────────────────────

pub async fn readyz(State(state): State<AppState>) -> Result<StatusCode, AppError> {
    database_ready(&state.db).await
}
